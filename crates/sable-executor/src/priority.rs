//! Job priority levels

/// Priority level of a schedulable job.
///
/// A small closed set with a total order: higher means more urgent. The
/// discriminants are the raw priority-class values handed to a delegated
/// dispatcher, so conversion at that boundary is a cast.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum JobPriority {
    /// Maintenance or cleanup work the user never waits on
    Background = 0x09,
    /// Long-running work with progress the user may observe
    Utility = 0x11,
    /// Work with no explicit priority assignment
    Default = 0x15,
    /// Work the user initiated and is actively waiting for
    UserInitiated = 0x19,
    /// Work that must run ahead of everything else
    High = 0x21,
}

impl JobPriority {
    /// Raw priority-class value consumed by delegated dispatchers.
    pub fn as_raw(self) -> u8 {
        self as u8
    }

    /// Convert a raw priority-class value back to a level, if it is one.
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0x09 => Some(JobPriority::Background),
            0x11 => Some(JobPriority::Utility),
            0x15 => Some(JobPriority::Default),
            0x19 => Some(JobPriority::UserInitiated),
            0x21 => Some(JobPriority::High),
            _ => None,
        }
    }
}

impl Default for JobPriority {
    fn default() -> Self {
        JobPriority::Default
    }
}
