use std::fmt;

/// Messages shown to the student during an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Caching a freshly fetched test ran out of storage.
    StorageFull,
    /// The test was not cached and could not be fetched.
    LoadFailed,
    /// Submission failed and the result was queued locally.
    SavedOffline,
    /// Submission failed and the result could not be queued either.
    PendingSaveFailed,
}

impl Notice {
    pub fn is_warning(&self) -> bool {
        !matches!(self, Notice::SavedOffline)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Notice::StorageFull => "Storage full! Please clear some space to take the test offline.",
            Notice::LoadFailed => "Could not load test. Check internet or cache.",
            Notice::SavedOffline => "You are offline. Result saved locally and will sync when online.",
            Notice::PendingSaveFailed => "Submission failed and the result could not be saved locally.",
        };
        f.write_str(message)
    }
}

/// Delivers notices to the student.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
