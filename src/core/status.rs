use std::fmt;

/// Lifecycle state of a worker.
///
/// ```text
///            run                pause
///  Stopped ───────► Running ───────────► Paused
///     ▲               │   ◄───────────     │
///     │     stop      │      resume        │
///     └───────────────┘                    │
///     ▲          token cancelled           │
///     └────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Initial state; no background loop is servicing the worker.
    #[default]
    Stopped,
    /// The loop is servicing submissions or timer firings.
    Running,
    /// The loop is alive but submissions are rejected and firings discarded.
    Paused,
}

impl Status {
    /// Returns a short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Stopped => "stopped",
            Status::Running => "running",
            Status::Paused => "paused",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
