use std::fmt;

/// Where a batch build currently is.
///
/// `Idle → Enumerating → Diffing → Rendering → Reconciling → Done`, with
/// `Failed` reachable from any working phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Enumerating,
    Diffing,
    Rendering,
    Reconciling,
    Done,
    Failed,
}

impl Phase {
    /// Next phase on success.
    pub const fn next(self) -> Self {
        match self {
            Self::Idle => Self::Enumerating,
            Self::Enumerating => Self::Diffing,
            Self::Diffing => Self::Rendering,
            Self::Rendering => Self::Reconciling,
            Self::Reconciling | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Enumerating => "enumerating",
            Self::Diffing => "diffing",
            Self::Rendering => "rendering",
            Self::Reconciling => "reconciling",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        let mut phase = Phase::Idle;
        let mut seen = vec![phase];
        while !phase.is_terminal() {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            [
                Phase::Idle,
                Phase::Enumerating,
                Phase::Diffing,
                Phase::Rendering,
                Phase::Reconciling,
                Phase::Done
            ]
        );
        assert_eq!(Phase::Failed.next(), Phase::Failed);
    }
}
