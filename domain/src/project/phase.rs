//! Implementation phases

use serde::{Deserialize, Serialize};

/// One stage of a deliverable's implementation, in fixed total order
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Phase {
    #[default]
    Planning,
    Development,
    Testing,
    Deployment,
}

impl Phase {
    /// Every phase, in order
    pub const ALL: [Phase; 4] = [
        Phase::Planning,
        Phase::Development,
        Phase::Testing,
        Phase::Deployment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Planning => "Planning",
            Phase::Development => "Development",
            Phase::Testing => "Testing",
            Phase::Deployment => "Deployment",
        }
    }

    /// The following phase, or `None` at Deployment
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Planning => Some(Phase::Development),
            Phase::Development => Some(Phase::Testing),
            Phase::Testing => Some(Phase::Deployment),
            Phase::Deployment => None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matches_next() {
        for pair in Phase::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert!(Phase::Deployment.is_last());
    }
}
