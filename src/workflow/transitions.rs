//! Which status writes the orchestrator lets through.

use std::{fmt, str::FromStr};

use crate::domain::OrderStatus;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Any status may follow any other.
    #[default]
    Unrestricted,
    /// Only forward moves along Pending, Approved, On Process, Completed.
    Guarded,
}

impl TransitionPolicy {
    pub fn allows(self, from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;
        if from == to { return true; }
        match self {
            Self::Unrestricted => true,
            Self::Guarded => matches!(
                (from, to),
                (Pending, Approved | OnProcess | Completed) | (Approved, OnProcess | Completed) | (OnProcess, Completed)
            ),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(Self::Unrestricted),
            "guarded" => Ok(Self::Guarded),
            other => Err(format!("expected `unrestricted` or `guarded`, got `{other}`")),
        }
    }
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Self::Unrestricted => "unrestricted", Self::Guarded => "guarded" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use crate::domain::OrderStatus::*;

    #[test]
    fn unrestricted_allows_everything() {
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                assert!(TransitionPolicy::Unrestricted.allows(from, to));
            }
        }
    }

    #[rstest]
    #[case(Pending, Approved, true)]
    #[case(Pending, Completed, true)]
    #[case(Approved, OnProcess, true)]
    #[case(OnProcess, Completed, true)]
    #[case(Completed, Completed, true)]
    #[case(Approved, Pending, false)]
    #[case(Completed, OnProcess, false)]
    #[case(OnProcess, Approved, false)]
    fn guarded_only_moves_forward(#[case] from: OrderStatus, #[case] to: OrderStatus, #[case] allowed: bool) {
        assert_eq!(TransitionPolicy::Guarded.allows(from, to), allowed);
    }

    #[test]
    fn parses_from_config_text() {
        assert_eq!("Guarded".parse::<TransitionPolicy>(), Ok(TransitionPolicy::Guarded));
        assert!("strict".parse::<TransitionPolicy>().is_err());
    }
}
