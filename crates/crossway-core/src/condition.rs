//! Experiment condition model and the fixed condition->display table
//!
//! A condition is one eHMI configuration selected by the operator for a
//! trial run. The mapping to display variants is a total function: every
//! condition number maps to exactly one of eleven mutually exclusive
//! variants, and out-of-range numbers map to "no display".

use std::fmt;

/// Lowest valid condition number
pub const MIN_CONDITION: i32 = 1;
/// Highest valid condition number
pub const MAX_CONDITION: i32 = 12;

/// A validated experiment condition number in [1, 12]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Condition(i32);

impl Condition {
    /// Validate a raw condition number
    pub fn new(n: i32) -> Option<Self> {
        if (MIN_CONDITION..=MAX_CONDITION).contains(&n) {
            Some(Condition(n))
        } else {
            None
        }
    }

    #[inline]
    pub fn number(self) -> i32 {
        self.0
    }

    /// Conditions under which the AV does not yield at the stop point
    pub fn is_non_yield(self) -> bool {
        matches!(self.0, 2 | 4 | 7 | 10 | 12)
    }

    /// "Whom"-class conditions carry target-specific indicators
    pub fn is_whom(self) -> bool {
        matches!(self.0, 5..=8)
    }

    /// The display variant for this condition (total over valid conditions)
    pub fn display(self) -> EhmiDisplay {
        match self.0 {
            1 | 2 => EhmiDisplay::NoEhmi,
            3 => EhmiDisplay::YieldNoContext,
            4 => EhmiDisplay::NonYieldNoContext,
            5 => EhmiDisplay::YieldPedestrianWhom,
            6 => EhmiDisplay::YieldCyclistWhom,
            7 => EhmiDisplay::NonYieldWhom,
            8 => EhmiDisplay::YieldDriverWhom,
            9 => EhmiDisplay::YieldWhen,
            10 => EhmiDisplay::NonYieldWhen,
            11 => EhmiDisplay::YieldWhere,
            12 => EhmiDisplay::NonYieldWhere,
            // Unreachable by construction
            _ => EhmiDisplay::NoEhmi,
        }
    }

    /// Target-specific indicators shown for "whom"-class conditions: the
    /// yielded-to target's yield indicator plus the non-yield indicators of
    /// the other two targets. Empty for non-whom conditions.
    pub fn whom_indicators(self) -> &'static [WhomIndicator] {
        match self.0 {
            5 => &[
                WhomIndicator::YieldPedestrian,
                WhomIndicator::NonYieldCyclist,
                WhomIndicator::NonYieldDriver,
            ],
            6 => &[
                WhomIndicator::YieldCyclist,
                WhomIndicator::NonYieldPedestrian,
                WhomIndicator::NonYieldDriver,
            ],
            7 => &[
                WhomIndicator::NonYieldPedestrian,
                WhomIndicator::NonYieldCyclist,
                WhomIndicator::NonYieldDriver,
            ],
            8 => &[
                WhomIndicator::YieldDriver,
                WhomIndicator::NonYieldPedestrian,
                WhomIndicator::NonYieldCyclist,
            ],
            _ => &[],
        }
    }

    /// All valid conditions in order
    pub fn all() -> impl Iterator<Item = Condition> {
        (MIN_CONDITION..=MAX_CONDITION).map(Condition)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.0)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The eleven mutually exclusive eHMI display variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EhmiDisplay {
    NoEhmi,
    YieldNoContext,
    NonYieldNoContext,
    YieldPedestrianWhom,
    YieldCyclistWhom,
    NonYieldWhom,
    YieldDriverWhom,
    YieldWhen,
    NonYieldWhen,
    YieldWhere,
    NonYieldWhere,
}

impl EhmiDisplay {
    /// All display variants
    pub fn all() -> &'static [EhmiDisplay] {
        &[
            EhmiDisplay::NoEhmi,
            EhmiDisplay::YieldNoContext,
            EhmiDisplay::NonYieldNoContext,
            EhmiDisplay::YieldPedestrianWhom,
            EhmiDisplay::YieldCyclistWhom,
            EhmiDisplay::NonYieldWhom,
            EhmiDisplay::YieldDriverWhom,
            EhmiDisplay::YieldWhen,
            EhmiDisplay::NonYieldWhen,
            EhmiDisplay::YieldWhere,
            EhmiDisplay::NonYieldWhere,
        ]
    }
}

/// Target-specific indicator elements for "whom"-class conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhomIndicator {
    YieldPedestrian,
    YieldCyclist,
    YieldDriver,
    NonYieldPedestrian,
    NonYieldCyclist,
    NonYieldDriver,
}

impl WhomIndicator {
    /// All indicator elements
    pub fn all() -> &'static [WhomIndicator] {
        &[
            WhomIndicator::YieldPedestrian,
            WhomIndicator::YieldCyclist,
            WhomIndicator::YieldDriver,
            WhomIndicator::NonYieldPedestrian,
            WhomIndicator::NonYieldCyclist,
            WhomIndicator::NonYieldDriver,
        ]
    }

    pub fn is_yield(self) -> bool {
        matches!(
            self,
            WhomIndicator::YieldPedestrian
                | WhomIndicator::YieldCyclist
                | WhomIndicator::YieldDriver
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_range() {
        assert!(Condition::new(0).is_none());
        assert!(Condition::new(13).is_none());
        assert!(Condition::new(-3).is_none());
        for n in MIN_CONDITION..=MAX_CONDITION {
            assert!(Condition::new(n).is_some());
        }
    }

    #[test]
    fn test_display_table_exhaustive() {
        // Every condition maps to a variant and all eleven variants are hit
        let mut seen = Vec::new();
        for cond in Condition::all() {
            let d = cond.display();
            if !seen.contains(&d) {
                seen.push(d);
            }
        }
        assert_eq!(seen.len(), EhmiDisplay::all().len());
    }

    #[test]
    fn test_conditions_one_and_two_share_no_ehmi() {
        assert_eq!(Condition::new(1).unwrap().display(), EhmiDisplay::NoEhmi);
        assert_eq!(Condition::new(2).unwrap().display(), EhmiDisplay::NoEhmi);
    }

    #[test]
    fn test_non_yield_set() {
        let non_yield: Vec<i32> = Condition::all()
            .filter(|c| c.is_non_yield())
            .map(|c| c.number())
            .collect();
        assert_eq!(non_yield, vec![2, 4, 7, 10, 12]);
    }

    #[test]
    fn test_whom_groups() {
        // Whom conditions show exactly three indicators
        for cond in Condition::all() {
            let group = cond.whom_indicators();
            if cond.is_whom() {
                assert_eq!(group.len(), 3, "condition {}", cond);
            } else {
                assert!(group.is_empty(), "condition {}", cond);
            }
        }

        // Condition 7 shows only non-yield indicators
        let seven = Condition::new(7).unwrap();
        assert!(seven.whom_indicators().iter().all(|i| !i.is_yield()));

        // Yield whom conditions show exactly one yield indicator
        for n in [5, 6, 8] {
            let cond = Condition::new(n).unwrap();
            let yields = cond.whom_indicators().iter().filter(|i| i.is_yield()).count();
            assert_eq!(yields, 1, "condition {}", n);
        }
    }
}
