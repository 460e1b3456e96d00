//! Sobriety milestone progress.

use serde::{Deserialize, Serialize};

/// Day counts celebrated by default: one day, one week, two weeks, one month,
/// then the usual chip intervals up to ten years.
pub const DEFAULT_MILESTONES: &[u32] = &[1, 7, 14, 30, 60, 90, 180, 365, 730, 1095, 1825, 3650];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneProgress {
    /// Highest milestone already reached.
    pub reached: Option<u32>,
    /// Next milestone ahead, if any remain.
    pub next: Option<u32>,
    pub days_until_next: Option<u32>,
}

impl MilestoneProgress {
    /// Locate `days_sober` among `thresholds`. Order and duplicates in
    /// `thresholds` do not matter; zero is not a milestone.
    pub fn from_days(days_sober: u32, thresholds: &[u32]) -> Self {
        let mut sorted: Vec<u32> = thresholds.iter().copied().filter(|&t| t > 0).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let reached = sorted.iter().copied().filter(|&t| t <= days_sober).last();
        let next = sorted.iter().copied().find(|&t| t > days_sober);

        Self {
            reached,
            next,
            days_until_next: next.map(|n| n - days_sober),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_zero_has_nothing_reached() {
        let p = MilestoneProgress::from_days(0, DEFAULT_MILESTONES);
        assert_eq!(p.reached, None);
        assert_eq!(p.next, Some(1));
        assert_eq!(p.days_until_next, Some(1));
    }

    #[test]
    fn exact_milestone_counts_as_reached() {
        let p = MilestoneProgress::from_days(30, DEFAULT_MILESTONES);
        assert_eq!(p.reached, Some(30));
        assert_eq!(p.next, Some(60));
        assert_eq!(p.days_until_next, Some(30));
    }

    #[test]
    fn beyond_last_milestone() {
        let p = MilestoneProgress::from_days(4000, DEFAULT_MILESTONES);
        assert_eq!(p.reached, Some(3650));
        assert_eq!(p.next, None);
        assert_eq!(p.days_until_next, None);
    }

    #[test]
    fn unsorted_thresholds_are_normalised() {
        let p = MilestoneProgress::from_days(10, &[30, 0, 7, 7, 100]);
        assert_eq!(p.reached, Some(7));
        assert_eq!(p.next, Some(30));
    }

    #[test]
    fn empty_thresholds() {
        let p = MilestoneProgress::from_days(10, &[]);
        assert_eq!(
            p,
            MilestoneProgress {
                reached: None,
                next: None,
                days_until_next: None,
            }
        );
    }
}
