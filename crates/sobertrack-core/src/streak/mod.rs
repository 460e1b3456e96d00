mod calculator;
mod milestones;

pub use calculator::{compute_streak, HasRestartDate, StreakSummary};
pub use milestones::{MilestoneProgress, DEFAULT_MILESTONES};
