//! # Sobertrack Core Library
//!
//! This library computes a recovering user's current sobriety streak from an
//! immutable journey-start date and an append-only history of slip-ups. The
//! CLI binary and any other front end are thin layers over the same core.
//!
//! ## Architecture
//!
//! - **Calendar**: `YYYY-MM-DD` calendar dates and whole-day differences,
//!   always evaluated on the wall clock of an IANA timezone
//! - **Streak**: Pure derivation of days sober and milestone progress
//! - **Slip-ups**: Validated, append-only relapse ledger behind a trait
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`compute_streak`]: The streak calculator
//! - [`CalendarDate`]: Timezone-free calendar date
//! - [`SlipUpStore`]: Ledger interface
//! - [`StreakService`]: Store + clock + timezone resolution
//! - [`Database`]: SQLite-backed store

pub mod calendar;
pub mod clock;
pub mod error;
pub mod profile;
pub mod service;
pub mod slipup;
pub mod storage;
pub mod streak;

pub use calendar::{
    calendar_day_diff, decode_calendar_date, encode_calendar_date, resolve_timezone, CalendarDate,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use profile::{Profile, ProfileStore};
pub use service::{StreakReport, StreakService};
pub use slipup::{MemoryStore, NewSlipUp, SlipUpRecord, SlipUpStore};
pub use storage::{Config, Database};
pub use streak::{compute_streak, MilestoneProgress, StreakSummary};
