//! Slip-up (relapse) ledger.
//!
//! Records are appended once and never edited. The streak calculator takes a
//! maximum over the whole history, so insertion order carries no meaning.

mod store;
mod types;
mod validation;

pub use store::{MemoryStore, SlipUpStore};
pub use types::{NewSlipUp, SlipUpRecord};
pub use validation::validate_slip_up;
