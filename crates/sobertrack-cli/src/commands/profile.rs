//! Sobriety profile commands.
//!
//! The journey start is set once with `init`; `correct-date` is the only way
//! to change it afterwards.

use clap::Subcommand;
use sobertrack_core::{CalendarDate, Config};

use super::{open_service, print_json};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create the profile with its journey start date
    Init {
        /// Sobriety date (YYYY-MM-DD)
        date: String,
        /// IANA timezone (e.g. "America/New_York"); defaults to the device zone
        #[arg(long)]
        timezone: Option<String>,
    },
    /// Show the profile
    Show,
    /// Correct a mis-entered sobriety date
    CorrectDate {
        /// Corrected sobriety date (YYYY-MM-DD)
        date: String,
    },
    /// Set the profile timezone, or clear it when omitted
    SetTimezone {
        /// IANA timezone
        timezone: Option<String>,
    },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = open_service(&config)?;
    let user_id = config.general.user_id.as_str();

    let profile = match action {
        ProfileAction::Init { date, timezone } => {
            let date: CalendarDate = date.parse()?;
            service.onboard(user_id, date, timezone.as_deref())?
        }
        ProfileAction::Show => service.profile(user_id)?,
        ProfileAction::CorrectDate { date } => {
            service.correct_sobriety_date(user_id, date.parse()?)?
        }
        ProfileAction::SetTimezone { timezone } => {
            service.set_timezone(user_id, timezone.as_deref())?
        }
    };

    print_json(&profile)
}
