use clap::Subcommand;
use sobertrack_core::{CalendarDate, Config};

use super::{open_service, print_json};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Current streak summary
    Show {
        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = open_service(&config)?;
    let user_id = config.general.user_id.as_str();

    match action {
        StreakAction::Show { today } => {
            let report = match today {
                Some(today) => {
                    let today: CalendarDate = today.parse()?;
                    service.summary_on(user_id, today)?
                }
                None => service.summary(user_id)?,
            };
            print_json(&report)
        }
    }
}
