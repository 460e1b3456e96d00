use clap::Subcommand;
use sobertrack_core::{Config, NewSlipUp};

use super::{open_service, print_json};

#[derive(Subcommand)]
pub enum SlipupAction {
    /// Record a slip-up
    Record {
        /// Date of the slip-up (YYYY-MM-DD)
        date: String,
        /// Date recovery restarted (YYYY-MM-DD); defaults to the slip-up date
        #[arg(long)]
        restart: Option<String>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List recorded slip-ups
    List,
}

pub fn run(action: SlipupAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let service = open_service(&config)?;
    let user_id = config.general.user_id.as_str();

    match action {
        SlipupAction::Record {
            date,
            restart,
            notes,
        } => {
            let restart = restart.as_deref().unwrap_or(&date);
            let mut slip_up = NewSlipUp::parse(&date, restart)?;
            if let Some(notes) = notes {
                slip_up = slip_up.with_notes(notes);
            }
            let record = service.log_slip_up(user_id, slip_up)?;
            print_json(&record)
        }
        SlipupAction::List => print_json(&service.slip_ups(user_id)?),
    }
}
