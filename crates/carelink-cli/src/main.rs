use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod store;

#[derive(Debug, Parser)]
#[command(name = "carelink")]
#[command(about = "Patient/hospital coordination client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new patient or hospital account.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        email: String,
        /// Patient accounts: date of birth as YYYY-MM-DD.
        #[arg(long, conflicts_with = "hospital_name")]
        date_of_birth: Option<NaiveDate>,
        /// Hospital accounts: facility name (requires --address and --phone).
        #[arg(long, requires = "address", requires = "phone")]
        hospital_name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Log in and store the session token pair.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Discard the stored session credentials.
    Logout,
    /// Show the logged-in account.
    Whoami,
    /// Show the full account record, including the medical profile.
    Profile,
    /// Update account username or email.
    UpdateAccount {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Update fields of the patient's medical profile.
    UpdateProfile {
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
        #[arg(long)]
        conditions: Option<String>,
        #[arg(long)]
        emergency_notes: Option<String>,
    },
    /// List verified hospitals with live wait times.
    Hospitals,
    /// Rank hospitals by travel + wait time for a location.
    Recommend {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
        /// Use the emergency-vehicle travel model.
        #[arg(long)]
        ambulance: bool,
    },
    /// Submit an admission request for review by the recommended hospital.
    RequestAdmission {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
        #[arg(long)]
        reason: String,
    },
    /// Ask the dispatch service for an emergency recommendation.
    Dispatch {
        #[arg(long, allow_hyphen_values = true)]
        latitude: f64,
        #[arg(long, allow_hyphen_values = true)]
        longitude: f64,
    },
    /// Trigger an emergency call relay with the stored medical details.
    EmergencyCall,
    /// Hospital dashboard: manage the patient queue.
    Queue {
        #[command(subcommand)]
        action: QueueAction,
    },
    /// Hospital dashboard: manage incoming admission requests.
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },
}

#[derive(Debug, Subcommand)]
enum QueueAction {
    /// Show the current queue, highest priority first.
    List,
    /// Admit a patient directly; the service assigns triage scores.
    Admit { patient_id: i64 },
    /// Update a queue entry's status, scores or notes.
    Update {
        id: i64,
        /// waiting, in_progress, completed or cancelled.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<i32>,
        /// Estimated service time in minutes.
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum RequestsAction {
    /// List pending requests routed to this hospital.
    List,
    /// Accept a request and add the patient to the queue.
    Accept { id: i64 },
    /// Reject a request.
    Reject { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = carelink_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    commands::run(cli.command, &config).await
}
