use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Local;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use tennis_signup::config::Config;
use tennis_signup::display::{print_schedule, write_schedule_to_file, ScheduleTable};
use tennis_signup::error::AppError;
use tennis_signup::form::export_schedule_to_path;
use tennis_signup::logging::setup_logging;
use tennis_signup::roster::{event_title, load_roster, next_saturday, Lineup};
use tennis_signup::store::EventStore;
use tennis_signup::web::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "tennis-signup", version, about = "Saturday doubles sign-up and court scheduler")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the sign-up web site
    Web {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a schedule from a CSV roster and print it
    Generate {
        /// CSV file with a `name` column
        #[arg(long)]
        roster: PathBuf,
        /// Seed for a reproducible schedule
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        text: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Web { port } => {
            let port = port.unwrap_or(config.port);
            let state = AppState {
                store: Mutex::new(EventStore::open(&config.store_path)?),
                generator: config.generator(),
                clock: config.session_clock()?,
                admin_password_hash: config.admin_hash(),
                max_login_attempts: config.max_login_attempts,
                event_date: None,
            };

            info!("Starting web server on port {}...", port);
            info!("Access the site at http://localhost:{}", port);
            web::start_server(port, state).await?;
        }
        Command::Generate {
            roster,
            seed,
            csv,
            json,
            text,
        } => {
            info!("Loading roster from {}", roster.display());
            let roster = load_roster(&roster)?;
            let lineup = Lineup::from_roster(&roster)?;
            info!(
                "{} players on {} courts, {} substitutes",
                lineup.players.len(),
                lineup.num_courts,
                lineup.substitutes.len()
            );

            let generator = config.generator();
            let schedule = match seed {
                Some(seed) => {
                    generator.generate(&lineup.players, lineup.num_courts, &mut StdRng::seed_from_u64(seed))?
                }
                None => generator.generate(&lineup.players, lineup.num_courts, &mut rand::thread_rng())?,
            };

            let table = ScheduleTable::from_schedule(&schedule, &config.session_clock()?);
            let title = event_title(next_saturday(Local::now().date_naive()));
            print_schedule(&title, &table, &lineup.substitutes)?;

            if let Some(path) = csv {
                export_schedule_to_path(&table, &lineup.substitutes, &path)?;
                info!("Schedule CSV saved to {}", path.display());
            }
            if let Some(path) = json {
                fs::write(&path, serde_json::to_string_pretty(&schedule)?)?;
                info!("Schedule JSON saved to {}", path.display());
            }
            if let Some(path) = text {
                write_schedule_to_file(&title, &table, &lineup.substitutes, &path)?;
                info!("Schedule text saved to {}", path.display());
            }
        }
    }

    Ok(())
}
