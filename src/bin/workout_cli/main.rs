// ABOUTME: workout-cli - command-line driver for strength workout sessions
// ABOUTME: Seeds a demo plan, shows the pending workout, toggles sets and submits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Seed a demo strength test and two-week plan for a user
//! workout-cli seed --user 6f1c0f0e-7c57-4a53-9a0e-0c4a3f0f6d11
//!
//! # Show the pending workout and set progress
//! workout-cli --user 6f1c0f0e-7c57-4a53-9a0e-0c4a3f0f6d11 status
//!
//! # Mark set 1 (zero-based) of an exercise done or not done
//! workout-cli --user 6f1c... toggle 0d6f3c52-... 1
//!
//! # Submit; --confirm accepts unfinished exercises
//! workout-cli --user 6f1c... submit --confirm
//! ```

mod commands;
mod display;

use clap::{Parser, Subcommand};
use strength_workout::{
    config::{DatabaseUrl, ServerConfig},
    context::{AuthContext, AuthSession},
    database::Database,
    errors::AppResult,
    logging::LoggingConfig,
    workout::SessionOptions,
};
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "workout-cli",
    about = "Strength workout session CLI",
    long_about = "Drive the workout page from a terminal: seed a plan, track sets and submit."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Signed-in user id
    #[arg(long, global = true)]
    user: Option<Uuid>,

    /// Log at debug level or above, whatever LOG_LEVEL says
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Seed a demo strength test with a two-week workout plan
    Seed,

    /// Show the pending workout
    Status,

    /// Flip one set of an exercise
    Toggle {
        /// Join-record id of the exercise
        user_exercise_id: Uuid,

        /// Zero-based set index
        set: usize,
    },

    /// Submit the pending workout
    Submit {
        /// Submit even if some exercises are unfinished
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    LoggingConfig::from_server_config(&config)
        .with_verbose(cli.verbose)
        .init()?;

    if let Some(url) = cli.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }
    debug!("{}", config.summary());
    config.prepare_data_dirs()?;

    let auth = AuthContext::new();
    if let Some(user_id) = cli.user {
        auth.sign_in(AuthSession::new(user_id));
    }

    let database = Database::new(&config.database.url.to_connection_string()).await?;
    let snapshots = config.snapshots.build_store()?;
    let options = SessionOptions {
        namespace: config.snapshots.namespace.clone(),
    };

    match cli.command {
        Command::Seed => commands::seed(&database, &auth).await,
        Command::Status => commands::status(&database, snapshots, &options, &auth).await,
        Command::Toggle {
            user_exercise_id,
            set,
        } => {
            commands::toggle(
                &database,
                snapshots,
                &options,
                &auth,
                user_exercise_id,
                set,
            )
            .await
        }
        Command::Submit { confirm } => {
            commands::submit(&database, snapshots, &options, &auth, confirm).await
        }
    }
}
