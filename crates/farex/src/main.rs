use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;

mod commands;

/// 0 = OK, 2 = rejected input (4xx), 1 = anything else.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Parser)]
#[command(name = "farex", version, about = "Fare gate CLI: predict fares, check health")]
struct Cli {
    /// Gate server URL
    #[arg(long, env = "FARE_GATE_URL", default_value = "http://localhost:8080")]
    gate: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the fare for a ride
    Predict {
        /// Pickup as "lat,lon" (gate default if omitted)
        #[arg(long, allow_hyphen_values = true)]
        pickup: Option<String>,
        /// Dropoff as "lat,lon" (gate default if omitted)
        #[arg(long, allow_hyphen_values = true)]
        dropoff: Option<String>,
        /// Passenger count (gate default if omitted)
        #[arg(long)]
        passengers: Option<f64>,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Check gate server health
    Health,
}

/// Map error strings to exit codes based on HTTP status patterns.
fn exit_code_for(err: &str) -> i32 {
    if err.starts_with("HTTP 4") {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn main() {
    let cli = Cli::parse();
    let client = commands::Client::new(&cli.gate);

    let result = match cli.command {
        Commands::Predict { pickup, dropoff, passengers, json } => commands::predict(
            &client,
            pickup.as_deref(),
            dropoff.as_deref(),
            passengers,
            json,
        ),
        Commands::Health => commands::health(&client),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}
