// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concierge - a customer support agent over a tool worker process.
//!
//! Binary entry point: config loading, logging setup, and the CLI.

mod shell;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Concierge - a customer support agent over a tool worker process.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive support session in the terminal.
    Shell {
        /// User id for the session.
        #[arg(long, default_value = "local-user")]
        user: String,
    },
    /// Print the resolved configuration.
    Config,
    /// Seed the order database with demo orders.
    Seed,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match concierge_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            concierge_config::render_errors(&errors);
            std::process::exit(1);
        }
    };
    init_logging(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Shell { user }) => shell::run(&config, &user).await,
        Some(Commands::Config) => {
            match toml::to_string_pretty(&config) {
                Ok(rendered) => {
                    println!("{rendered}");
                    Ok(())
                }
                Err(e) => Err(concierge_core::ConciergeError::Internal(format!(
                    "failed to render config: {e}"
                ))),
            }
        }
        Some(Commands::Seed) => shell::seed(&config).await,
        None => {
            println!("concierge: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("concierge: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        let config = concierge_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "concierge");
    }
}
