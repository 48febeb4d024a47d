//! `maritime` command-line tool.
//!
//! ```bash
//! maritime load Maritime_Example_Dataset.csv
//! maritime ask "Which vessels are owned by Acme Shipping?"
//! maritime chat
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use maritime_query::cli::{self, CliCommand};
use maritime_query::{loader, AppConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,maritime_query=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().and_then(|cmd| cli::parse_command(cmd)) else {
        eprintln!("{}", cli::USAGE);
        std::process::exit(2);
    };

    let mut config = AppConfig::load().context("failed to load configuration")?;

    match command {
        CliCommand::Load => {
            let Some(csv_path) = args.get(1) else {
                bail!("usage: maritime load <csv> [db]");
            };
            if let Some(db) = args.get(2) {
                config.database_path = PathBuf::from(db);
            }
            let count = loader::load_csv(&config.store(), PathBuf::from(csv_path).as_path())?;
            println!(
                "Loaded {} vessel records into {}",
                count,
                config.database_path.display()
            );
        }
        CliCommand::Ask => {
            let question = args[1..].join(" ");
            if question.trim().is_empty() {
                bail!("usage: maritime ask <question>");
            }
            let reply = config.router()?.process(&config.store(), &question);
            println!("{}", cli::render_reply(&reply));
        }
        CliCommand::Chat => {
            let router = config.router()?;
            let store = config.store();
            let stdin = std::io::stdin();
            cli::run_chat(&router, &store, stdin.lock(), std::io::stdout())?;
        }
        CliCommand::Version => {
            println!("maritime {}", maritime_query::VERSION);
        }
    }

    Ok(())
}
