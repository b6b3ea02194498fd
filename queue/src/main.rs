//! Terminal front end for the microwave queue

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use queue::terminal::{self, ignored_message, Command, HELP};
use queue::{GenerateOutcome, QueueError, QueueWidget};
use shared::{logging, ConfigOverrides, ProcessId, QueueConfig};

#[derive(Parser, Debug)]
#[command(name = "queue")]
#[command(about = "Pick who is in line for the microwave and draw a random order")]
struct Args {
    /// Comma separated participant names (overrides QUEUE_ROSTER)
    #[arg(long)]
    roster: Option<String>,

    /// JSON file containing an array of participant names
    #[arg(long)]
    roster_file: Option<PathBuf>,

    /// Pause before a new order is revealed, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed for reproducible orders
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    ProcessId::init_terminal();
    logging::init_tracing_with_endpoint_and_level(None, Some(&args.log_level));

    let config = QueueConfig::from_env()
        .and_then(|config| {
            config.apply(ConfigOverrides {
                roster: args.roster,
                roster_file: args.roster_file,
                delay_ms: args.delay_ms,
                seed: args.seed,
            })
        })
        .context("loading configuration")?;

    let widget = QueueWidget::from_config(&config).context("building roster")?;
    logging::log_startup(ProcessId::current(), "terminal queue");

    println!("{}", terminal::render(&widget.view()));
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match terminal::parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::List => {}
            Command::Toggle(target) => {
                let name = match terminal::resolve_target(&widget.view(), &target) {
                    Ok(name) => name,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match widget.toggle(&name).await {
                    Ok(_) => {}
                    Err(QueueError::UnknownParticipant { name }) => {
                        println!("Nobody called {name} on the roster");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Command::All => widget.select_all().await,
            Command::Clear => widget.clear_all().await,
            Command::Go => {
                match widget.generate().await {
                    GenerateOutcome::Started { .. } => println!("Shuffling..."),
                    GenerateOutcome::Ignored { reason } => {
                        println!("{}", ignored_message(reason));
                        continue;
                    }
                }
                widget.wait_until_idle().await;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => break,
        }

        println!("{}", terminal::render(&widget.view()));
    }

    widget.unmount();
    logging::log_shutdown(ProcessId::current(), "input closed");
    Ok(())
}
