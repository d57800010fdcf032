use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voicenav::config::{Config, DEFAULT_CONFIG_PATH};
use voicenav::console::{self, ConsoleAction};
use voicenav::registry::help_text;
use voicenav::speech::ConsoleSpeech;
use voicenav::{Pipeline, RetryPolicy, SessionContext, SimulatedBrowser};

#[derive(Parser)]
#[command(name = "voicenav", about = "Control a browser with spoken commands")]
struct Cli {
    /// Config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Parse one transcript and print the intent as JSON
    Parse {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// List the recognised commands
    Commands,
    /// Interactive session, one transcript per line (default)
    Listen,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Command::Listen) {
        Command::Parse { words } => {
            let transcript = words.join(" ");
            let intent = voicenav::parse(&transcript);
            println!(
                "{}",
                serde_json::to_string_pretty(&intent).context("failed to serialize intent")?
            );
            Ok(())
        }
        Command::Commands => {
            print!("{}", help_text());
            Ok(())
        }
        Command::Listen => {
            let config = Config::load_from(&cli.config);
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to build tokio runtime")?
                .block_on(run_listen(config))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "voicenav=debug" } else { "voicenav=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_listen(config: Config) -> Result<()> {
    let session = SessionContext::new(&config);
    let browser = Arc::new(SimulatedBrowser::with_home(&config.browser.home_url));
    let speech = Arc::new(ConsoleSpeech::new(config.speech.feedback));
    let (pipeline, mut events) = Pipeline::new(
        browser,
        speech,
        Arc::clone(&session),
        RetryPolicy::from(&config.dispatch),
    );

    let (shutdown_tx, shutdown_rx) = flume::bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.try_send(());
    })
    .context("failed to install Ctrl+C handler")?;

    let input_rx = console::spawn_stdin_reader();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    eprintln!(
        "voicenav ({}) - {}. Type a command, /help for help.",
        session.language(),
        if session.is_listening() { "listening" } else { "paused, /start to listen" }
    );

    loop {
        tokio::select! {
            line = input_rx.recv_async() => {
                // Disconnected at end of input
                let Ok(line) = line else { break };
                match console::process_slash_command(&line, &session) {
                    Some(ConsoleAction::Shutdown) => break,
                    Some(ConsoleAction::Handled(message)) => println!("{}", message),
                    None => {
                        tasks.retain(|task| !task.is_finished());
                        tasks.extend(pipeline.handle_transcript(&line));
                    }
                }
            }

            Some(event) = events.recv() => {
                console::render_event(&event);
            }

            _ = shutdown_rx.recv_async() => {
                info!("interrupted");
                session.stop_listening();
                break;
            }
        }
    }

    // Let in-flight commands finish, then flush their events
    for task in tasks {
        let _ = task.await;
    }
    drop(pipeline);
    while let Some(event) = events.recv().await {
        console::render_event(&event);
    }

    Ok(())
}
