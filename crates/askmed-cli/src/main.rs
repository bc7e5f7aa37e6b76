use anyhow::Result;
use clap::Parser;

mod app;

use askmed_core::{AskClient, HistoryStore, Settings};

#[derive(Parser)]
#[command(name = "askmed")]
#[command(about = "askmed - streamed answers to medical questions")]
#[command(version)]
struct Cli {
    /// Ask a single question and exit
    #[arg(short, long)]
    question: Option<String>,

    /// Base URL of the answer service
    #[arg(short, long)]
    server: Option<String>,

    /// Skip the stream and use the single-shot call
    #[arg(long)]
    no_stream: bool,

    /// Dark output colors
    #[arg(long, conflicts_with = "light")]
    dark: bool,

    /// Light output colors
    #[arg(long)]
    light: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();

    if let Some(ref server) = cli.server {
        settings.server.base_url = server.clone();
    }
    if cli.no_stream {
        settings.server.streaming = false;
    }
    if cli.dark {
        settings.display.dark_mode = true;
    } else if cli.light {
        settings.display.dark_mode = false;
    }

    let client = AskClient::from_settings(&settings)?;

    if let Some(question) = cli.question {
        app::run_single_prompt(&settings, client, &question).await?;
    } else {
        let history = HistoryStore::new().with_max_entries(settings.history.max_entries);
        app::run_interactive(settings, client, history).await?;
    }

    Ok(())
}
