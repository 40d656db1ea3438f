use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wiki_rag::cli::{output, Session, SessionEnd};
use wiki_rag::infrastructure::{build_orchestrator, AppConfig};

#[derive(Parser, Debug)]
#[command(
    name = "wiki-rag",
    version,
    about = "Answers questions with a language model grounded in Wikipedia"
)]
struct Cli {
    /// YAML file overriding the default models, limits and prompts.
    #[arg(long, short, env = "WIKI_RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Number of chunks retrieved per question.
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wiki_rag=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(top_k) = cli.top_k {
        config.config.rag.top_k = top_k;
        config.validate()?;
    }

    let orchestrator = build_orchestrator(&config)?;
    info!(conversation = %orchestrator.conversation_id(), "session started");

    let interactive = std::io::stdin().is_terminal();
    let mut stdout = std::io::stdout();
    if interactive {
        output::banner(&mut stdout)?;
    }

    let mut session = Session::new(orchestrator).interactive(interactive);
    let end = session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    match end {
        SessionEnd::Bye => info!("session closed by user"),
        SessionEnd::EndOfInput => info!("input closed"),
    }
    Ok(())
}
