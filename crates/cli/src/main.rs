use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use api_shared::{ExtractRes, HealthService};
use clap::{Parser, Subcommand};
use notes_core::{build_messages, extract, ChatCompletionsClient, ExtractionService, NotesConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Clinical notes extractor CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report whether the extractor is alive
    Health,
    /// Send a clinical note to the model and print the extracted record as JSON
    Extract {
        /// File holding the note; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
    /// Parse a saved model reply offline and print the extracted record as JSON
    Parse {
        /// File holding the model reply; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
    /// Print the chat messages that would be sent for a note
    Prompt {
        /// File holding the note; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(&path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn parse_reply(reply: &str) -> anyhow::Result<String> {
    let res = ExtractRes::from(extract(reply)?);
    Ok(serde_json::to_string_pretty(&res)?)
}

fn render_prompt(note: &str) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&build_messages(note))?)
}

async fn extract_note(note: &str) -> anyhow::Result<String> {
    let cfg = NotesConfig::from_env()?;
    let service = ExtractionService::new(Arc::new(ChatCompletionsClient::new(cfg)?));
    let res = ExtractRes::from(service.extract_note(note).await?);
    Ok(serde_json::to_string_pretty(&res)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("notes_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Health) => {
            let res = HealthService::check_health();
            println!("{}", res.message);
        }
        Some(Commands::Extract { file }) => {
            let note = read_input(file)?;
            println!("{}", extract_note(&note).await?);
        }
        Some(Commands::Parse { file }) => {
            let reply = read_input(file)?;
            println!("{}", parse_reply(&reply)?);
        }
        Some(Commands::Prompt { file }) => {
            let note = read_input(file)?;
            println!("{}", render_prompt(&note)?);
        }
        None => {
            println!("Use 'notes --help' for commands");
        }
    }

    Ok(())
}
