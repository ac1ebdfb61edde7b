//! qbot CLI: run the QnA bot on a console transport. Config from env and optional CLI args.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};

use qbot_core::{
    init_tracing, Activity, ActivityKind, ConsoleTransport, Conversation, Transport, TurnContext,
};
use qna_client::{mask_token, QnaEndpoint, QnaMakerClient, QnaOptions};
use qna_handlers::QnaTurnHandler;

/// Recipient id the console transport addresses activities to.
const BOT_ID: &str = "qbot";
const CONSOLE_USER_ID: &str = "console-user";
const CONSOLE_CONVERSATION_ID: &str = "console";

#[derive(Parser)]
#[command(name = "qbot")]
#[command(about = "QnA bot CLI: answer questions from a hosted knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot on a console transport (config from env; key can override QNA_ENDPOINT_KEY).
    Run {
        #[arg(short, long)]
        endpoint_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { endpoint_key } => run(endpoint_key).await,
    }
}

/// Builds the client and handler from env config and drives the console REPL:
/// a member-join update first (the greeting path), then one Message activity per stdin line.
async fn run(endpoint_key: Option<String>) -> Result<()> {
    let log_file = std::env::var("LOG_FILE").unwrap_or_else(|_| "logs/qbot.log".to_string());
    std::fs::create_dir_all("logs")?;
    init_tracing(&log_file)?;

    let endpoint = QnaEndpoint::from_env(endpoint_key)?;
    endpoint.validate()?;
    let options = QnaOptions::from_env();

    info!(
        host = %endpoint.host,
        knowledge_base = %endpoint.knowledge_base_id,
        endpoint_key = %mask_token(&endpoint.endpoint_key),
        top = options.top,
        score_threshold = options.score_threshold,
        "Initializing bot"
    );

    let client = Arc::new(QnaMakerClient::with_options(endpoint, options));
    let handler = QnaTurnHandler::new(client);
    let transport: Arc<dyn Transport> = Arc::new(ConsoleTransport::new());

    // The channel would deliver a conversation update when the user joins; synthesize it
    // so the bot greets before the first question.
    let mut next_id = 0u64;
    let join = ActivityKind::ConversationUpdate {
        members_added: vec![CONSOLE_USER_ID.to_string()],
    };
    dispatch(&handler, transport.clone(), &mut next_id, join).await;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "/quit" {
            break;
        }
        let kind = ActivityKind::Message {
            text: text.to_string(),
        };
        dispatch(&handler, transport.clone(), &mut next_id, kind).await;
    }

    Ok(())
}

/// Wraps `kind` into an activity and runs one turn. Handler errors are logged and the
/// REPL keeps running; surfacing failed turns to the user is the host's concern.
async fn dispatch(
    handler: &QnaTurnHandler,
    transport: Arc<dyn Transport>,
    next_id: &mut u64,
    kind: ActivityKind,
) {
    *next_id += 1;
    let activity = Activity {
        id: format!("console-{}", next_id),
        conversation: Conversation {
            id: CONSOLE_CONVERSATION_ID.to_string(),
        },
        recipient_id: BOT_ID.to_string(),
        kind,
        created_at: Utc::now(),
    };
    let ctx = TurnContext::new(activity, transport);
    if let Err(e) = handler.on_turn(&ctx).await {
        error!(error = %e, "Turn failed");
    }
}
