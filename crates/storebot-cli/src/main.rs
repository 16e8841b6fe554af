//! Storebot CLI — a store assistant over six commerce tools.

use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::sync::Arc;
use storebot_agent::{AgentRunner, AgentService, LlmProvider, ModelConfig, StreamEvent};
use storebot_commerce::{register_commerce_tools, CommerceClient, CommerceConfig};
use storebot_core::{StorebotError, StorebotResult};
use storebot_session::SessionRegistry;
use storebot_tools::ToolRegistry;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
const DEFAULT_SESSION_CAPACITY: usize = 64;

#[derive(Parser)]
#[command(name = "storebot", about = "Storebot — conversational store assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat with the store assistant
    Chat {
        /// Conversation thread id (one transcript per thread)
        #[arg(long, default_value = "default")]
        thread: String,
        /// Print the reply incrementally as the model generates it
        #[arg(long)]
        stream: bool,
    },
    /// List the registered tools
    Tools,
}

/// Everything the process needs from the environment, resolved once at
/// startup. A missing credential is a fatal configuration error reported
/// before any session exists.
#[derive(Debug)]
struct AppConfig {
    model: ModelConfig,
    commerce: CommerceConfig,
    session_capacity: usize,
}

impl AppConfig {
    fn from_env() -> StorebotResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StorebotResult<Self> {
        let require = |key: &str| {
            lookup(key).ok_or_else(|| {
                StorebotError::Config(format!("{key} is not set in the environment"))
            })
        };

        let api_key = require("OPENAI_API_KEY")?;
        let shop = require("SHOPIFY_SHOP")?;
        let access_token = require("SHOPIFY_ACCESS_TOKEN")?;

        let provider = match lookup("STOREBOT_PROVIDER").as_deref() {
            Some("openai") => LlmProvider::OpenAi,
            _ => LlmProvider::OpenRouter,
        };

        let model = ModelConfig {
            provider,
            model_id: lookup("STOREBOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            api_base_url: lookup("OPENAI_API_BASE"),
            temperature: 0.0,
            max_tokens: 4096,
            max_turns: 8,
            timeout_secs: 60,
        };

        let session_capacity = lookup("STOREBOT_SESSION_CAPACITY")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_CAPACITY);

        Ok(Self {
            model,
            commerce: CommerceConfig::new(shop, access_token),
            session_capacity,
        })
    }
}

fn build_registry(commerce: &CommerceConfig) -> StorebotResult<ToolRegistry> {
    let client = Arc::new(CommerceClient::new(commerce)?);
    let mut registry = ToolRegistry::new();
    register_commerce_tools(&mut registry, client);
    Ok(registry)
}

async fn stream_reply(
    service: &AgentService,
    thread: &str,
    message: &str,
    stdout: &mut std::io::Stdout,
) -> anyhow::Result<()> {
    let (mut events, task) = service.stream_chat(thread, message);

    print!("Storebot: ");
    stdout.flush()?;
    while let Some(event) = events.recv().await {
        if let StreamEvent::TextDelta { text } = event {
            print!("{text}");
            stdout.flush()?;
        }
    }

    match task.await? {
        Ok(_) => println!("\n"),
        Err(e @ StorebotError::TurnLimitExceeded { .. }) => {
            println!("\nStorebot: (gave up: {e})\n");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

async fn run_chat(config: AppConfig, thread: String, stream: bool) -> anyhow::Result<()> {
    let registry = Arc::new(build_registry(&config.commerce)?);
    info!(tools = registry.tool_count(), "Tool registry ready");

    let runner = AgentRunner::new(config.model, registry)?;
    let service = AgentService::new(
        runner,
        Arc::new(SessionRegistry::with_capacity(config.session_capacity)),
    );

    println!("Storebot is ready. Type a message, or 'exit' to quit.");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }

        if stream {
            stream_reply(&service, &thread, message, &mut stdout).await?;
            continue;
        }

        match service.chat(&thread, message).await {
            Ok(reply) => println!("Storebot: {reply}\n"),
            Err(e @ StorebotError::TurnLimitExceeded { .. }) => {
                println!("Storebot: (gave up: {e})\n");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn list_tools(config: &AppConfig) -> StorebotResult<()> {
    let registry = build_registry(&config.commerce)?;
    let mut descriptors = registry.descriptors();
    descriptors.sort_by(|a, b| a.name.cmp(&b.name));
    for d in descriptors {
        println!("{:<18} {}", d.name, d.description);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Chat { thread, stream } => run_chat(config, thread, stream).await,
        Commands::Tools => Ok(list_tools(&config)?),
    }
}
