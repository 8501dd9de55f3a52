mod gateway;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tempo_channels::telegram::TelegramChannel;
use tempo_core::{config, context::Context, traits::Provider};
use tempo_providers::intent::{parse_intent, TimerIntent, INTENT_SYSTEM_PROMPT};
use tempo_providers::openai::OpenAiProvider;

#[derive(Parser)]
#[command(
    name = "tempo",
    version,
    about = "Tempo — a Telegram countdown bot with an AI-interpreted trigger"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and provider availability.
    Status,
    /// Resolve a message into a timer intent and print it (no messages
    /// are sent).
    Resolve {
        /// Override the provider's configured model for this request.
        #[arg(long)]
        model: Option<String>,
        /// The message to interpret.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.tempo.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            cfg.validate()?;

            let provider = build_provider(&cfg)?;
            if !provider.is_available().await {
                tracing::warn!(
                    "provider '{}' is not reachable — countdowns will use default durations",
                    provider.name()
                );
            }

            // validate() guarantees the telegram section is present.
            let tg = cfg
                .channel
                .telegram
                .clone()
                .ok_or_else(|| anyhow::anyhow!("telegram channel is not configured"))?;
            let channel = Arc::new(TelegramChannel::new(tg));

            println!("Tempo — starting bot...");
            let gw = Arc::new(gateway::Gateway::new(provider, channel, &cfg)?);
            gw.run().await?;
        }
        Commands::Status => {
            println!("Tempo — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Provider: {}", cfg.provider.default);

            let provider = build_provider(&cfg)?;
            println!(
                "  {}: {}",
                provider.name(),
                if provider.is_available().await {
                    "available"
                } else {
                    "not available"
                }
            );
            println!();

            match cfg.channel.telegram {
                Some(ref tg) => {
                    println!(
                        "  telegram: {}",
                        if tg.enabled && !tg.bot_token.is_empty() {
                            "configured"
                        } else if tg.enabled {
                            "enabled but missing bot_token"
                        } else {
                            "disabled"
                        }
                    );
                    println!("  countdown chat: {}", tg.group_chat_id);
                    println!("  allowed users: {}", tg.allowed_users.len());
                }
                None => println!("  telegram: not configured"),
            }
            println!("  trigger word: {:?}", cfg.timer.trigger_word);
        }
        Commands::Resolve { model, message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: tempo resolve <message>");
            }

            let text = message.join(" ");
            let provider = build_provider(&cfg)?;
            let mut ctx = Context::new(INTENT_SYSTEM_PROMPT, &text);
            ctx.model = model;
            let raw = match provider.complete(&ctx).await {
                Ok(resp) => resp.text,
                Err(e) => {
                    eprintln!("completion failed ({e}), showing fallback intent");
                    String::new()
                }
            };

            match parse_intent(&raw) {
                TimerIntent::Skip => println!("no timer intent"),
                TimerIntent::Countdown {
                    duration_secs,
                    caption,
                    answer,
                } => {
                    println!("duration: {duration_secs}s");
                    println!("caption:  {caption}");
                    println!("answer:   {answer}");
                }
            }
        }
    }

    Ok(())
}

/// Build the configured provider.
fn build_provider(cfg: &config::Config) -> anyhow::Result<Arc<dyn Provider>> {
    match cfg.provider.default.as_str() {
        "openai" => {
            let ai = cfg.provider.openai.clone().unwrap_or_default();
            Ok(Arc::new(OpenAiProvider::from_config(
                ai.base_url,
                ai.api_key,
                ai.model,
            )))
        }
        other => anyhow::bail!("unsupported provider: {other}"),
    }
}
