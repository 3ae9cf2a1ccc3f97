use anthropic_bridge::config::config_search_paths;
use anthropic_bridge::{openai_json_to_anthropic, BridgeConfig, UnsupportedImages};
use anyhow::Context;
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "anthropic-bridge",
    about = "Translate an OpenAI Chat Completions request into an Anthropic Messages request",
    version
)]
struct Cli {
    /// Request JSON file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// max_tokens to use when the request has none (overrides config)
    #[arg(long)]
    max_tokens: Option<u64>,

    /// Drop image parts that cannot be embedded instead of failing
    #[arg(long)]
    drop_unsupported: bool,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries only the translated request
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anthropic_bridge=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(());
    }

    let config = BridgeConfig::find_and_load(cli.config.as_deref())?;
    let mut options = config.options();
    if let Some(max_tokens) = cli.max_tokens {
        options.default_max_tokens = max_tokens;
    }
    if cli.drop_unsupported {
        options.unsupported_images = UnsupportedImages::Drop;
    }

    let raw = read_input(cli.input.as_deref())?;
    let body: serde_json::Value =
        serde_json::from_str(&raw).context("Input is not valid JSON")?;

    let translated = openai_json_to_anthropic(&body, &options)?;
    debug!(
        messages = translated.messages.len(),
        has_system = translated.system.is_some(),
        "Translated request"
    );

    let rendered = if cli.compact {
        serde_json::to_string(&translated)?
    } else {
        serde_json::to_string_pretty(&translated)?
    };
    println!("{rendered}");

    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
