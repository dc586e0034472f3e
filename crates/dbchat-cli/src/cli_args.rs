//! CLI argument parsing for dbchat.

use clap::Parser;

#[derive(Parser, Clone)]
#[command(name = "dbchat")]
#[command(about = "Chat with an LLM about your database, from the terminal")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the configured provider (ollama, openai, openai-compatible, anthropic)
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Override the configured model
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// System context injected ahead of the first message
    #[arg(long, value_name = "TEXT")]
    pub system: Option<String>,

    /// List the provider's available models and exit
    #[arg(long)]
    pub models: bool,

    /// Prompt to send (if provided, runs one-shot instead of interactive)
    pub prompt: Option<String>,
}
