mod cli_args;
mod reporter;
mod settings;

pub use cli_args::Cli;
pub use reporter::{ConsoleReporter, Reporter};
pub use settings::provider_settings;

use anyhow::Result;
use clap::Parser;
use dbchat_config::Config;
use dbchat_providers::{build_provider, ChatSession};
use rustyline::error::ReadlineError;
use tracing::debug;

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(provider) = &cli.provider {
        config.llm.provider = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.llm.model = Some(model.clone());
    }

    // Validation happens here, before any provider exists.
    config.llm.validate()?;
    let provider = build_provider(provider_settings(&config.llm)?);
    debug!(
        "Using provider '{}' with model '{}'",
        provider.name(),
        provider.model()
    );

    let mut session = ChatSession::new(provider);
    let reporter = ConsoleReporter;

    if cli.models {
        let models = session.list_models().await?;
        for model in models {
            reporter.notice(&model);
        }
        return Ok(());
    }

    if let Some(prompt) = &cli.prompt {
        let reply = session.send_message(prompt, cli.system.as_deref()).await?;
        reporter.assistant(&reply);
        return Ok(());
    }

    chat_loop(&mut session, &reporter, cli.system).await
}

/// Interactive loop. One request at a time: the prompt does not come back
/// until the in-flight call resolves, which is the serialization the
/// session requires of its caller.
async fn chat_loop(
    session: &mut ChatSession,
    reporter: &dyn Reporter,
    system: Option<String>,
) -> Result<()> {
    let mut rl = rustyline::DefaultEditor::new()?;
    let mut pending_system = system;

    reporter.notice("Connected. /models lists models, /clear resets the conversation, /quit exits.");

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    "/quit" | "/exit" => break,
                    "/clear" => {
                        session.clear_history();
                        reporter.notice("Conversation cleared.");
                    }
                    "/models" => match session.list_models().await {
                        Ok(models) => reporter.notice(&models.join("\n")),
                        Err(e) => reporter.error(&e),
                    },
                    _ => match session.send_message(line, pending_system.take().as_deref()).await {
                        Ok(reply) => reporter.assistant(&reply),
                        // Failures land in the transcript; the session and
                        // its history stay usable.
                        Err(e) => reporter.error(&e),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn initialize_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if cli.verbose {
        EnvFilter::from_default_env()
            .add_directive("dbchat_cli=debug".parse().unwrap())
            .add_directive("dbchat_config=debug".parse().unwrap())
            .add_directive("dbchat_providers=debug".parse().unwrap())
    } else {
        EnvFilter::from_default_env()
            .add_directive("dbchat_cli=info".parse().unwrap())
            .add_directive("dbchat_config=info".parse().unwrap())
            .add_directive("dbchat_providers=info".parse().unwrap())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}
