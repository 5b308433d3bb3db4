mod cache;
mod generate;
mod history;
mod improve;
mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jhatpat_core::ai::create_client_from_env;
use jhatpat_core::{AppConfig, DisplayLanguage, FileMedium, RecipeHistory, RecipeSession};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "jhatpat")]
#[command(about = "Jhatpat Recipes CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recipes from a list of ingredients
    Generate {
        /// Ingredients, e.g. "chicken, rice, ginger"
        ingredients: String,
        /// Select the Nth generated recipe (1-based) and fetch its image and translation
        #[arg(long)]
        select: Option<usize>,
    },
    /// List or search the recipe history
    History {
        /// Only recipes whose name or an ingredient contains this text
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Show a history entry (1-based, newest first)
    Show {
        index: usize,
        /// Which text to display
        #[arg(long, value_enum, default_value_t = LanguageArg::En)]
        language: LanguageArg,
        /// Fetch the image and translation first, if missing
        #[arg(long)]
        enrich: bool,
    },
    /// Ask for a modified version of a history entry
    Improve {
        /// History entry (1-based, newest first)
        index: usize,
        /// What to change, e.g. "make it vegan"
        request: String,
    },
    /// Print history changes made by other processes until interrupted
    Watch {
        /// Seconds between checks of the data directory
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
    /// Manage the AI response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show how many responses are cached
    Stats,
    /// Delete every cached response
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    /// Original English text
    #[value(alias = "original")]
    En,
    /// Translated text, falling back to English if there is none
    Translated,
}

impl From<LanguageArg> for DisplayLanguage {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => DisplayLanguage::Original,
            LanguageArg::Translated => DisplayLanguage::Translated,
        }
    }
}

/// Log to stderr, warnings and up unless `RUST_LOG` says otherwise.
fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open the persisted history. Does not need an AI provider.
pub(crate) fn open_history(config: &AppConfig) -> (Arc<FileMedium>, RecipeHistory) {
    let medium = Arc::new(FileMedium::new(&config.data_dir));
    let history = RecipeHistory::on_medium(medium.clone(), config.history_limit);
    history.load();
    (medium, history)
}

/// Open the history together with the configured AI client.
pub(crate) fn open_session(config: &AppConfig) -> Result<RecipeSession> {
    let client = create_client_from_env().context("AI client unavailable")?;
    let (_, history) = open_history(config);
    Ok(RecipeSession::new(
        client,
        history,
        config.translation_language.clone(),
    ))
}

/// Convert a 1-based index to 0-based, rejecting 0.
pub(crate) fn zero_based(index: usize) -> Result<usize> {
    index
        .checked_sub(1)
        .context("Indexes start at 1")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Generate {
            ingredients,
            select,
        } => {
            generate::generate(&config, &ingredients, select).await?;
        }
        Commands::History { query } => {
            history::list(&config, query.as_deref().unwrap_or(""));
        }
        Commands::Show {
            index,
            language,
            enrich,
        } => {
            history::show(&config, index, language.into(), enrich).await?;
        }
        Commands::Improve { index, request } => {
            improve::improve(&config, index, &request).await?;
        }
        Commands::Watch { interval } => {
            watch::watch(&config, interval).await?;
        }
        Commands::Cache { action } => match action {
            CacheAction::Stats => cache::stats(),
            CacheAction::Clear => cache::clear()?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_show_language() {
        let cli = Cli::try_parse_from(["jhatpat", "show", "2", "--language", "translated"]).unwrap();
        match cli.command {
            Commands::Show {
                index, language, ..
            } => {
                assert_eq!(index, 2);
                assert_eq!(language, LanguageArg::Translated);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_zero_index_is_rejected() {
        assert!(zero_based(0).is_err());
        assert_eq!(zero_based(1).unwrap(), 0);
    }
}
