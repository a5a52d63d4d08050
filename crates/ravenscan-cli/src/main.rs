mod render;

use anyhow::{bail, Context};
use clap::Parser;
use ravenscan_cache::{KeyValueStore, SqliteStore};
use ravenscan_core::{
    credentials::mask_key,
    models::{BrandCheckResult, Query, Rating},
    providers::{HttpFeedbackSink, RavenScanProvider},
    Config, CredentialStore, FeedbackEmitter, FeedbackSink, HealthReport, HistoryCache,
    LogFeedbackSink, SearchOrchestrator, ThemePreference, ThemeStore,
};
use render::{render_history, render_result, Palette};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ravenscan")]
#[command(version, about = "Check brand name availability across domains, social handles and search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Brand-check service URL (overrides the config file)
    #[arg(long, global = true, env = "RAVENSCAN_API_URL")]
    api_url: Option<String>,

    /// Local database path (overrides the config file)
    #[arg(long, global = true, env = "RAVENSCAN_DB")]
    db: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log what's happening to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check a brand name and save the result to history
    #[command(alias = "search")]
    Check {
        /// Brand name or username (at least 3 characters)
        name: String,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse past searches
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Rate the last search (positive, neutral, negative)
    Feedback {
        rating: Rating,
        /// Query the rating is about; defaults to the most recent search
        #[arg(long)]
        query: Option<String>,
    },
    /// Print a local liveness report
    Status,
}

#[derive(clap::Subcommand)]
enum HistoryAction {
    /// List past searches, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show the stored result of one search
    Show {
        id: u64,
        #[arg(long)]
        json: bool,
    },
    /// Run a past search again
    Rerun { id: u64 },
    /// Remove one search by id, or by its position in the list
    Delete {
        id: Option<u64>,
        #[arg(long, conflicts_with = "id")]
        position: Option<usize>,
    },
    /// Remove all searches
    Clear,
}

#[derive(clap::Subcommand)]
enum KeyAction {
    /// Store the API key (read from stdin when omitted)
    Set { value: Option<String> },
    /// Show the stored key, masked
    Show,
    /// Forget the stored key
    Clear,
}

#[derive(clap::Subcommand)]
enum ThemeAction {
    Show,
    Set { theme: ThemePreference },
    Toggle,
}

/// Everything a command needs, opened once per invocation
struct Session {
    config: Config,
    store: Arc<dyn KeyValueStore>,
    themes: ThemeStore,
    palette: Palette,
}

impl Session {
    fn open(config: Config, no_color: bool) -> anyhow::Result<Self> {
        let db_path = config.db_path()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open {}", db_path.display()))?,
        );

        let ambient = std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| ThemePreference::from_colorfgbg(&value));
        let themes = ThemeStore::new(store.clone()).with_ambient(ambient);

        let colour = !no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        let palette = if colour {
            Palette::for_theme(themes.get()?)
        } else {
            Palette::plain()
        };

        Ok(Self {
            config,
            store,
            themes,
            palette,
        })
    }

    fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.store.clone())
    }

    fn history(&self) -> Arc<HistoryCache> {
        Arc::new(HistoryCache::new(self.store.clone()))
    }

    fn orchestrator(&self) -> anyhow::Result<SearchOrchestrator> {
        let provider = RavenScanProvider::from_config(&self.config.api)?;
        Ok(SearchOrchestrator::new(
            Arc::new(provider),
            self.credentials(),
            self.history(),
        ))
    }

    fn feedback(&self) -> anyhow::Result<FeedbackEmitter> {
        let sink: Arc<dyn FeedbackSink> = match &self.config.feedback.url {
            Some(url) => Arc::new(HttpFeedbackSink::new(url.clone())?),
            None => Arc::new(LogFeedbackSink),
        };
        Ok(FeedbackEmitter::new(sink))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "ravenscan=info"
    } else {
        "ravenscan=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(db) = cli.db {
        config.storage.db_path = Some(db);
    }

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("No command specified. Try --help");
            return Ok(());
        }
    };

    // Storage is opened per command, so `status` works without it
    let no_color = cli.no_color;
    let open_session = || Session::open(config.clone(), no_color);

    match command {
        Commands::Status => println!("{}", status_report(&config)?),
        Commands::Check { name, json } => {
            let session = open_session()?;
            tracing::info!("Searching for: {}", name);
            let result = search_or_explain(session.orchestrator()?.search(&name).await)?;
            print_result(&session, &result, json)?;
            eprintln!("✅ Search completed and saved!");
        }
        Commands::History { action } => {
            let session = open_session()?;
            run_history(&session, action.unwrap_or(HistoryAction::List { json: false })).await?
        }
        Commands::Key { action } => run_key(&open_session()?, action)?,
        Commands::Theme { action } => {
            let session = open_session()?;
            let themes = &session.themes;
            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => println!("{}", themes.get()?),
                ThemeAction::Set { theme } => {
                    themes.set(theme)?;
                    println!("Theme set to {}", theme);
                }
                ThemeAction::Toggle => println!("Theme set to {}", themes.toggle()?),
            }
        }
        Commands::Feedback { rating, query } => {
            let session = open_session()?;
            let query = match query {
                Some(raw) => Query::parse(&raw)?,
                None => match session.history().list()?.into_iter().next() {
                    Some(latest) => latest.query,
                    None => bail!("Nothing to rate yet - run a search first or pass --query"),
                },
            };

            let handle = session.feedback()?.submit(rating, &query);
            match handle.outcome().await {
                Ok(()) => println!("Thanks for your feedback!"),
                Err(e) => eprintln!("Failed to submit feedback: {}", e),
            }
        }
    }

    Ok(())
}

async fn run_history(session: &Session, action: HistoryAction) -> anyhow::Result<()> {
    let history = session.history();

    match action {
        HistoryAction::List { json } => {
            let entries = history.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", render_history(&entries, &session.palette));
            }
        }
        HistoryAction::Show { id, json } => {
            let Some(entry) = history.get(id)? else {
                bail!("No history entry #{}", id);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entry)?);
            } else {
                println!(
                    "#{} \"{}\" searched {}\n",
                    entry.id,
                    entry.query,
                    entry.timestamp.with_timezone(&chrono::Local).format("%Y-%m-%d at %H:%M:%S")
                );
                print!("{}", render_result(&entry.result, &session.palette));
            }
        }
        HistoryAction::Rerun { id } => {
            let result = search_or_explain(session.orchestrator()?.rerun(id).await)?;
            print_result(session, &result, false)?;
            eprintln!("✅ Search completed and saved!");
        }
        HistoryAction::Delete { id, position } => {
            let removed = match (id, position) {
                (Some(id), _) => history.delete(id)?,
                (None, Some(position)) => history.delete_at(position)?.is_some(),
                (None, None) => bail!("Pass an entry id or --position"),
            };
            if removed {
                println!("🗑️ Removed from history");
            } else {
                println!("Nothing to remove");
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("History cleared");
        }
    }

    Ok(())
}

fn run_key(session: &Session, action: KeyAction) -> anyhow::Result<()> {
    let credentials = session.credentials();

    match action {
        KeyAction::Set { value } => {
            let value = match value {
                Some(value) => value,
                None => read_key_from_stdin()?,
            };
            if value.trim().is_empty() {
                eprintln!("Warning: stored an empty key, searches will ask for one");
            }
            credentials.set(&value)?;
            println!("API key saved");
        }
        KeyAction::Show => match credentials.get()? {
            Some(key) => println!("{}", mask_key(&key)),
            None => println!("No API key stored"),
        },
        KeyAction::Clear => {
            credentials.clear()?;
            println!("API key removed");
        }
    }

    Ok(())
}

fn read_key_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read API key from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

/// Add a hint for the one failure users can fix themselves
fn search_or_explain(
    outcome: ravenscan_core::Result<BrandCheckResult>,
) -> anyhow::Result<BrandCheckResult> {
    outcome.map_err(|e| {
        if e.status() == Some(401) {
            anyhow::Error::new(e).context("Search failed - check your key with `ravenscan key set`")
        } else {
            anyhow::Error::new(e).context("Search failed")
        }
    })
}

fn status_report(config: &Config) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&HealthReport::collect(config))?)
}

fn print_result(session: &Session, result: &BrandCheckResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", render_result(result, &session.palette));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["ravenscan", "check", "rav", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Check { ref name, json: true }) if name == "rav"
        ));
    }

    #[test]
    fn test_parse_feedback_rating() {
        let cli = Cli::try_parse_from(["ravenscan", "feedback", "negative"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Feedback { rating: Rating::Negative, query: None })
        ));
        assert!(Cli::try_parse_from(["ravenscan", "feedback", "stellar"]).is_err());
    }

    #[test]
    fn test_delete_id_and_position_conflict() {
        assert!(Cli::try_parse_from(["ravenscan", "history", "delete", "3", "--position", "0"]).is_err());
        assert!(Cli::try_parse_from(["ravenscan", "history", "delete", "--position", "0"]).is_ok());
    }

    #[test]
    fn test_parse_theme_set() {
        let cli = Cli::try_parse_from(["ravenscan", "theme", "set", "dark"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Theme { action: Some(ThemeAction::Set { theme: ThemePreference::Dark }) })
        ));
    }

    #[test]
    fn test_status_needs_no_storage() {
        let mut config = Config::default();
        config.storage.db_path = Some(PathBuf::from("/dev/null/ravenscan/ravenscan.db"));

        assert!(Session::open(config.clone(), true).is_err());

        let report = status_report(&config).unwrap();
        assert!(report.contains("healthy"));
    }
}
