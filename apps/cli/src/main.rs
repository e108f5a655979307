use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use videotutor_core::{
    AppConfig, CommandClipboard, CopyOutcome, FallbackSink, FetchOutcome, HttpTranscriptProvider, InitScope,
    JsonFilePreferenceStore, MessageOptions, Preferences, SessionState, TranscriptProvider,
    build_context_snippet, build_init_message, copy_text, load_config,
    paths::{get_config_path, get_preferences_path},
    require_video_id,
};

mod player;
mod watch;

/// CLI wrapper for InitScope (needed for clap ValueEnum)
#[derive(Clone, Copy, ValueEnum)]
enum CliScope {
    Timestamped,
    Plain,
}

impl From<CliScope> for InitScope {
    fn from(cli: CliScope) -> Self {
        match cli {
            CliScope::Timestamped => InitScope::Timestamped,
            CliScope::Plain => InitScope::Plain,
        }
    }
}

#[derive(Parser)]
#[command(name = "videotutor")]
#[command(
    about = "Prepare YouTube video context for an AI assistant and take notes synced to playback"
)]
struct Cli {
    /// Config file (defaults to the videotutor config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print or copy the one-time initialization message
    Init {
        /// Video URL or id
        url: String,

        /// Transcript rendering; remembered for later sessions
        #[arg(short, long)]
        scope: Option<CliScope>,

        /// Earlier conversations to mention (repeatable)
        #[arg(short, long)]
        related: Vec<String>,

        /// Leave the video description out
        #[arg(long)]
        no_description: bool,

        /// Do not ask for summaries up front
        #[arg(long)]
        no_summary: bool,

        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,

        /// Transcript text to use if the fetch fails
        #[arg(short, long)]
        manual: Option<PathBuf>,
    },

    /// Print the context line for a question asked at a given time
    Snippet {
        /// Video URL or id
        url: String,

        /// Playback time (`m:ss`, `h:mm:ss` or seconds)
        #[arg(short, long)]
        at: String,
    },

    /// Follow a simulated playback and take notes interactively
    Watch {
        /// Video URL or id
        url: String,

        /// Start position (`m:ss`, `h:mm:ss` or seconds)
        #[arg(short, long)]
        start: Option<String>,

        /// Transcript text to use if the fetch fails
        #[arg(short, long)]
        manual: Option<PathBuf>,
    },
}

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}

/// Prints what could not reach the clipboard.
pub struct StdoutFallback;

impl FallbackSink for StdoutFallback {
    fn write_sync(&self, text: &str) -> bool {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", text);
        true
    }
}

pub async fn copy_or_print(text: &str) -> CopyOutcome {
    copy_text(&CommandClipboard::default(), &StdoutFallback, text).await
}

/// One status line per copy, naming where the text actually went.
pub fn report_copy(outcome: CopyOutcome, what: &str) -> String {
    match outcome {
        CopyOutcome::Clipboard => format!("{} {} copied", style("✓").green().bold(), what),
        CopyOutcome::Fallback => format!(
            "{} {} printed above (clipboard unavailable)",
            style("!").yellow().bold(),
            what
        ),
        CopyOutcome::Failed => format!("{} {} could not be delivered", style("✗").red().bold(), what),
    }
}

/// Fetch the video into a fresh session. On failure, fall back to a
/// transcript file when one was given.
pub async fn load_session(
    provider: &impl TranscriptProvider,
    url: &str,
    scope: InitScope,
    manual: Option<&PathBuf>,
) -> Result<SessionState> {
    let video_id = require_video_id(url)?;
    let mut session = SessionState::with_scope(scope);
    let tag = session.begin_load(&video_id);

    let spinner = create_spinner("Fetching transcript...");
    let result = provider.fetch(&video_id).await;

    match session.apply_fetch(&tag, result) {
        FetchOutcome::Applied => {
            spinner.finish_with_message(format!(
                "{} Loaded: {} {}",
                style("✓").green().bold(),
                style(session.video_title()).bold(),
                style(format!(
                    "[{} entries, {} chapters]",
                    session.entries().len(),
                    session.chapters().len()
                ))
                .dim()
            ));
        }
        FetchOutcome::Stale => bail!("transcript response for {} was superseded", video_id),
        FetchOutcome::Failed { message } => {
            spinner.finish_with_message(format!("{} {}", style("✗").red().bold(), message));
            let Some(path) = manual else {
                bail!("{message}\nPass --manual <file> to supply the transcript text yourself");
            };
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if !session.apply_manual_transcript(&text) {
                bail!("{} is empty", path.display());
            }
            println!(
                "{} Using manual transcript from {}",
                style("✓").green().bold(),
                style(path.display()).dim()
            );
        }
    }

    Ok(session)
}

pub fn open_preferences(config: &AppConfig) -> (JsonFilePreferenceStore, Preferences) {
    let store = JsonFilePreferenceStore::open(&get_preferences_path());
    let defaults = Preferences {
        scope: config.message.scope(),
        options: config.message.options(),
    };
    let prefs = Preferences::load(&store, defaults);
    (store, prefs)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(get_config_path);
    let config = load_config(&config_path);
    init_tracing(&config.logging.log_level);

    let provider = HttpTranscriptProvider::new(&config.provider)?;
    let (mut store, mut prefs) = open_preferences(&config);

    match cli.command {
        Command::Init {
            url,
            scope,
            related,
            no_description,
            no_summary,
            copy,
            manual,
        } => {
            if let Some(scope) = scope {
                prefs.scope = scope.into();
                if let Err(err) = prefs.save(&mut store) {
                    warn!("Failed to save preferences: {err}");
                }
            }
            let options = MessageOptions {
                include_description: prefs.options.include_description && !no_description,
                summary: prefs.options.summary && !no_summary,
                chapter_summary: prefs.options.chapter_summary && !no_summary,
            };

            let session = load_session(&provider, &url, prefs.scope, manual.as_ref()).await?;
            let message = build_init_message(&session, &options, &related);

            if copy {
                let outcome = copy_or_print(&message).await;
                println!(
                    "{} {}",
                    report_copy(outcome, "Initialization message"),
                    style(format!("({} chars)", message.chars().count())).dim()
                );
            } else {
                println!("{}", style("─".repeat(60)).dim());
                println!("{}", message);
            }
        }
        Command::Snippet { url, at } => {
            let seconds = videotutor_core::parse_timestamp(&at)
                .with_context(|| format!("Invalid time: {at}"))?;
            let mut session = load_session(&provider, &url, prefs.scope, None).await?;
            session.set_current_time(seconds);
            println!("{}", build_context_snippet(&session));
        }
        Command::Watch { url, start, manual } => {
            let start = match start {
                Some(raw) => videotutor_core::parse_timestamp(&raw)
                    .with_context(|| format!("Invalid start time: {raw}"))?,
                None => 0.0,
            };
            let session = load_session(&provider, &url, prefs.scope, manual.as_ref()).await?;
            watch::run(session, start, prefs, store).await?;
        }
    }

    Ok(())
}
