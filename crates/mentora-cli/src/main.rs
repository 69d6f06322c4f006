use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mentora_core::{
    CoachConfig, CoachOrchestrator, CoachSession, ProgressTracker, RecommendationEngine,
    ScenarioPool, StageClassifier, SubmitReport,
};
use mentora_memory::{HistoryStore, ReflectionJournal};
use mentora_schema::{ProgressState, Role, Turn};

#[derive(Parser)]
#[command(name = "mentora", version, about = "Stage-aware AI coaching CLI")]
struct Cli {
    #[arg(
        long,
        default_value = "~/.mentora/config.yaml",
        help = "Config file (missing file means defaults)"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Interactive coaching session")]
    Chat,
    #[command(subcommand, about = "History snapshot management")]
    History(HistoryCommands),
    #[command(about = "Replay a snapshot into a progress report")]
    Progress {
        #[arg(help = "Snapshot path; the latest slot when omitted")]
        snapshot: Option<PathBuf>,
    },
    #[command(about = "Practice on a randomly drawn workplace scenario")]
    Simulate,
    #[command(about = "Append a note to the reflection journal")]
    Reflect {
        #[arg(help = "The reflection text")]
        text: String,
    },
    #[command(about = "Validate the config file")]
    Validate,
}

#[derive(Subcommand)]
enum HistoryCommands {
    #[command(about = "List snapshot slots, oldest first")]
    List,
    #[command(about = "Print one snapshot, newest turn first")]
    Show { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config_path = expand_home(&cli.config);
    let mut config = CoachConfig::load_or_default(&config_path)?;
    config.history_dir = expand_home(&config.history_dir);

    match cli.command {
        Commands::Chat => run_chat(config).await,
        Commands::History(cmd) => run_history(config, cmd).await,
        Commands::Progress { snapshot } => run_progress(config, snapshot).await,
        Commands::Simulate => run_simulate(),
        Commands::Reflect { text } => run_reflect(config, &text).await,
        Commands::Validate => run_validate(&config_path),
    }
}

/// Expand a leading `~` against `$HOME`.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = std::io::stdin().read_line(&mut line)?;
    if read == 0 {
        // EOF behaves like /quit
        return Ok("/quit".to_string());
    }
    Ok(line.trim().to_string())
}

async fn run_chat(config: CoachConfig) -> Result<()> {
    let orch = CoachOrchestrator::from_config(config)?;
    let mut session = orch.new_session();

    println!("mentora: how are you feeling, and what do you want to learn?");
    println!("Commands: /progress /recommend /history /quit");

    loop {
        let feeling = prompt("feeling> ")?;
        match feeling.as_str() {
            "/quit" => break,
            "/progress" => {
                print_progress(&session.progress_snapshot());
                continue;
            }
            "/recommend" => {
                let tag = orch.recommendation(&session);
                println!("Suggestion: {} ({})", tag.label(), tag.url());
                continue;
            }
            "/history" => {
                for slot in orch.history().list().await? {
                    println!("{}", slot.display());
                }
                continue;
            }
            _ => {}
        }
        let learning_goal = prompt("learning goal> ")?;
        if learning_goal == "/quit" {
            break;
        }

        let report = orch.submit(&mut session, &feeling, &learning_goal).await?;
        print_report(&report);
        render_log(&session);
    }

    Ok(())
}

fn print_report(report: &SubmitReport) {
    println!("sentiment: {}  stage: {}", report.sentiment, report.stage.display_name());
    if let Err(e) = &report.reply {
        eprintln!("The coach could not reply: {e}");
    }
    if let Some(e) = &report.persistence_error {
        eprintln!("History was not saved: {e}");
    }
}

fn render_log(session: &CoachSession) {
    for turn in session.log.latest_first() {
        print_turn(turn);
    }
}

fn print_turn(turn: &Turn) {
    let speaker = match turn.role {
        Role::User => "🙂",
        _ => "🤖",
    };
    println!(
        "{speaker} ({}): {}",
        turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
        turn.content
    );
}

async fn run_history(config: CoachConfig, cmd: HistoryCommands) -> Result<()> {
    let store = HistoryStore::new(&config.history_dir);
    match cmd {
        HistoryCommands::List => {
            let slots = store.list().await?;
            if slots.is_empty() {
                println!("No snapshots in {}", store.dir().display());
            }
            for slot in slots {
                println!("{}", slot.display());
            }
        }
        HistoryCommands::Show { path } => {
            let turns = store.load(&path).await?;
            for turn in turns.iter().rev() {
                print_turn(turn);
            }
        }
    }
    Ok(())
}

/// Progress is session-local; replay a snapshot's user turns through the
/// classifier to reconstruct the per-stage series.
async fn run_progress(config: CoachConfig, snapshot: Option<PathBuf>) -> Result<()> {
    let classifier = StageClassifier::new(&config.stage_keywords);
    let store = HistoryStore::new(&config.history_dir);
    let turns = match snapshot {
        Some(path) => store.load(&path).await?,
        None => store
            .load_latest()
            .await?
            .context("no snapshots to report on")?,
    };

    let mut tracker = ProgressTracker::new();
    for turn in turns.iter().filter(|t| t.role == Role::User) {
        tracker.record(classifier.classify(&turn.content));
    }
    let state = tracker.snapshot();
    print_progress(&state);

    let engine = RecommendationEngine::new(config.recommendation_threshold);
    let tag = engine.recommend(&state);
    println!("Suggestion: {} ({})", tag.label(), tag.url());
    Ok(())
}

fn print_progress(state: &ProgressState) {
    println!("Dialogue count by learning stage:");
    for (stage, count) in state.series() {
        println!(
            "{:<13} {:>3} {}",
            stage.display_name(),
            count,
            "█".repeat(count as usize)
        );
    }
}

fn run_simulate() -> Result<()> {
    let pool = ScenarioPool::default();
    let scenario = pool.draw().to_string();
    println!("Scenario: {scenario}");
    let response = prompt("How would you handle this? ")?;
    if response != "/quit" {
        println!("🤖 Coach feedback: {}", pool.feedback(&response));
    }
    Ok(())
}

async fn run_reflect(config: CoachConfig, text: &str) -> Result<()> {
    let journal = ReflectionJournal::new(&config.history_dir);
    journal.append(text).await?;
    println!("Reflection saved.");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<()> {
    if !config_path.exists() {
        println!(
            "No config at {}; defaults apply.",
            config_path.display()
        );
        return Ok(());
    }
    CoachConfig::load(config_path)?;
    println!("Config OK: {}", config_path.display());
    Ok(())
}
