use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tldw_core::{
    Config, FileStore, HttpBackend, PlayerApiRegistry, PlayerCommand, PlayerController,
    SeekOutcome, Session, SourceKind, Tab, Viewport, format_transcript_with_timestamps,
    layout_forest, player::FrameTarget, save_export,
};
use tracing_subscriber::EnvFilter;

mod render;

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for SourceKind (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliSource {
    #[default]
    Youtube,
    Web,
    Text,
}

impl From<CliSource> for SourceKind {
    fn from(cli: CliSource) -> Self {
        match cli {
            CliSource::Youtube => SourceKind::Youtube,
            CliSource::Web => SourceKind::Web,
            CliSource::Text => SourceKind::Text,
        }
    }
}

/// CLI wrapper for Tab
#[derive(Clone, Copy, ValueEnum)]
enum CliTab {
    Overview,
    Chapters,
    Terms,
    Flashcards,
    Quiz,
    Transcript,
    Mindmap,
    Chat,
}

impl From<CliTab> for Tab {
    fn from(cli: CliTab) -> Self {
        match cli {
            CliTab::Overview => Tab::Overview,
            CliTab::Chapters => Tab::Chapters,
            CliTab::Terms => Tab::Terms,
            CliTab::Flashcards => Tab::Flashcards,
            CliTab::Quiz => Tab::Quiz,
            CliTab::Transcript => Tab::Transcript,
            CliTab::Mindmap => Tab::Mindmap,
            CliTab::Chat => Tab::Chat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CopyTarget {
    Overview,
    Transcript,
}

#[derive(Parser)]
#[command(name = "tldw")]
#[command(about = "Summarize videos, articles and text, then browse the result")]
struct Cli {
    /// Summarization service base URL (overrides TLDW_BACKEND_URL)
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Directory holding the persisted session (overrides TLDW_STATE_DIR)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a video URL, article URL or text
    Analyze {
        input: String,

        #[arg(short, long, default_value = "youtube")]
        source: CliSource,
    },
    /// Load a payload from a JSON file instead of calling the service
    Load {
        file: PathBuf,

        #[arg(short, long, default_value = "youtube")]
        source: CliSource,

        /// Raw URL or text the payload was produced from
        #[arg(short, long, default_value = "")]
        input: String,
    },
    /// Show a tab of the current result
    Show { tab: Option<CliTab> },
    /// Write the result as JSON
    Export {
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the overview or the timestamped transcript
    Copy { target: CopyTarget },
    /// Ask a follow-up question about the result
    Chat { message: String },
    /// Send a seek command for the current video
    Seek { time: String },
    /// Print mind-map coordinates
    Layout {
        /// Wheel notches; negative zooms in
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        zoom: i32,

        /// Pan offset as `x,y`
        #[arg(long, allow_hyphen_values = true)]
        pan: Option<String>,
    },
    /// Forget the current result, input and chat
    Reset,
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Message-mode player target: posted commands go to stdout as JSON
struct StdoutFrame;

impl FrameTarget for StdoutFrame {
    fn post_message(&self, command: &PlayerCommand) {
        match serde_json::to_string(command) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!("Failed to encode player command: {}", e),
        }
    }
}

fn parse_pan(raw: &str) -> Result<(f64, f64)> {
    let (x, y) = raw
        .split_once(',')
        .context("pan must look like `x,y`")?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn header() {
    println!(
        "\n{}  {}\n",
        style("tldw").cyan().bold(),
        style("Content Summary").dim()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(backend) = cli.backend {
        config.backend_url = backend;
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }

    let mut session = Session::open(FileStore::new(&config.state_dir), config.response_policy);
    let backend = HttpBackend::new(&config.backend_url);

    match cli.command {
        Command::Analyze { input, source } => {
            session.select_source(source.into())?;
            session.set_input(input)?;

            header();
            let started = Instant::now();
            let spinner = create_spinner(&format!("Analyzing with {}...", config.backend_url))?;
            let applied = session.analyze(&backend).await;
            spinner.finish_and_clear();

            if !applied? {
                println!("{} A newer request replaced this one", style("!").yellow().bold());
                return Ok(());
            }
            println!(
                "{} Analyzed {}",
                style("✓").green().bold(),
                style(format!("[{}]", format_duration(started.elapsed()))).dim()
            );
            println!("{}", style("─".repeat(60)).dim());
            show(&mut session, Some(Tab::Overview), &config)?;
        }
        Command::Load {
            file,
            source,
            input,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&content)?;

            session.select_source(source.into())?;
            session.set_input(input)?;
            let ticket = session.begin_analysis();
            session.complete_analysis(ticket, &payload)?;
            println!("{} Loaded {}", style("✓").green().bold(), file.display());
        }
        Command::Show { tab } => show(&mut session, tab.map(Into::into), &config)?,
        Command::Export { out } => {
            let Some(result) = session.matching_result() else {
                bail!("nothing to export, run `tldw analyze` first");
            };
            let path = save_export(result, &out).await?;
            println!("{} {}", style("Saved:").dim(), style(path.display()).cyan());
        }
        Command::Copy { target } => {
            let Some(result) = session.matching_result() else {
                bail!("nothing to copy, run `tldw analyze` first");
            };
            match target {
                CopyTarget::Overview => println!("{}", result.overview),
                CopyTarget::Transcript => {
                    println!("{}", format_transcript_with_timestamps(&result.transcript))
                }
            }
        }
        Command::Chat { message } => {
            let spinner = create_spinner("Thinking...")?;
            let answer = session.chat(&backend, &message).await;
            spinner.finish_and_clear();
            println!("{} {}", style("tldw:").green().bold(), answer?);
        }
        Command::Seek { time } => {
            let video_id = session.matching_result().and_then(|r| r.video_id.clone());
            if video_id.is_none() {
                println!("{} No video loaded", style("!").yellow().bold());
                return Ok(());
            }

            let mut player = PlayerController::new(std::sync::Arc::new(PlayerApiRegistry::new()));
            player.attach_frame(StdoutFrame);
            if let SeekOutcome::Ignored(reason) = player.seek(time.as_str()) {
                println!("{} Seek ignored: {:?}", style("!").yellow().bold(), reason);
            }
        }
        Command::Layout { zoom, pan } => {
            let Some(result) = session.matching_result() else {
                bail!("no result, run `tldw analyze` first");
            };

            let mut viewport = Viewport::new();
            for _ in 0..zoom.unsigned_abs() {
                viewport.wheel(zoom.signum() as f64);
            }
            if let Some(pan) = pan {
                let (dx, dy) = parse_pan(&pan)?;
                viewport.press(0.0, 0.0);
                viewport.move_to(dx, dy);
                viewport.release();
            }

            let nodes = layout_forest(&result.mindmap, &config.layout);
            print!("{}", render::render_mindmap(&nodes, &viewport.transform()));
        }
        Command::Reset => {
            session.reset()?;
            println!("{} Session cleared", style("✓").green().bold());
        }
    }

    Ok(())
}

fn show(session: &mut Session<FileStore>, tab: Option<Tab>, config: &Config) -> Result<()> {
    if let Some(tab) = tab {
        session.set_tab(tab)?;
    }
    let state = session.state();
    let Some(result) = session.matching_result() else {
        println!(
            "{} No result for source {}, run `tldw analyze` first",
            style("!").yellow().bold(),
            state.source_kind
        );
        return Ok(());
    };

    print!(
        "{}",
        render::render_tab(state, result, state.active_tab, &config.layout)
    );
    Ok(())
}
