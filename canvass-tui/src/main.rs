use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use canvass::{FileStorage, Persistence, Shell};
use canvass_tui::CanvassTui;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Author surveys and fill them in, in the terminal.
#[derive(Debug, Parser)]
#[command(name = "canvass-tui", version, about)]
struct Cli {
    /// Directory holding the saved survey.
    #[arg(long, default_value = ".canvass", global = true)]
    store_dir: PathBuf,

    /// Log file. Defaults to `canvass.log` inside the store directory.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Title shown at the top of the screen.
    #[arg(long, default_value = "Survey Builder")]
    title: String,

    /// Start in preview mode.
    #[arg(long)]
    preview: bool,

    /// Seed an empty store with an example survey.
    #[arg(long, value_name = "NAME", num_args = 0..=1, default_missing_value = "user-profile")]
    demo: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the saved questions.
    List,

    /// Write `survey.json` into a directory.
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Replace the saved survey with the content of a file.
    Import { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| cli.store_dir.join("canvass.log"));
    init_logging(&log_file)?;

    let mut shell = Shell::open(Persistence::new(FileStorage::new(&cli.store_dir)));

    if let Some(name) = &cli.demo {
        seed_demo(&mut shell, name)?;
    }

    match cli.command {
        Some(Command::List) => {
            for (index, question) in shell.survey().iter().enumerate() {
                let required = if question.is_required() { " *" } else { "" };
                println!(
                    "{}. {}{required} [{}]",
                    index + 1,
                    question.question_text(),
                    question.kind()
                );
                for option in question.options() {
                    println!("     - {option}");
                }
            }
        }
        Some(Command::Export { out }) => {
            let path = shell
                .export_to_dir(&out)
                .map_err(|notice| anyhow::anyhow!("{notice}"))?;
            println!("{}", path.display());
        }
        Some(Command::Import { file }) => {
            shell
                .import_from_file(&file)
                .map_err(|notice| anyhow::anyhow!("{notice}"))?;
            if let Some(notice) = shell.take_notice() {
                println!("{notice}");
            }
        }
        None => {
            if cli.preview {
                shell.toggle_view();
            }
            let export_dir = std::env::current_dir().context("cannot read current directory")?;
            let submissions = CanvassTui::new()
                .with_title(cli.title)
                .with_export_dir(export_dir)
                .run(shell)?;
            for submission in &submissions {
                println!("{}", serde_json::to_string_pretty(submission)?);
            }
        }
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn seed_demo(shell: &mut Shell<FileStorage>, name: &str) -> anyhow::Result<()> {
    if !shell.survey().is_empty() {
        tracing::info!("store is not empty, skipping demo survey");
        return Ok(());
    }
    let survey = example_surveys::by_name(name).with_context(|| {
        let names: Vec<_> = example_surveys::all().into_iter().map(|(n, _)| n).collect();
        format!("unknown demo survey {name:?}, expected one of {}", names.join(", "))
    })?;
    let json = serde_json::to_string(&survey)?;
    shell
        .import_json(&json)
        .map_err(|notice| anyhow::anyhow!("{notice}"))?;
    shell.take_notice();
    tracing::info!(demo = name, "seeded demo survey");
    Ok(())
}
