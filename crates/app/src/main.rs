//! Terminal exam simulator.
//!
//! Loads a JSON question file, runs a practice exam on stdin/stdout and keeps
//! progress in SQLite so an interrupted exam can be resumed.

mod cli;
mod commands;
mod logging;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::BufReader;

use cli::{Cli, Command, normalize_sqlite_url, prepare_sqlite_file};
use services::{Clock, ExamLoopService, ProgressService, QuestionBank};
use storage::repository::Storage;
use terminal::Terminal;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(2);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let path = cli.questions_path()?;
    let bank = QuestionBank::load(path)
        .await
        .with_context(|| format!("load question file {}", path.display()))?;

    if cli.command == Some(Command::Categories) {
        for category in bank.category_counts() {
            println!("{} ({})", category.name, category.count);
        }
        return Ok(());
    }

    // Open + migrate SQLite in the binary glue so services stay storage-agnostic.
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let storage = Storage::sqlite(&db_url)
        .await
        .with_context(|| format!("open progress store {db_url}"))?;
    tracing::debug!(db = %db_url, file = %bank.filename(), "progress store ready");

    let progress = ProgressService::new(Clock::default_clock(), storage.slots.clone());
    let exam_loop = ExamLoopService::new(progress);
    let config = cli.exam_config(&bank);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut terminal = Terminal::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        exam_loop,
    );
    terminal.run(&bank, &config, cli.restart, &mut rng).await
}
