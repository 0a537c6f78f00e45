use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use services::{ExamConfig, QuestionBank};

pub const DEFAULT_DB_URL: &str = "sqlite://exam-progress.sqlite3";

#[derive(Debug, Parser)]
#[command(
    name = "exam-sim",
    version,
    about = "Practice multiple-choice exams from a JSON question file"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Question file (JSON array of questions).
    #[arg(long, env = "EXAM_QUESTIONS", global = true)]
    pub questions: Option<PathBuf>,

    /// SQLite URL or path where progress is saved.
    #[arg(long = "db", env = "EXAM_DB_URL", default_value = DEFAULT_DB_URL)]
    pub db_url: String,

    /// Category to include; repeat for several. Defaults to all.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Number of questions. Defaults to all questions in the selected categories.
    #[arg(long)]
    pub count: Option<usize>,

    /// Shuffle question order.
    #[arg(long)]
    pub shuffle: bool,

    /// Shuffle answer options within each question.
    #[arg(long)]
    pub shuffle_options: bool,

    /// Seed for reproducible shuffling.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore saved progress and start a new exam.
    #[arg(long)]
    pub restart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List the categories of the question file with their question counts.
    Categories,
}

impl Cli {
    /// # Errors
    ///
    /// Fails when no question file was given.
    pub fn questions_path(&self) -> Result<&Path> {
        self.questions
            .as_deref()
            .context("no question file given; pass --questions <path> or set EXAM_QUESTIONS")
    }

    /// Exam configuration for `bank`, filling in defaults.
    #[must_use]
    pub fn exam_config(&self, bank: &QuestionBank) -> ExamConfig {
        let categories = if self.categories.is_empty() {
            bank.categories()
        } else {
            self.categories.clone()
        };
        let count = self
            .count
            .unwrap_or_else(|| bank.selected_total(&categories));
        ExamConfig {
            categories,
            count,
            shuffle_questions: self.shuffle,
            shuffle_options: self.shuffle_options,
        }
    }
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_string();
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its directory so SQLite can open it.
///
/// # Errors
///
/// Fails for a URL without a path or when the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid --db value: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("create database file {}", path.display()))?;
    }
    Ok(())
}
