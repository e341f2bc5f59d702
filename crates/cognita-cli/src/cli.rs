use clap::{Parser, Subcommand, ValueEnum};
use cognita_core::LearningAction;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Learning events a user can report by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkAction {
    Read,
    Explained,
    Mastered,
}

impl From<MarkAction> for LearningAction {
    fn from(action: MarkAction) -> Self {
        match action {
            MarkAction::Read => LearningAction::Read,
            MarkAction::Explained => LearningAction::Explained,
            MarkAction::Mastered => LearningAction::Mastered,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cog")]
#[command(about = "cog - turn documents into knowledge units and track what you know")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'info'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/cognita/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Knowledge data file (overrides config and COGNITA_DATA_FILE)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Filter directive from the flags, if they set one
    pub fn log_filter(&self) -> Option<String> {
        if self.verbose {
            return Some("debug".to_string());
        }
        self.log_level
            .map(|level| LevelFilter::from(level).to_string().to_lowercase())
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a document for processing
    Add {
        /// Path to the document
        path: PathBuf,
        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },

    /// List registered documents
    Docs,

    /// Show how a file would be split into blocks
    Segment {
        path: PathBuf,
    },

    /// Extract knowledge from a registered document
    Process {
        document_id: String,
    },

    /// Show the quiz set for a document
    Quiz {
        document_id: String,
    },

    /// Record a quiz answer for a unit
    Answer {
        unit_id: String,
        #[arg(long, conflicts_with = "wrong", required_unless_present = "wrong")]
        correct: bool,
        #[arg(long)]
        wrong: bool,
    },

    /// Record a learning event for a unit
    Mark {
        unit_id: String,
        #[arg(value_enum)]
        action: MarkAction,
        /// Set the level directly instead of applying the usual step
        #[arg(long)]
        level: Option<f64>,
    },

    /// Hide a unit from prompts, keeping it in quizzes
    Mute {
        unit_id: String,
    },

    /// Exclude a unit from quizzes
    Ignore {
        unit_id: String,
    },

    /// Undo mute or ignore
    Restore {
        unit_id: String,
    },

    /// Learner profile: totals, mastery and average level
    Stats,

    /// Write an example config file
    InitConfig,
}
