// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use bilinguo::app_config::{self, Config};
use bilinguo::{Controller, EditOutcome, ExportOutcome, ImportSummary};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a JSON list of {"word", "translation"} objects
    ImportJson {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Import every word found in a text file
    ImportText {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// List all stored words
    List,

    /// Show word and flashcard counters
    Stats,

    /// Translate words and store the results
    Translate {
        /// Words to translate
        #[arg(value_name = "WORD", required = true)]
        words: Vec<String>,

        /// Source language for this run
        #[arg(long)]
        source: Option<String>,

        /// Target language for this run
        #[arg(long)]
        target: Option<String>,
    },

    /// Add pipe-separated translations to a stored word
    Edit {
        #[arg(value_name = "WORD")]
        word: String,

        #[arg(value_name = "TRANSLATIONS")]
        translations: String,
    },

    /// Export unexported words as CSV flashcards
    Export {
        /// Maximum number of cards
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear every exported flag
    ResetFlags {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete stored words
    Delete {
        #[arg(value_name = "WORD", required = true)]
        words: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completions for bilinguo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Bilinguo - vocabulary notebook with flashcard export
///
/// Collects words from word lists and texts, translates them and exports
/// them as Anki-ready CSV flashcards.
#[derive(Parser, Debug)]
#[command(name = "bilinguo")]
#[command(version)]
#[command(about = "Vocabulary notebook with translation and flashcard export")]
#[command(long_about = "Bilinguo keeps a vocabulary database, translates words through MyMemory and exports flashcards.

EXAMPLES:
    bilinguo import-text chapter1.txt           # Add every word of a text
    bilinguo import-json words.json             # Add words with translations
    bilinguo translate house tree               # Translate and store
    bilinguo edit house \"casa | hogar\"          # Add translations by hand
    bilinguo export -n 100 -o deck.csv          # Export up to 100 new cards
    bilinguo completions bash > bilinguo.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't
    exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Vocabulary database file
    #[arg(short, long, env = "BILINGUO_DB", global = true)]
    database: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fa')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Level is refined once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "bilinguo", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(LevelFilter::from(&config.log_level));

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    // Override config with CLI options if provided
    if let Some(database) = &cli.database {
        config.database_path = Some(database.clone());
    }
    if let Some(source_lang) = &cli.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &cli.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    debug!("Using configuration: {:?}", config);
    Ok(config)
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::ImportJson { path } => {
            let summary = controller.import_json(&path).await?;
            print_import_summary(&summary);
        }
        Commands::ImportText { path } => {
            let summary = controller.import_text(&path).await?;
            print_import_summary(&summary);
        }
        Commands::List => {
            for record in controller.list().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    record.word,
                    record.joined_translations(),
                    record.added_at_display(),
                    if record.exported { "Yes" } else { "No" }
                );
            }
        }
        Commands::Stats => {
            println!("{}", controller.stats().await?);
        }
        Commands::Translate { words, source, target } => {
            let reports = controller
                .translate_words(&words, source.as_deref(), target.as_deref())
                .await?;

            let mut failures = 0;
            for report in reports {
                match report.result {
                    Ok(translation) => println!("{}\t{}", report.word, translation),
                    Err(e) => {
                        error!("{}", e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                return Err(anyhow!("{} of {} word(s) could not be translated", failures, words.len()));
            }
        }
        Commands::Edit { word, translations } => match controller.save_edits(&word, &translations).await? {
            EditOutcome::Updated => info!("Updated translations for '{}'", word),
            EditOutcome::Unchanged => info!("No new translations for '{}'", word),
            EditOutcome::NotFound => return Err(anyhow!("Word not found: {}", word)),
        },
        Commands::Export { limit, output } => match controller.export(limit, output).await? {
            ExportOutcome::NothingToExport => println!("No new words available for export"),
            ExportOutcome::Exported { count, path } => {
                println!("Exported {} flashcards to {}", count, path.display());
            }
        },
        Commands::ResetFlags { yes } => {
            if !yes && !confirm("Mark every word as not exported?")? {
                warn!("Reset cancelled");
                return Ok(());
            }
            let count = controller.reset_export_flags().await?;
            info!("Reset export flag on {} word(s)", count);
        }
        Commands::Delete { words, yes } => {
            if !yes && !confirm(&format!("Delete {} word(s)?", words.len()))? {
                warn!("Delete cancelled");
                return Ok(());
            }
            let removed = controller.delete_words(&words).await?;
            println!("Deleted {} word(s)", removed);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn print_import_summary(summary: &ImportSummary) {
    println!(
        "Imported {} entries ({} new, {} merged, {} skipped)",
        summary.imported, summary.created, summary.merged, summary.skipped
    );
}

// @prompts: Yes/no question on stdin, defaulting to no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
