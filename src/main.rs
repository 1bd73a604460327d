//! wordhoard - vocabulary knowledge tracking for language-learning games
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wordhoard::config::{crash_log_path, Config};
use wordhoard::core::{Direction, Mode, Vocabulary};
use wordhoard::error::exit_codes;
use wordhoard::storage::FileDocumentStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// wordhoard - vocabulary knowledge tracking and adaptive word selection
#[derive(Parser)]
#[command(name = "wordhoard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the persisted documents (default: <home>/data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a free-text answer
    Check {
        /// The learner's answer
        input: String,
        /// The expected answer
        expected: String,
        /// Every valid answer of the exercise, comma separated
        #[arg(long, value_delimiter = ',')]
        known: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Pick the words of the next session
    Select {
        /// Vocabulary file (JSON)
        #[arg(long)]
        vocabulary: PathBuf,
        /// Category to draw from
        #[arg(long)]
        category: String,
        /// Number of words
        #[arg(long, short = 'n', default_value = "10")]
        count: usize,
        /// Practice direction
        #[arg(long, default_value = "source-to-target")]
        direction: Direction,
        /// Practice mode
        #[arg(long, default_value = "standard")]
        mode: Mode,
        /// Fixed random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the frequency substitution pass
        #[arg(long)]
        no_frequency: bool,
        /// Also print a spaced queue with this many repetitions per word
        #[arg(long)]
        spaced: Option<usize>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Record a finished game
    Game {
        /// Vocabulary file (JSON)
        #[arg(long)]
        vocabulary: PathBuf,
        /// Category the game was played in
        #[arg(long)]
        category: String,
        /// Practice direction
        #[arg(long, default_value = "source-to-target")]
        direction: Direction,
        /// Practice mode
        #[arg(long, default_value = "standard")]
        mode: Mode,
        /// Session identifier stored with the record
        #[arg(long)]
        session_id: Option<String>,
        /// Graded words as word=quality (perfect, good, hard, failed)
        #[arg(required = true)]
        results: Vec<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show knowledge statistics
    Stats {
        /// Vocabulary file (JSON)
        #[arg(long)]
        vocabulary: PathBuf,
        /// Practice direction
        #[arg(long, default_value = "source-to-target")]
        direction: Direction,
        /// Practice mode
        #[arg(long, default_value = "standard")]
        mode: Mode,
        /// Size of the frequency band for coverage
        #[arg(long, default_value = "1000")]
        top: usize,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Upgrade the knowledge document to the current schema
    Migrate {
        /// Vocabulary file (JSON)
        #[arg(long)]
        vocabulary: PathBuf,
        /// Report without writing
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Reset all progress, or forget one word
    Reset {
        /// Vocabulary file (JSON)
        #[arg(long)]
        vocabulary: PathBuf,
        /// Confirm a full reset
        #[arg(long, short)]
        yes: bool,
        /// Forget only this word
        #[arg(long)]
        word: Option<String>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    setup_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("wordhoard error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("wordhoard panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Some(parent) = crash_log.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Check {
            input,
            expected,
            known,
            json,
            quiet,
        } => run_check(&input, &expected, known, json, quiet),
        Commands::Select {
            vocabulary,
            category,
            count,
            direction,
            mode,
            seed,
            no_frequency,
            spaced,
            json,
            quiet,
        } => {
            use wordhoard::cli::select::SelectOptions;
            let options = SelectOptions {
                json,
                quiet,
                category,
                count,
                direction,
                mode,
                seed,
                no_frequency,
                spaced,
            };
            run_select(&vocabulary, data_dir.as_deref(), &options)
        }
        Commands::Game {
            vocabulary,
            category,
            direction,
            mode,
            session_id,
            results,
            json,
            quiet,
        } => {
            use wordhoard::cli::game::GameOptions;
            let options = GameOptions {
                json,
                quiet,
                category,
                direction,
                mode,
                session_id,
            };
            run_game(&vocabulary, data_dir.as_deref(), &results, &options)
        }
        Commands::Stats {
            vocabulary,
            direction,
            mode,
            top,
            json,
            quiet,
        } => run_stats(&vocabulary, data_dir.as_deref(), direction, mode, top, json, quiet),
        Commands::Migrate {
            vocabulary,
            dry_run,
            json,
            quiet,
        } => run_migrate(&vocabulary, data_dir.as_deref(), dry_run, json, quiet),
        Commands::Reset {
            vocabulary,
            yes,
            word,
            json,
            quiet,
        } => run_reset(&vocabulary, data_dir.as_deref(), yes, word, json, quiet),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::OK as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted.trim_end());
    }
}

fn open_store(data_dir: Option<&Path>) -> Result<FileDocumentStore, Box<dyn std::error::Error>> {
    let store = match data_dir {
        Some(dir) => FileDocumentStore::with_dir(dir)?,
        None => FileDocumentStore::new()?,
    };
    Ok(store)
}

fn run_check(
    input: &str,
    expected: &str,
    known: Vec<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::check::{CheckCommand, CheckOptions};

    let cmd = CheckCommand::new();
    let options = CheckOptions { json, quiet, known };

    let output = cmd.run(input, expected, &options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_select(
    vocabulary: &Path,
    data_dir: Option<&Path>,
    options: &wordhoard::cli::select::SelectOptions,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::select::SelectCommand;

    let config = Config::load();
    let vocabulary = Vocabulary::load(vocabulary)?;
    let store = open_store(data_dir)?;

    let cmd = SelectCommand::new(store, config, vocabulary);
    let output = cmd.run(options);
    print_formatted(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

fn run_game(
    vocabulary: &Path,
    data_dir: Option<&Path>,
    results: &[String],
    options: &wordhoard::cli::game::GameOptions,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::game::{parse_result, GameCommand};

    let results = results
        .iter()
        .map(|spec| parse_result(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let config = Config::load();
    let vocabulary = Vocabulary::load(vocabulary)?;
    let store = open_store(data_dir)?;

    let cmd = GameCommand::new(store, config, vocabulary);
    let output = cmd.run(&results, options);
    print_formatted(&cmd.format_output(&output, options));

    Ok(success_to_exit_code(output.success))
}

fn run_stats(
    vocabulary: &Path,
    data_dir: Option<&Path>,
    direction: Direction,
    mode: Mode,
    top: usize,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::stats::{StatsCommand, StatsOptions};

    let config = Config::load();
    let vocabulary = Vocabulary::load(vocabulary)?;
    let store = open_store(data_dir)?;

    let cmd = StatsCommand::new(store, config, vocabulary);
    let options = StatsOptions {
        json,
        quiet,
        direction,
        mode,
        top,
    };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_migrate(
    vocabulary: &Path,
    data_dir: Option<&Path>,
    dry_run: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::migrate::{MigrateCommand, MigrateOptions};

    let config = Config::load();
    let vocabulary = Vocabulary::load(vocabulary)?;
    let store = open_store(data_dir)?;

    let cmd = MigrateCommand::new(store, config, vocabulary);
    let options = MigrateOptions {
        json,
        quiet,
        dry_run,
    };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_reset(
    vocabulary: &Path,
    data_dir: Option<&Path>,
    yes: bool,
    word: Option<String>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use wordhoard::cli::reset::{ResetCommand, ResetOptions};

    let config = Config::load();
    let vocabulary = Vocabulary::load(vocabulary)?;
    let store = open_store(data_dir)?;

    let cmd = ResetCommand::new(store, config, vocabulary);
    let options = ResetOptions {
        json,
        quiet,
        yes,
        word,
    };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}
