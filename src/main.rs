//! Boundaries - first-run onboarding for the boundaries and safety app
//!
//! CLI entry point with global panic handler.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boundaries::capability::{NoopAudioOutput, PresetRequester};
use boundaries::cli::language::LanguageOptions;
use boundaries::cli::reset::ResetOptions;
use boundaries::cli::status::StatusOptions;
use boundaries::cli::strings::StringsOptions;
use boundaries::cli::{LanguageCommand, ResetCommand, StatusCommand, StringsCommand};
use boundaries::config::{crash_log_path, Config};
use boundaries::core::{GateFlag, Sequencer};
use boundaries::error::exit_codes;
use boundaries::events::{to_json, EventRunner};
use boundaries::locale::{LanguageContext, Locale};
use boundaries::storage::FileStore;

// =============================================================================
// CLI Definition
// =============================================================================

/// Boundaries - first-run onboarding for the boundaries and safety app
#[derive(Parser)]
#[command(name = "boundaries")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an onboarding session (JSON events on stdin, JSON state on stdout)
    Run,

    /// Show stored onboarding flags and the gate the next launch opens on
    Status {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Clear onboarding flags so the gates show again
    Reset {
        /// Clear only this flag (languageSetupComplete, permissionsShown, tutorialComplete)
        #[arg(long)]
        flag: Option<GateFlag>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Change the stored display language (en, ms, zh)
    Language {
        /// Locale tag
        locale: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the display strings for a language
    Strings {
        /// Locale tag (default: the stored language)
        #[arg(long, short)]
        locale: Option<Locale>,
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
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("boundaries error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to `<home>/crash.log` and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("boundaries panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
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

/// Log to stderr, filtered by `BOUNDARIES_LOG` (default `warn`). stdout is
/// reserved for command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("BOUNDARIES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();

    match cli.command {
        Commands::Run => run_session(config),
        Commands::Status { json, quiet } => run_status(config, json, quiet),
        Commands::Reset { flag, json, quiet } => run_reset(config, flag, json, quiet),
        Commands::Language {
            locale,
            json,
            quiet,
        } => run_language(config, &locale, json, quiet),
        Commands::Strings {
            locale,
            json,
            quiet,
        } => run_strings(config, locale, json, quiet),
    }
}

// =============================================================================
// Command Handlers
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
        print!("{}", formatted);
        if !formatted.ends_with('\n') {
            println!();
        }
    }
}

fn run_session(config: Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::from_config(&config)?;
    tracing::debug!(path = %store.path().display(), "session store");

    let language = LanguageContext::load(&store, config.locale.default);
    let requester = PresetRequester::from_config(&config.permissions);
    let sequencer =
        Sequencer::from_config(store, &config).with_audio_output(Box::new(NoopAudioOutput));
    let mut runner = EventRunner::new(sequencer, requester, language);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Initial state before any event
    writeln!(out, "{}", to_json(&runner.status())?)?;
    out.flush()?;

    let answered = runner.run(io::stdin().lock(), out)?;
    tracing::debug!(answered, "event input closed");

    Ok(ExitCode::from(exit_codes::OK as u8))
}

fn run_status(
    config: Config,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::from_config(&config)?;
    let cmd = StatusCommand::new(store, config);
    let options = StatusOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.storage_error.is_none()))
}

fn run_reset(
    config: Config,
    flag: Option<GateFlag>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::from_config(&config)?;
    let cmd = ResetCommand::new(store);
    let options = ResetOptions { json, quiet, flag };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_language(
    config: Config,
    locale: &str,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::from_config(&config)?;
    let cmd = LanguageCommand::new(store, config);
    let options = LanguageOptions { json, quiet };

    let output = cmd.run(locale, &options)?;
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_strings(
    config: Config,
    locale: Option<Locale>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let store = FileStore::from_config(&config)?;
    let cmd = StringsCommand::new(store, config);
    let options = StringsOptions {
        json,
        quiet,
        locale,
    };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(ExitCode::from(exit_codes::OK as u8))
}
