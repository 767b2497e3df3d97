/*
 * Command-line entry point. Wires the concrete collaborators (real
 * filesystem, console prompts, no live extension registry) into an
 * `ExportSession` and runs one export: load the profile catalog, let the
 * user pick profiles, merge, write the archive(s).
 */
mod app_logic;
mod core;

use crate::app_logic::{ConsoleUi, ExportError, ExportSession};
use crate::core::{CoreFileSystem, ExportMode, NoLiveExtensions, ResourceLocator};
use clap::Parser;
use directories::BaseDirs;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum ModeArg {
    /// All selected profiles merged into one archive
    Merge,
    /// One archive per selected profile
    Single,
}

impl From<ModeArg> for ExportMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Merge => ExportMode::Merge,
            ModeArg::Single => ExportMode::Single,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "profile-porter",
    version,
    about = "Exports VSCode user profiles into portable .code-profile archives"
)]
struct Args {
    /// Editor user-data directory (defaults to the platform's Code/User directory)
    #[arg(long, value_name = "DIR")]
    user_dir: Option<PathBuf>,

    /// Home directory override; the global extension manifest is resolved beneath it
    #[arg(long, value_name = "DIR")]
    home: Option<PathBuf>,

    /// Destination file (merge mode) or folder (single mode); prompts when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Export mode
    #[arg(long, value_enum, default_value_t = ModeArg::Merge)]
    mode: ModeArg,

    /// Export every profile in the catalog without prompting
    #[arg(long)]
    all: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("logging init failed: {e}");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let Some(base_dirs) = BaseDirs::new() else {
        eprintln!("error: cannot determine the user home directory");
        return ExitCode::FAILURE;
    };
    let user_root = args
        .user_dir
        .unwrap_or_else(|| base_dirs.config_dir().join("Code").join("User"));
    let home = args
        .home
        .unwrap_or_else(|| base_dirs.home_dir().to_path_buf());

    let fs = CoreFileSystem::new();
    let live = NoLiveExtensions::new();
    let ui = ConsoleUi::new(args.all, args.output);
    let locator = ResourceLocator::new(user_root, home);

    let mut session = ExportSession::new(&fs, &ui, &live, locator);
    let result = session
        .load_profiles()
        .and_then(|()| session.export_all(args.mode.into()));

    let exit = match &result {
        Ok(()) | Err(ExportError::Cancelled) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    };
    session.report_outcome(result);
    exit
}
