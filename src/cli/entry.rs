use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use log::{LevelFilter, warn};
use std::path::PathBuf;
use std::time::SystemTime;

use crate::cache::{
    self, CacheCleaner, CacheDeleter, CacheLayout, CacheLocator, Cleaner, Deleter, GlobFilter,
    Locator, Thumbnail,
};
use crate::error::Result;
use crate::utils::format_deletion_message;

use super::context::CliContext;
use super::prompts::Prompt;

const LOG_ENV_VAR: &str = "THUMBS_LOG";

#[derive(Parser, Debug, Clone)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = "Find and delete generated thumbnails"
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Pass for more log output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Pass for less log output
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        conflicts_with = "verbose"
    )]
    pub quiet: u8,

    /// Recurse through directories
    #[arg(short, long, global = true)]
    pub recursive: bool,

    /// Include hidden files and directories
    #[arg(short, long, global = true)]
    pub all: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub non_interactive: bool,

    /// Override the configuration file path
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl GlobalOptions {
    /// Log level shifted from the given default by the -v/-q counts.
    /// `None` when the counts cancel out.
    pub fn log_level_with_default(&self, default: i16) -> Option<LevelFilter> {
        let level = default + i16::from(self.verbose) - i16::from(self.quiet);
        let new_level = match level {
            i16::MIN..=0 => LevelFilter::Off,
            1 => LevelFilter::Error,
            2 => LevelFilter::Warn,
            3 => LevelFilter::Info,
            4 => LevelFilter::Debug,
            5..=i16::MAX => LevelFilter::Trace,
        };

        (level != default).then_some(new_level)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Delete the thumbnails for the given files
    Delete(DeleteArgs),
    /// Print the path of thumbnails for the given file
    Locate(LocateArgs),
    /// Find thumbnails for files that no longer exist
    Cleanup(CleanupArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DeleteArgs {
    /// Files whose thumbnails to delete
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Delete without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Do not actually delete anything
    #[arg(short = 'n', long, conflicts_with = "force")]
    pub dry_run: bool,

    /// Only delete thumbnails that haven't been accessed since the given time.
    ///
    /// Either an RFC3339-like timestamp (`2020-01-01 11:10:00`) or a free-form
    /// duration like `1year 15days 1week 2min` or `1h 6s 2ms`.
    #[arg(short, long, value_name = "WHEN", value_parser = parse_last_accessed)]
    pub last_accessed: Option<SystemTime>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LocateArgs {
    /// File whose thumbnails are to be found
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct CleanupArgs {
    /// Delete without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Include or exclude source files matching the given glob. Globbing
    /// rules match .gitignore globs; precede a glob with a ! to exclude it.
    /// Can be used multiple times.
    #[arg(short, long, value_name = "GLOB")]
    pub glob: Vec<String>,
}

fn parse_last_accessed(s: &str) -> std::result::Result<SystemTime, String> {
    if let Ok(t) = humantime::parse_rfc3339_weak(s) {
        return Ok(t);
    }

    if let Ok(d) = humantime::parse_duration(s) {
        return SystemTime::now()
            .checked_sub(d)
            .ok_or_else(|| format!("duration '{s}' reaches before the representable time range"));
    }

    Err(format!(
        "cannot parse '{s}' as either an RFC3339-like timestamp or a free-form duration"
    ))
}

/// Returns whether the command found anything to act on (exit code 125
/// signals that it did not).
pub fn run(args: Args) -> Result<bool> {
    run_with_prompt(args, None)
}

pub fn run_with_prompt(args: Args, prompt: Option<Prompt>) -> Result<bool> {
    init_logging(&args.global);

    let prompt = prompt.unwrap_or_else(|| Prompt::new(!args.global.non_interactive));
    let ctx = CliContext::from_args(args, prompt)?;
    execute(&ctx)
}

fn init_logging(global: &GlobalOptions) {
    let mut builder = env_logger::Builder::default();
    builder.format_timestamp(None);
    builder.filter_level(LevelFilter::Warn); // default filter level
    builder.parse_env(env_logger::Env::from(LOG_ENV_VAR)); // override with env
    // override with CLI flags
    if let Some(level) = global.log_level_with_default(2) {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}

const NO_THUMBNAILS: &str = "Found no thumbnails. Rerun with '-vv' for detailed information.";

fn execute(ctx: &CliContext) -> Result<bool> {
    let layout = CacheLayout::discover()?;

    match ctx.command() {
        Command::Delete(args) => {
            let deleter = CacheDeleter::new(&layout, ctx.walk_options());
            let outcome = deleter.collect(&args.files, args.last_accessed)?;

            if outcome.ignored_directories != 0 {
                warn!(
                    "Ignoring {} folder(s). Enable '-r/--recursive' to recurse into directories.",
                    outcome.ignored_directories
                );
            }

            if args.dry_run {
                if outcome.thumbnails.is_empty() {
                    warn!("{NO_THUMBNAILS}");
                    return Ok(false);
                }
                for thumb in &outcome.thumbnails {
                    println!("Would delete a thumbnail for '{}'", thumb.source.display());
                }
                return Ok(true);
            }

            confirm_and_remove(ctx, &outcome.thumbnails, args.force, NO_THUMBNAILS)
        }
        Command::Locate(args) => {
            let locator = CacheLocator::new(&layout);
            let thumbnails = locator.locate(&args.file)?;

            for thumb in &thumbnails {
                println!("{}", thumb.thumbnail.display());
            }

            Ok(!thumbnails.is_empty())
        }
        Command::Cleanup(args) => {
            let filter = GlobFilter::from_patterns(&ctx.cleanup_globs(&args.glob))?;
            let cleaner = CacheCleaner::new(&layout, ctx.walk_options());
            let orphans = cleaner.collect(&filter)?;

            confirm_and_remove(ctx, &orphans, args.force, "Found no thumbnails to cleanup.")
        }
    }
}

fn confirm_and_remove(
    ctx: &CliContext,
    thumbnails: &[Thumbnail],
    force: bool,
    empty_message: &str,
) -> Result<bool> {
    if thumbnails.is_empty() {
        warn!("{empty_message}");
        return Ok(false);
    }

    if !force {
        if ctx.is_non_interactive() {
            println!(
                "Found {} thumbnail(s) to delete. Use '-v' for details, or '-f/--force' to delete them.",
                thumbnails.len()
            );
            return Ok(true);
        }

        let message = format_deletion_message(thumbnails);
        if !ctx.prompt().confirm(&message, false)? {
            println!("Operation cancelled.");
            return Ok(true);
        }
    }

    cache::remove_thumbnails(thumbnails)?;
    println!("Deleted {} thumbnail(s).", thumbnails.len());
    Ok(true)
}
