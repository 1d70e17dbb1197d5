mod control;
mod hotkey;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use whirl_core::{
    config::Config,
    notify::DialogNotifier,
    overlay_process::ProcessOverlayLauncher,
    pipeline::TokioPipelineRunner,
    ui::{self, StdoutOutput},
    CapturePipeline, CaptureServices, Controller, RunMode,
};

#[derive(Parser, Debug)]
#[command(
    name = "whirl",
    author,
    version,
    about = "Draw a box anywhere on screen and search it with Google Lens",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Log debug output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Browser application to open the search in
    #[arg(long, global = true)]
    browser: Option<String>,

    /// Override the search page URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Milliseconds to wait for the browser before pasting
    #[arg(long, global = true)]
    paste_delay_ms: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq)]
enum Command {
    /// Stay in the background and search on Cmd/Ctrl+Shift+C (default)
    Daemon,
    /// Run a single capture right away, then exit
    Capture,
    /// Selection overlay, started by the daemon
    #[command(hide = true)]
    Overlay,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let command = args.command.unwrap_or(Command::Daemon);
    if command == Command::Overlay {
        return ui::run_overlay(Box::new(StdoutOutput)).context("Overlay failed");
    }

    let config = load_config(&args).context("Failed to load configuration")?;
    log::debug!("{:?}", config);

    let mode = match command {
        Command::Capture => RunMode::Once,
        _ => RunMode::Daemon,
    };
    run_controller(config, mode)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

/// Environment first, then command-line overrides on top.
fn load_config(args: &Args) -> whirl_core::Result<Config> {
    let mut builder = Config::load()?.to_builder();
    if let Some(browser) = &args.browser {
        builder = builder.with_browser(browser.clone());
    }
    if let Some(url) = &args.url {
        builder = builder.with_search_url(url.clone());
    }
    if let Some(ms) = args.paste_delay_ms {
        builder = builder.with_paste_delay(Duration::from_millis(ms));
    }
    builder.build()
}

/// Wires everything up and serves sessions until quit (daemon) or until the
/// single session ends (capture).
///
/// The shortcut listener owns the main thread; the controller runs on a
/// worker and ends the process itself when it is done.
fn run_controller(config: Config, mode: RunMode) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("whirl-worker")
        .build()
        .context("Failed to start async runtime")?;

    let (tx, rx) = mpsc::channel();

    if mode == RunMode::Daemon {
        control::spawn_stdin_commands(tx.clone()).context("Failed to start command reader")?;
        log::info!(
            "Whirl is running. Press {}+Shift+C to search, type 'quit' to exit.",
            if cfg!(target_os = "macos") { "Cmd" } else { "Ctrl" }
        );
    }

    let launcher = ProcessOverlayLauncher::current_exe(tx.clone())
        .context("Failed to locate the whirl executable")?;
    let pipeline = CapturePipeline::new(CaptureServices::system(&config), &config);
    let runner = TokioPipelineRunner::new(runtime.handle().clone(), pipeline, tx.clone());

    let worker = thread::Builder::new()
        .name("whirl-controller".into())
        .spawn(move || {
            let controller = Controller::new(launcher, runner, DialogNotifier);
            let result = controller.run(rx, mode).context("Capture failed");
            // Pending cleanups are not worth blocking exit for.
            runtime.shutdown_timeout(Duration::from_millis(200));
            process::exit(exit_code(&result));
        })
        .context("Failed to start controller thread")?;

    hotkey::listen(tx);

    log::warn!("Global shortcut unavailable; use the 'search' command instead");
    worker
        .join()
        .map_err(|_| anyhow::anyhow!("Controller thread panicked"))
}

/// Reports a failed run on stderr and maps it to a process exit code.
fn exit_code(result: &Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_daemon() {
        let args = Args::try_parse_from(["whirl"]).unwrap();
        assert_eq!(args.command, None);
        assert!(!args.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "whirl",
            "capture",
            "--browser",
            "Safari",
            "--paste-delay-ms",
            "250",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.command, Some(Command::Capture));
        assert_eq!(args.browser.as_deref(), Some("Safari"));
        assert_eq!(args.paste_delay_ms, Some(250));
        assert!(args.verbose);
    }

    #[test]
    fn test_overlay_subcommand_parses_while_hidden() {
        let args = Args::try_parse_from(["whirl", "overlay"]).unwrap();
        assert_eq!(args.command, Some(Command::Overlay));
    }

    #[test]
    fn test_exit_code_follows_result() {
        assert_eq!(exit_code(&Ok(())), 0);
        assert_eq!(exit_code(&Err(anyhow::anyhow!("no screens"))), 1);
    }

    #[test]
    fn test_invalid_delay_is_rejected() {
        assert!(Args::try_parse_from(["whirl", "--paste-delay-ms", "soon"]).is_err());
    }
}
