#![forbid(unsafe_code)]

//! VeriScan showcase binary entry point.

use std::io;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;
use veriscan_core::capability::HostCapabilities;
use veriscan_demo::app::App;
use veriscan_demo::{cli, script, tui};
use veriscan_ui::scan_dialog::ScanDialogConfig;

fn main() {
    let opts = cli::Opts::parse();
    init_tracing();

    let started = Instant::now();
    let caps = if opts.no_observer {
        HostCapabilities::without_viewport_observation()
    } else {
        HostCapabilities::detect()
    };
    let dialog_config = ScanDialogConfig::default()
        .scan_duration(Duration::from_millis(opts.scan_ms))
        .close_duration(Duration::from_millis(opts.close_ms));

    let (width, height) = if opts.headless {
        (opts.width, opts.height)
    } else {
        crossterm::terminal::size().unwrap_or((opts.width, opts.height))
    };

    let mut app = App::new(width, height, dialog_config, caps);
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        width, height, "veriscan page interactive"
    );

    let result = if opts.headless {
        script::run(&mut app, &mut io::stdout())
    } else {
        tui::run(&mut app)
    };

    if let Err(err) = result {
        eprintln!("veriscan-demo: {err}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, gated by `VERISCAN_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("VERISCAN_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
