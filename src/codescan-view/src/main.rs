//! codescan - Camera QR/barcode scanner CLI

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use codescan_detect::Symbology;
use codescan_view::{ScanConfig, ScanDelegate, ScanSession};

#[derive(Parser)]
#[command(name = "codescan")]
#[command(about = "Camera-driven QR/barcode scanner")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for codes with the camera
    Scan {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Camera device index
        #[arg(short, long)]
        device: Option<u32>,

        /// Capture rate (frames per second)
        #[arg(short, long)]
        fps: Option<u32>,

        /// Keep scanning after the first decode instead of exiting
        #[arg(long)]
        keep_open: bool,

        /// Disable the decode alert
        #[arg(long)]
        no_alert: bool,

        /// Symbologies to detect (repeatable)
        #[arg(long = "symbology")]
        symbologies: Vec<Symbology>,
    },

    /// List camera devices
    Devices,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Scan {
            config,
            device,
            fps,
            keep_open,
            no_alert,
            symbologies,
        } => {
            cmd_scan(config, device, fps, keep_open, no_alert, symbologies)?;
        }
        Commands::Devices => {
            cmd_devices()?;
        }
    }

    Ok(())
}

/// Prints each decoded payload to stdout
struct PrintDelegate;

impl ScanDelegate for PrintDelegate {
    fn on_decode(&mut self, text: &str) {
        println!("{}", text);
    }

    fn on_dismiss(&mut self) {
        info!("scan complete");
    }
}

fn cmd_scan(
    config_path: Option<PathBuf>,
    device: Option<u32>,
    fps: Option<u32>,
    keep_open: bool,
    no_alert: bool,
    symbologies: Vec<Symbology>,
) -> Result<()> {
    let mut config = match config_path.or_else(default_config_path) {
        Some(path) if path.exists() => ScanConfig::load(&path)?,
        _ => ScanConfig::default(),
    };

    // Flags override file settings
    if let Some(device) = device {
        config.device_index = device;
    }
    if let Some(fps) = fps {
        config.fps = fps;
    }
    if keep_open {
        config.close_after_capture = false;
    }
    if no_alert {
        config.alert_on_scan = false;
    }
    if !symbologies.is_empty() {
        config.symbologies = symbologies;
    }

    info!(
        "starting scanner on device {} at {} fps",
        config.device_index, config.fps
    );

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        info!("received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut session = ScanSession::open(config, Box::new(PrintDelegate))?;
    session.run(running)?;

    Ok(())
}

fn cmd_devices() -> Result<()> {
    let devices = codescan_capture::list_devices()?;

    if devices.is_empty() {
        println!("no cameras found");
        return Ok(());
    }

    println!("available cameras:");
    for device in devices {
        let marker = if device.is_default { " (default)" } else { "" };
        println!("  [{}] {}{}", device.index, device.name, marker);
        if !device.description.is_empty() {
            println!("      {}", device.description);
        }
    }

    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("codescan").join("config.toml"))
}
