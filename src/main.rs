use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use efimount::mount::MountResult;
use efimount::{Drive, Engine, EngineConfig, SipStatus};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "efimount")]
#[command(about = "Find, classify and mount EFI system partitions")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file layered over the per-user one
    #[arg(long, global = true, env = "EFIMOUNT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List drives and their partitions
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Mount an EFI partition, picking one when TARGET is omitted
    Mount {
        /// Partition identifier (e.g., disk2s1)
        target: Option<String>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Also consider partitions on the boot disk
        #[arg(long)]
        include_boot_disk: bool,
    },

    /// Print the path of an already mounted EFI volume
    Locate,

    /// Unmount the volume at PATH
    Unmount {
        path: PathBuf,
    },

    /// Show System Integrity Protection status
    Sip {
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(debug: bool, json: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("efimount={}", default_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("Warning: logging unavailable: {}", e);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_json);

    let mut config = EngineConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::List { json } => {
            let engine = Engine::system(config);
            let drives = engine.enumerate().context("Failed to enumerate drives")?;
            if json {
                print_json(&drives)?;
            } else {
                print_drives(&drives);
            }
        }
        Commands::Mount {
            target,
            json,
            include_boot_disk,
        } => {
            config.include_boot_disk |= include_boot_disk;
            let engine = Engine::system(config);
            let result = engine.mount_efi(target.as_deref());
            if json {
                print_json(&result)?;
            } else {
                print_mount_result(&result);
            }
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Locate => {
            let engine = Engine::system(config);
            match engine.locate_current_efi() {
                Some(path) => println!("{}", path.display()),
                None => {
                    eprintln!("No mounted EFI volume found.");
                    std::process::exit(1);
                }
            }
        }
        Commands::Unmount { path } => {
            let engine = Engine::system(config);
            let (ok, output) = engine.unmount(&path);
            let output = output.trim();
            if ok {
                println!("{}", if output.is_empty() { "Unmounted." } else { output });
            } else {
                eprintln!("Unmount failed: {}", output);
                std::process::exit(1);
            }
        }
        Commands::Sip { json } => {
            let engine = Engine::system(config);
            let status = engine.sip_status();
            if json {
                print_json(&status)?;
            } else {
                print_sip(status);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn print_drives(drives: &[Drive]) {
    if drives.is_empty() {
        println!("No drives detected.");
        return;
    }

    println!(
        "{:<12} {:<24} {:<12} {:<10} {:<6}",
        "Device", "Name", "Size", "Kind", "Boot"
    );
    println!("{}", "-".repeat(68));

    for drive in drives {
        println!(
            "{:<12} {:<24} {:<12} {:<10} {:<6}",
            drive.identifier,
            truncate_string(&drive.display_name, 24),
            drive.size_label,
            drive.kind.label(),
            if drive.is_boot_device { "yes" } else { "" }
        );

        for partition in &drive.partitions {
            let mount = partition
                .mount_point
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!(
                "  {:<10} {:<24} {:<12} {:<20} {}{}",
                partition.identifier,
                truncate_string(&partition.display_name, 24),
                partition.size_label,
                truncate_string(&partition.content_type, 20),
                if partition.is_efi_candidate { "[EFI] " } else { "" },
                mount
            );
        }
    }
}

fn print_mount_result(result: &MountResult) {
    for attempt in &result.attempts {
        println!(
            "{:<10} {:<48} {:<8} {}",
            attempt.partition,
            attempt.strategy.description(),
            if attempt.success { "ok" } else { "failed" },
            humantime::format_duration(Duration::from_millis(attempt.elapsed_ms))
        );
        if !attempt.success {
            let first_line = attempt.diagnostic.lines().next().unwrap_or("").trim();
            if !first_line.is_empty() {
                println!("           {}", first_line);
            }
        }
    }

    if result.success {
        match &result.path {
            Some(path) if result.unverified_path => {
                println!("Mounted (path not verified): {}", path.display())
            }
            Some(path) => println!("Mounted at {}", path.display()),
            None => println!("Mounted, but the mount point could not be determined."),
        }
    } else {
        let class = result
            .failure
            .map(|c| c.description())
            .unwrap_or("Mount failed");
        eprintln!("{} after {} attempt(s).", class, result.attempts.len());
    }
}

fn print_sip(status: SipStatus) {
    println!("System Integrity Protection: {}", status);
    if status == SipStatus::Enabled {
        println!("Unprivileged EFI mounts may be refused; privileged strategies will prompt.");
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
