//! Main entry point for the pkbe CLI application.
//!
//! Dispatches `unpak`, `repak`, `list` and `verify` and maps failures to
//! a distinct exit status per error kind.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap::error::ErrorKind;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pkbe::cli::Command;
use pkbe::{Archive, Cli, ExitStatus, ExportOptions, LocalFileSystem, PakError};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let status = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Success,
                _ => ExitStatus::ArgumentError,
            };
            let _ = e.print();
            return exit(status);
        }
    };

    init_logging(&cli);
    let quiet = cli.is_quiet();

    let Some(command) = cli.command else {
        // No mode given: show usage and succeed
        let _ = Cli::command().print_help();
        return exit(ExitStatus::Success);
    };

    match run(command, quiet) {
        Ok(()) => exit(ExitStatus::Success),
        Err(err) => {
            eprintln!("Error: {err:#}");
            let status = err
                .downcast_ref::<PakError>()
                .map(PakError::exit_status)
                .unwrap_or(ExitStatus::IoError);
            exit(status)
        }
    }
}

fn exit(status: ExitStatus) -> ExitCode {
    ExitCode::from(status.code() as u8)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-q`/`--debug`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, quiet: bool) -> Result<()> {
    let mut fs = LocalFileSystem::new();

    match command {
        Command::Unpak {
            pak,
            dir,
            never_overwrite,
            no_verify,
        } => {
            require_file(&pak)?;
            let options = ExportOptions {
                overwrite: !never_overwrite,
            };
            let summary = pkbe::unpak(&mut fs, &pak, &dir, !no_verify, options)
                .with_context(|| format!("failed to unpack {}", pak.display()))?;
            if !quiet {
                println!(
                    "{} files ({}) written to {}",
                    summary.written,
                    format_size(summary.bytes),
                    dir.display()
                );
                if summary.skipped > 0 {
                    println!("{} existing files skipped", summary.skipped);
                }
            }
        }
        Command::Repak { dir, pak } => {
            require_dir(&dir)?;
            let archive = pkbe::repak(&mut fs, &dir, &pak)
                .with_context(|| format!("failed to pack {}", dir.display()))?;
            if !quiet {
                println!(
                    "{} files in {} directories packed into {} ({})",
                    archive.file_count(),
                    archive.directories.len(),
                    pak.display(),
                    format_size(archive.encoded_len()?)
                );
            }
        }
        Command::List { pak, verbose } => {
            require_file(&pak)?;
            let archive = pkbe::read_archive(&fs, &pak)
                .with_context(|| format!("failed to read {}", pak.display()))?;
            list_files(&archive, verbose)?;
        }
        Command::Verify { pak } => {
            require_file(&pak)?;
            let archive = pkbe::read_archive(&fs, &pak)
                .with_context(|| format!("failed to read {}", pak.display()))?;
            archive
                .verify()
                .with_context(|| format!("{} failed verification", pak.display()))?;
            if !quiet {
                println!("ok: {} files", archive.file_count());
            }
        }
    }

    Ok(())
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(PakError::Argument(format!("{} is not an existing file", path.display())).into());
    }
    Ok(())
}

fn require_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(
            PakError::Argument(format!("{} is not an existing directory", path.display())).into(),
        );
    }
    Ok(())
}

/// Print archive contents, either one path per line or as a table.
fn list_files(archive: &Archive, verbose: bool) -> Result<()> {
    if verbose {
        println!(
            "{:>10}  {:>10}  {:>8}  Name",
            "Offset", "Length", "CRC-32"
        );
        println!("{}", "-".repeat(60));
    }

    for dir in &archive.directories {
        for file in &dir.files {
            if verbose {
                println!(
                    "{:>10}  {:>10}  {:08x}  {}{}",
                    file.archive_offset, file.size, file.checksum, dir.name, file.name
                );
            } else {
                println!("{}{}", dir.name, file.name);
            }
        }
    }

    if verbose {
        println!("{}", "-".repeat(60));
        println!(
            "{:>10}  {:>10}  {:>8}  {} files in {} directories",
            archive.base_offset,
            archive.content_size()?,
            "",
            archive.file_count(),
            archive.directories.len()
        );
    }
    Ok(())
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
