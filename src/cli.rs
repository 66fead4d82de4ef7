use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pkbe")]
#[command(version)]
#[command(about = "Unpack and repack PKBE .pak archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  pkbe unpak effects.pak effects     unpack effects.pak into the directory effects\n  \
  pkbe repak effects effects.pak     pack the directory effects into effects.pak\n  \
  pkbe list -v effects.pak           show offsets, sizes and checksums")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Log every directory and file processed
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Unpack an archive into a directory
    Unpak {
        /// Archive to read
        #[arg(value_name = "PAK")]
        pak: PathBuf,

        /// Directory to write into
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Never overwrite existing files
        #[arg(short = 'n')]
        never_overwrite: bool,

        /// Skip checksum and offset verification
        #[arg(long)]
        no_verify: bool,
    },

    /// Pack a directory into an archive
    Repak {
        /// Directory to read
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Archive to write
        #[arg(value_name = "PAK")]
        pak: PathBuf,
    },

    /// List the contents of an archive
    List {
        #[arg(value_name = "PAK")]
        pak: PathBuf,

        /// List verbosely (offsets, sizes, checksums)
        #[arg(short = 'v')]
        verbose: bool,
    },

    /// Check offsets and checksums of every file in an archive
    Verify {
        #[arg(value_name = "PAK")]
        pak: PathBuf,
    },
}

impl Cli {
    /// Default log filter when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.debug) {
            (0, true) => "debug",
            (0, false) => "info",
            (1, _) => "warn",
            _ => "error",
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }
}
