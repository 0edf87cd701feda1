#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use azpak::zap;

#[derive(Debug, Parser)]
#[command(name = "azpak", version, about = "AZ asset pack tool (ZAP v1)")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List entries and sizes in an archive.
    List {
        /// Archive file.
        #[arg(long)]
        archive: PathBuf,
    },

    /// Extract an archive to an output directory.
    Extract {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Write stored payloads verbatim without decompressing.
        #[arg(long, default_value_t = false)]
        raw: bool,
    },

    /// Pack files (and, with --recursive, directories) into an archive.
    Pack {
        /// Output archive file.
        #[arg(long, default_value = "archive.zap")]
        output: PathBuf,
        /// Compression id (0 = none, 1 = zstd).
        #[arg(long, default_value_t = 0)]
        compression: u8,
        /// Descend into directories.
        #[arg(long, default_value_t = false)]
        recursive: bool,
        /// Files or directories to add.
        paths: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    let res = match cli.cmd {
        Command::List { archive } => zap::list(&archive),
        Command::Extract {
            archive,
            output,
            raw,
        } => zap::extract(&archive, &output, raw),
        Command::Pack {
            output,
            compression,
            recursive,
            paths,
        } => zap::pack(&paths, &output, compression, recursive),
    };

    if let Err(e) = res {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
