#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::zap::build::ArchiveBuilder;
use crate::zap::codec::Compression;
use crate::zap::error::{ZapError, ZapResult};
use crate::zap::path::{clean_path, is_extraction_safe, walked_path};
use crate::zap::pretty::{pretty_compression, pretty_size, pretty_version};
use crate::zap::read::Archive;

/// Prints archive metadata and an aligned entry table with size totals.
pub fn list(archive_path: &Path) -> ZapResult<()> {
    let archive = Archive::open_file(archive_path)?;

    let supported = if archive.is_compression_supported() {
        "supported"
    } else {
        "unsupported"
    };
    println!("Version: {}", pretty_version(archive.version()));
    println!(
        "Compression: {} ({supported})",
        pretty_compression(archive.compression_id())
    );
    println!("File count: {}", archive.file_count());
    println!();

    let mut path_w = "Path".len();
    let mut comp_w = "Comp. size".len();
    let mut decomp_w = "Decomp. size".len();
    for (path, entry) in archive.entries() {
        path_w = path_w.max(path.len());
        comp_w = comp_w.max(pretty_size(entry.compressed_size.into()).len());
        decomp_w = decomp_w.max(pretty_size(entry.decompressed_size.into()).len());
    }

    println!("{:<path_w$}  {:>comp_w$}  {:>decomp_w$}", "Path", "Comp. size", "Decomp. size");
    let mut total_comp: u64 = 0;
    let mut total_decomp: u64 = 0;
    for (path, entry) in archive.entries() {
        total_comp += u64::from(entry.compressed_size);
        total_decomp += u64::from(entry.decompressed_size);
        println!(
            "{:<path_w$}  {:>comp_w$}  {:>decomp_w$}",
            path,
            pretty_size(entry.compressed_size.into()),
            pretty_size(entry.decompressed_size.into()),
        );
    }
    println!();
    println!("Total comp.: {}", pretty_size(total_comp));
    println!("Total decomp.: {}", pretty_size(total_decomp));
    Ok(())
}

/// Extracts every entry under `output`. One bad entry is logged and
/// skipped, never aborting the rest of the run. With `raw`, stored
/// payloads are written verbatim without decoding, which also works when
/// this build lacks the archive's codec.
pub fn extract(archive_path: &Path, output: &Path, raw: bool) -> ZapResult<()> {
    let mut archive = Archive::open_file(archive_path)?;
    fs::create_dir_all(output)?;

    let mut written = 0usize;
    for path in archive.file_list() {
        if !is_extraction_safe(&path) {
            warn!(path = %path, "skipping entry that would escape the output directory");
            continue;
        }

        let bytes = if raw {
            archive.raw_data(&path)
        } else {
            archive.data(&path)
        };
        let bytes = match bytes {
            Ok(b) => b,
            Err(e) => {
                warn!(path = %path, error = %e, "skipping entry");
                continue;
            }
        };

        let out_path = output.join(path.replace('/', &std::path::MAIN_SEPARATOR.to_string()));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, &bytes)?;
        written += 1;
    }

    info!(written, total = archive.file_count(), "extraction finished");
    Ok(())
}

/// Collects the given paths into a builder and writes the archive in one
/// build call. Plain files are stored under their cleaned path as given;
/// directories are only descended into with `recursive`.
pub fn pack(
    inputs: &[String],
    output: &Path,
    compression_id: u8,
    recursive: bool,
) -> ZapResult<()> {
    let compression = Compression::from_id(compression_id)
        .filter(|c| c.is_supported())
        .ok_or(ZapError::Unsupported(compression_id))?;

    let mut builder = ArchiveBuilder::new();
    for input in inputs {
        let cleaned = clean_path(input);
        if cleaned.is_empty() {
            continue;
        }

        let root = Path::new(&cleaned);
        if root.is_dir() {
            if !recursive {
                warn!(path = %cleaned, "skipping directory (pass --recursive to descend)");
                continue;
            }
            for ent in WalkDir::new(root).follow_links(false) {
                let ent = ent.map_err(|e| {
                    let msg = e.to_string();
                    let io = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg));
                    ZapError::Io(io)
                })?;
                if !ent.file_type().is_file() {
                    continue;
                }
                let virtual_path = walked_path(root, ent.path())?;
                if !builder.add_file(ent.path(), &virtual_path) {
                    warn!(path = %virtual_path, "virtual path already added, skipping");
                }
            }
        } else if !builder.add_file(&cleaned, &cleaned) {
            warn!(path = %cleaned, "virtual path already added, skipping");
        }
    }

    info!(
        files = builder.file_count(),
        output = %output.display(),
        compression = compression.name(),
        "building archive"
    );
    builder.build_file(output, compression)
}
