#![forbid(unsafe_code)]

use crate::zap::codec::Compression;

/// Human-readable size, 1024 ladder, two decimals.
pub fn pretty_size(size: u64) -> String {
    const SUFFIXES: [&str; 5] = [" B", " KB", " MB", " GB", " TB"];

    let mut value = size as f64;
    let mut index = 0;
    while value >= 1024.0 && index < SUFFIXES.len() - 1 {
        value /= 1024.0;
        index += 1;
    }

    format!("{value:.2}{}", SUFFIXES[index])
}

pub fn pretty_version(version: u8) -> &'static str {
    match version {
        0 => "1.0",
        _ => "unknown",
    }
}

pub fn pretty_compression(id: u8) -> &'static str {
    match Compression::from_id(id) {
        Some(codec) => codec.name(),
        None => "unknown",
    }
}
