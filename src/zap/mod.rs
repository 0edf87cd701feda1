#![forbid(unsafe_code)]

mod build;
mod codec;
mod error;
mod format;
mod io;
mod ops;
mod path;
mod pretty;
mod read;

pub use build::ArchiveBuilder;
pub use codec::Compression;
pub use error::{ZapError, ZapResult};
pub use format::{Entry, Header, MAGIC, VERSION_CUR, VERSION_MAX, VERSION_MIN};
pub use read::Archive;

pub use ops::{extract, list, pack};
