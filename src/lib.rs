#![forbid(unsafe_code)]

//! # azpak
//!
//! Single-file asset archives ("ZAP v1"): many named virtual files bundled
//! into one blob, optionally compressed with a single archive-wide codec,
//! with random access to any member without decompressing the whole
//! archive.
//!
//! The [`zap`] module holds the core: the codec registry, the header
//! codec, the [`Archive`] reader, and the [`ArchiveBuilder`]. The `azpak`
//! binary wires them to `list`, `extract`, and `pack` subcommands.
//!
//! ## Example
//!
//! ```no_run
//! use azpak::{Archive, ArchiveBuilder, Compression};
//!
//! fn main() -> azpak::ZapResult<()> {
//!     let mut builder = ArchiveBuilder::new();
//!     builder.add_file("README.md", "docs/readme.md");
//!     builder.build_file("docs.zap", Compression::None)?;
//!
//!     let mut archive = Archive::open_file("docs.zap")?;
//!     let bytes = archive.data("docs/readme.md")?;
//!     println!("{} bytes", bytes.len());
//!     Ok(())
//! }
//! ```

pub mod zap;

pub use zap::{Archive, ArchiveBuilder, Compression, Entry, ZapError, ZapResult};
