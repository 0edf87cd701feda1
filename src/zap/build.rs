#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Cursor, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::zap::codec::{self, Compression};
use crate::zap::error::{ZapError, ZapResult};
use crate::zap::format::{Header, VERSION_CUR};
use crate::zap::io::write_u32;

/// ZAP v1 layout:
/// - header: [magic 2][version 1][compression 1]
/// - table:  [u32 entry_count]
///   - entries, sorted by virtual path:
///     - [path bytes UTF-8][NUL]
///     - [u32 offset][u32 decompressed_size][u32 compressed_size]
/// - data:   payload blobs, each at its entry's offset
///
/// Offsets and sizes are unknown until payloads are produced, yet sit in
/// the table ahead of the data region, so the table goes out with zeroed
/// triples and each triple is patched once its payload has landed. The
/// sink must be seekable; that is a precondition of the algorithm, not a
/// performance choice.
pub struct ArchiveBuilder {
    /// virtual path -> source path. Key order is the on-disk table order,
    /// so the same pending set always produces the same bytes.
    files: BTreeMap<String, PathBuf>,
}

impl ArchiveBuilder {
    pub fn new() -> ArchiveBuilder {
        ArchiveBuilder {
            files: BTreeMap::new(),
        }
    }

    /// Registers a source file under a virtual path. The same source may
    /// back any number of virtual paths, but each virtual path can only be
    /// claimed once: a duplicate leaves the pending set untouched and
    /// returns false. The source is not touched until build time, so it
    /// does not have to exist yet.
    pub fn add_file(
        &mut self,
        real_path: impl Into<PathBuf>,
        virtual_path: impl Into<String>,
    ) -> bool {
        let virtual_path = virtual_path.into();
        if self.files.contains_key(&virtual_path) {
            return false;
        }
        self.files.insert(virtual_path, real_path.into());
        true
    }

    pub fn remove_file(&mut self, virtual_path: &str) -> bool {
        self.files.remove(virtual_path).is_some()
    }

    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// The pending set, virtual path -> source path.
    pub fn file_map(&self) -> &BTreeMap<String, PathBuf> {
        &self.files
    }

    /// Serializes the pending set to a file.
    pub fn build_file(&self, path: impl AsRef<Path>, compression: Compression) -> ZapResult<()> {
        if !compression.is_supported() {
            return Err(ZapError::Unsupported(compression.id()));
        }
        let mut out = File::create(path)?;
        self.build(&mut out, compression)?;
        out.flush()?;
        Ok(())
    }

    /// Serializes the pending set into an in-memory buffer. Produces the
    /// same bytes as `build_file` for the same pending set.
    pub fn build_memory(&self, compression: Compression) -> ZapResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.build(&mut out, compression)?;
        Ok(out.into_inner())
    }

    /// Writes the archive in two passes over one seekable sink.
    ///
    /// Pass one lays out the header, the entry count, and per entry the
    /// NUL-terminated path plus a zeroed offset/size triple, remembering
    /// where each triple sits. Pass two appends each payload, then seeks
    /// back to patch the matching triple and seeks forward again.
    ///
    /// A source that cannot be read or compressed degrades its entry to
    /// the zero-size sentinel and the build carries on; sink errors abort
    /// the whole build.
    pub fn build<S: Write + Seek>(&self, sink: &mut S, compression: Compression) -> ZapResult<()> {
        if !compression.is_supported() {
            return Err(ZapError::Unsupported(compression.id()));
        }
        let count = u32::try_from(self.files.len())
            .map_err(|_| ZapError::Invalid("too many entries for table".into()))?;
        for virtual_path in self.files.keys() {
            if virtual_path.as_bytes().contains(&0) {
                return Err(ZapError::Invalid(format!(
                    "path contains NUL: {virtual_path:?}"
                )));
            }
        }

        let header = Header {
            version: VERSION_CUR,
            compression: compression.id(),
        };
        sink.write_all(&header.encode())?;
        write_u32(sink, count)?;

        // Table pass.
        let mut patch_positions = Vec::with_capacity(self.files.len());
        for virtual_path in self.files.keys() {
            sink.write_all(virtual_path.as_bytes())?;
            sink.write_all(&[0])?;
            patch_positions.push(sink.stream_position()?);
            sink.write_all(&[0u8; 12])?;
        }

        // Data + patch pass.
        for (real_path, patch_pos) in self.files.values().zip(patch_positions) {
            let offset = u32::try_from(sink.stream_position()?)
                .map_err(|_| ZapError::Invalid("archive exceeds u32 offsets".into()))?;

            let (decompressed_size, compressed_size) =
                match stage_payload(real_path, compression) {
                    Ok(payload) => {
                        sink.write_all(&payload.bytes)?;
                        (payload.decompressed_size, payload.compressed_size)
                    }
                    Err(_) => (0, 0),
                };

            let resume = sink.stream_position()?;
            sink.seek(SeekFrom::Start(patch_pos))?;
            write_u32(sink, offset)?;
            write_u32(sink, decompressed_size)?;
            write_u32(sink, compressed_size)?;
            sink.seek(SeekFrom::Start(resume))?;
        }

        Ok(())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> ArchiveBuilder {
        ArchiveBuilder::new()
    }
}

struct StagedPayload {
    bytes: Vec<u8>,
    decompressed_size: u32,
    compressed_size: u32,
}

/// Reads and compresses one source file without touching the sink, so any
/// failure here stays local to its entry.
fn stage_payload(real_path: &Path, compression: Compression) -> ZapResult<StagedPayload> {
    let raw = fs::read(real_path)?;
    let decompressed_size = u32::try_from(raw.len()).map_err(|_| {
        ZapError::Invalid(format!("file exceeds u32 size: {}", real_path.display()))
    })?;
    if decompressed_size == 0 {
        // An empty source already matches the zero-size sentinel; storing
        // codec output for it would only add unreadable bytes.
        return Ok(StagedPayload {
            bytes: Vec::new(),
            decompressed_size: 0,
            compressed_size: 0,
        });
    }
    let bytes = codec::compress(compression, raw)?;
    let compressed_size = u32::try_from(bytes.len()).map_err(|_| {
        ZapError::Invalid(format!("payload exceeds u32 size: {}", real_path.display()))
    })?;
    Ok(StagedPayload {
        bytes,
        decompressed_size,
        compressed_size,
    })
}
