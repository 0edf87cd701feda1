#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::zap::codec::{self, Compression};
use crate::zap::error::{ZapError, ZapResult};
use crate::zap::format::{Entry, Header};
use crate::zap::io::{read_cstring, read_exact, read_u32};

/// Archive byte source: a file handle or an owned in-memory buffer. Either
/// way the reader holds the only cursor over it.
enum Source {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

impl Read for Source {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Source::File(f) => f.read(buf),
            Source::Memory(c) => c.read(buf),
        }
    }
}

impl Seek for Source {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        match self {
            Source::File(f) => f.seek(pos),
            Source::Memory(c) => c.seek(pos),
        }
    }
}

/// An opened archive: the parsed header plus a path -> entry lookup table
/// built once at open time.
///
/// Metadata lookups never touch the source again; only `data` and
/// `raw_data` seek and read. Every operation is synchronous and the value
/// owns an exclusive cursor, so sharing one `Archive` across threads needs
/// external serialization; independent `Archive` values over the same file
/// are fine.
pub struct Archive {
    source: Source,
    header: Header,
    entries: BTreeMap<String, Entry>,
}

impl Archive {
    /// Opens an archive file. On any failure no `Archive` value exists, so
    /// a failed open cannot leave a partial table or dangling handle.
    pub fn open_file(path: impl AsRef<Path>) -> ZapResult<Archive> {
        Self::from_source(Source::File(File::open(path)?))
    }

    /// Opens an archive held in memory.
    pub fn open_memory(data: Vec<u8>) -> ZapResult<Archive> {
        Self::from_source(Source::Memory(Cursor::new(data)))
    }

    fn from_source(mut source: Source) -> ZapResult<Archive> {
        source.seek(SeekFrom::Start(0))?;
        let header = Header::decode(read_exact::<4>(&mut source)?)?;
        let entries = read_table(&mut source)?;
        Ok(Archive {
            source,
            header,
            entries,
        })
    }

    /// Releases the underlying source. Dropping the value does the same.
    pub fn close(self) {}

    pub fn version(&self) -> u8 {
        self.header.version
    }

    /// Raw codec id from the header. May name a codec this build lacks.
    pub fn compression_id(&self) -> u8 {
        self.header.compression
    }

    /// The archive codec, if the id is known to this build at all.
    pub fn compression(&self) -> Option<Compression> {
        Compression::from_id(self.header.compression)
    }

    /// Whether `data` can decode payloads from this archive.
    pub fn is_compression_supported(&self) -> bool {
        self.compression().is_some_and(Compression::is_supported)
    }

    pub fn has_file(&self, virtual_path: &str) -> bool {
        self.entries.contains_key(virtual_path)
    }

    pub fn entry(&self, virtual_path: &str) -> Option<Entry> {
        self.entries.get(virtual_path).copied()
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// Entry paths in table order.
    pub fn file_list(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// (path, entry) pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }

    /// Decompressed payload bytes for one entry.
    pub fn data(&mut self, virtual_path: &str) -> ZapResult<Vec<u8>> {
        let compression = self
            .compression()
            .filter(|c| c.is_supported())
            .ok_or(ZapError::Unsupported(self.header.compression))?;
        let entry = self.lookup(virtual_path)?;
        let raw = self.read_payload(entry)?;
        codec::decompress(compression, raw, entry.decompressed_size as usize)
    }

    /// Stored payload bytes exactly as they sit in the archive, compressed
    /// form included. No codec is involved, so this works even when the
    /// archive codec is not compiled into this build.
    pub fn raw_data(&mut self, virtual_path: &str) -> ZapResult<Vec<u8>> {
        let entry = self.lookup(virtual_path)?;
        self.read_payload(entry)
    }

    fn lookup(&self, virtual_path: &str) -> ZapResult<Entry> {
        let entry = self
            .entries
            .get(virtual_path)
            .copied()
            .ok_or_else(|| ZapError::NotFound(virtual_path.to_string()))?;
        if entry.is_empty_sentinel() {
            return Err(ZapError::Empty(virtual_path.to_string()));
        }
        Ok(entry)
    }

    fn read_payload(&mut self, entry: Entry) -> ZapResult<Vec<u8>> {
        self.source.seek(SeekFrom::Start(u64::from(entry.offset)))?;
        let mut payload = vec![0u8; entry.compressed_size as usize];
        self.source.read_exact(&mut payload)?;
        Ok(payload)
    }
}

fn read_table(source: &mut Source) -> ZapResult<BTreeMap<String, Entry>> {
    let count = read_u32(source)?;
    let mut table = BTreeMap::new();
    for _ in 0..count {
        let path = read_cstring(source)?;
        let entry = Entry {
            offset: read_u32(source)?,
            decompressed_size: read_u32(source)?,
            compressed_size: read_u32(source)?,
        };
        // Plain map insertion: a malformed table carrying the same path
        // twice resolves last-write-wins.
        table.insert(path, entry);
    }
    Ok(table)
}
