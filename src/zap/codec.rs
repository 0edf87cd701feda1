#![forbid(unsafe_code)]

use crate::zap::error::{ZapError, ZapResult};

/// Zstd level used by the builder. Not exposed on the CLI.
#[cfg(feature = "zstd")]
const ZSTD_LEVEL: i32 = 6;

/// Codec ids as stored in the header. One codec covers the whole archive.
///
/// Adding a codec means adding a variant here plus its arms in
/// `compress`/`decompress`; the reader and builder never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Compression {
    /// Payloads stored as-is.
    None = 0,
    /// Zstd-compressed payloads (requires feature "zstd").
    Zstd = 1,
}

impl Compression {
    pub fn from_id(id: u8) -> Option<Compression> {
        match id {
            0 => Some(Compression::None),
            1 => Some(Compression::Zstd),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zstd => "zstd",
        }
    }

    /// Whether this build can encode and decode payloads for the codec.
    pub fn is_supported(self) -> bool {
        match self {
            Compression::None => true,
            Compression::Zstd => cfg!(feature = "zstd"),
        }
    }
}

/// Compresses `data`, consuming it and returning a newly owned buffer.
/// The identity codec is a pass-through with `out.len() == in.len()`.
/// Never partially succeeds.
pub(crate) fn compress(compression: Compression, data: Vec<u8>) -> ZapResult<Vec<u8>> {
    match compression {
        Compression::None => Ok(data),
        Compression::Zstd => {
            #[cfg(feature = "zstd")]
            {
                zstd::bulk::compress(&data, ZSTD_LEVEL).map_err(|e| ZapError::Codec(e.to_string()))
            }
            #[cfg(not(feature = "zstd"))]
            {
                let _ = data;
                Err(ZapError::Unsupported(compression.id()))
            }
        }
    }
}

/// Decompresses `data` into a buffer of exactly `expected_len` bytes. The
/// stored decompressed size is the contract; any mismatch is a codec error.
pub(crate) fn decompress(
    compression: Compression,
    data: Vec<u8>,
    expected_len: usize,
) -> ZapResult<Vec<u8>> {
    match compression {
        Compression::None => {
            if data.len() != expected_len {
                return Err(ZapError::Codec(format!(
                    "stored size {} does not match expected size {expected_len}",
                    data.len()
                )));
            }
            Ok(data)
        }
        Compression::Zstd => {
            #[cfg(feature = "zstd")]
            {
                let out = zstd::bulk::decompress(&data, expected_len)
                    .map_err(|e| ZapError::Codec(e.to_string()))?;
                if out.len() != expected_len {
                    return Err(ZapError::Codec(format!(
                        "decompressed to {} bytes, expected {expected_len}",
                        out.len()
                    )));
                }
                Ok(out)
            }
            #[cfg(not(feature = "zstd"))]
            {
                let _ = (data, expected_len);
                Err(ZapError::Unsupported(compression.id()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_mapping_is_closed() {
        assert_eq!(Compression::from_id(0), Some(Compression::None));
        assert_eq!(Compression::from_id(1), Some(Compression::Zstd));
        assert_eq!(Compression::from_id(9), None);
        assert_eq!(Compression::None.id(), 0);
        assert_eq!(Compression::Zstd.id(), 1);
    }

    #[test]
    fn identity_is_always_supported() {
        assert!(Compression::None.is_supported());
    }

    #[test]
    fn identity_is_pass_through() {
        let data = b"hello".to_vec();
        let out = compress(Compression::None, data.clone()).unwrap();
        assert_eq!(out, data);
        assert_eq!(decompress(Compression::None, out, data.len()).unwrap(), data);
    }

    #[test]
    fn identity_rejects_size_mismatch() {
        assert!(decompress(Compression::None, vec![1, 2, 3], 4).is_err());
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_round_trip() {
        let data = vec![7u8; 4096];
        let packed = compress(Compression::Zstd, data.clone()).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(
            decompress(Compression::Zstd, packed, data.len()).unwrap(),
            data
        );
    }

    #[cfg(feature = "zstd")]
    #[test]
    fn zstd_rejects_wrong_expected_len() {
        let packed = compress(Compression::Zstd, vec![7u8; 4096]).unwrap();
        assert!(decompress(Compression::Zstd, packed, 16).is_err());
    }

    #[cfg(not(feature = "zstd"))]
    #[test]
    fn zstd_unavailable_without_feature() {
        assert!(!Compression::Zstd.is_supported());
        assert!(compress(Compression::Zstd, vec![1, 2, 3]).is_err());
    }
}
