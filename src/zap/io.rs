#![forbid(unsafe_code)]

use std::io::{Read, Write};

use crate::zap::error::{ZapError, ZapResult};

pub fn write_u32(w: &mut dyn Write, v: u32) -> ZapResult<()> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn read_exact<const N: usize>(r: &mut dyn Read) -> ZapResult<[u8; N]> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

pub fn read_u32(r: &mut dyn Read) -> ZapResult<u32> {
    Ok(u32::from_le_bytes(read_exact::<4>(r)?))
}

/// Reads bytes up to and excluding a NUL terminator.
pub fn read_cstring(r: &mut dyn Read) -> ZapResult<String> {
    let mut bytes = Vec::new();
    loop {
        let b = read_exact::<1>(r)?[0];
        if b == 0 {
            break;
        }
        bytes.push(b);
    }
    String::from_utf8(bytes).map_err(|_| ZapError::Invalid("path is not utf8".into()))
}
