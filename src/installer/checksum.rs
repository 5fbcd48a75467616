//! SHA-256 digests for staged and placed binaries.

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

use super::{ErrorExt, Result};

/// Hex-encoded SHA-256 of a file, read in 8KB chunks.
///
/// Blocking; call from `spawn_blocking` when on the runtime.
pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
