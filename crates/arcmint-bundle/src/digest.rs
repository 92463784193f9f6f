//! Streaming SHA-256 for bundle member files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Files are hashed in fixed-size blocks, never loaded whole.
pub const BLOCK_SIZE: usize = 64 * 1024;

/// SHA-256 of a file's raw bytes, lowercase hex.
///
/// Reads the file in [`BLOCK_SIZE`] blocks until exhausted, so the
/// digest reflects the durable bytes on disk rather than any in-memory
/// copy of them.
pub fn sha256_file_hex(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut block = [0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut block)?;
        if n == 0 {
            break;
        }
        hasher.update(&block[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
