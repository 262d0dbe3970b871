use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::Error;

const CHUNK_SIZE: usize = 64 * 1024;

/// Calculates the SHA-256 digest of a file, returned as lowercase hex.
///
/// The file is streamed in fixed-size chunks, so arbitrarily large files can be hashed.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened or read.
pub fn sha256_file(path: impl AsRef<Path>) -> crate::Result<String> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|source| Error::io(path, source))?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
    let mut hasher = Sha256::new();

    loop {
        let chunk = reader.fill_buf().map_err(|source| Error::io(path, source))?;

        if chunk.is_empty() {
            break;
        }

        hasher.update(chunk);

        let consumed = chunk.len();
        reader.consume(consumed);
    }

    Ok(hex::encode(hasher.finalize()))
}
