//! Streaming content hashing for duplicate detection.

use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Bytes read per chunk while hashing.
pub const CHUNK_SIZE: usize = 8192;

/// Hex-encoded SHA-256 digest of a file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// The digest as 64 lowercase hex characters.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file could not be read to completion.
#[derive(Debug, Error)]
#[error("Error calculating hash for {}: {source}", path.display())]
pub struct HashError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Hashes a file by streaming it in [`CHUNK_SIZE`] chunks.
///
/// # Examples
///
/// ```no_run
/// use declutter::content_hash::hash_file;
/// use std::path::Path;
///
/// match hash_file(Path::new("/tmp/report.pdf")) {
///     Ok(hash) => println!("{}", hash),
///     Err(e) => eprintln!("{}", e),
/// }
/// ```
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
    let wrap = |source| HashError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(wrap)?;
    hash_reader(BufReader::new(file)).map_err(wrap)
}

/// Hashes everything a reader yields.
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<ContentHash> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(ContentHash(format!("{:x}", hasher.finalize())))
}
