use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::{Checksum, Hasher, Result};

/// Streaming reader that hashes data as it passes through.
pub struct VerifiedReader<R, H> {
    reader: R,
    hasher: H,
    bytes:  u64,
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes: 0,
        }
    }

    /// Bytes hashed so far.
    pub fn bytes_read(&self) -> u64 { self.bytes }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes += n as u64;
        }
        Ok(n)
    }
}

impl<R, H: Hasher> VerifiedReader<R, H> {
    /// Finalize and return the raw digest.
    pub fn into_digest(self) -> Vec<u8> { self.hasher.finalize() }
}

/// Drain `reader` and compare its digest against `expected`.
/// Returns the number of bytes consumed.
pub fn verify_reader<R: Read>(reader: R, expected: &Checksum) -> Result<u64> {
    let mut verified = VerifiedReader::new(reader, expected.hasher());
    io::copy(&mut verified, &mut io::sink())?;
    let bytes = verified.bytes_read();
    expected.check(&verified.into_digest())?;
    Ok(bytes)
}

/// Hash the file at `path` and compare against `expected`.
pub fn verify_file(path: &Path, expected: &Checksum) -> Result<u64> {
    let file = File::open(path)?;
    verify_reader(io::BufReader::new(file), expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sha256Hasher, VerifyError};
    use std::io::Cursor;

    fn sha256_of(data: &[u8]) -> Checksum {
        Checksum::parse(&format!("sha256:{}", hex::encode(Sha256Hasher::digest(data)))).unwrap()
    }

    #[test]
    fn test_verified_reader_passthrough() {
        let data = b"test data for verification";
        let mut verified = VerifiedReader::new(Cursor::new(data), Sha256Hasher::new());
        let mut out = Vec::new();
        verified.read_to_end(&mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(verified.bytes_read(), data.len() as u64);
        assert_eq!(verified.into_digest(), Sha256Hasher::digest(data));
    }

    #[test]
    fn test_verify_reader_success() {
        let data = b"payload";
        let n = verify_reader(Cursor::new(data), &sha256_of(data)).unwrap();
        assert_eq!(n, 7);
    }

    #[test]
    fn test_verify_reader_mismatch() {
        let err = verify_reader(Cursor::new(b"payload"), &sha256_of(b"other")).unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_verify_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_file(&dir.path().join("absent"), &sha256_of(b"")).unwrap_err();
        assert!(matches!(err, VerifyError::Io(_)));
    }

    #[test]
    fn test_verify_file_sha512() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"abc").unwrap();
        let expected = Checksum::parse(&format!(
            "sha512:{}",
            hex::encode(crate::Sha512Hasher::digest(b"abc"))
        ))
        .unwrap();
        assert_eq!(verify_file(&path, &expected).unwrap(), 3);
    }
}
