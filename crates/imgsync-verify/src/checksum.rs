use std::fmt;
use std::str::FromStr;

use crate::hasher::{Hasher, Sha256Hasher, Sha512Hasher};
use crate::{Result, VerifyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Sha256,
    Sha512,
}

impl Algorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    pub fn hasher(self) -> AlgorithmHasher {
        match self {
            Algorithm::Sha256 => AlgorithmHasher::Sha256(Sha256Hasher::new()),
            Algorithm::Sha512 => AlgorithmHasher::Sha512(Sha512Hasher::new()),
        }
    }
}

impl FromStr for Algorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            other => Err(VerifyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Hasher selected at runtime from a declared [`Algorithm`].
pub enum AlgorithmHasher {
    Sha256(Sha256Hasher),
    Sha512(Sha512Hasher),
}

impl Hasher for AlgorithmHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            AlgorithmHasher::Sha256(h) => h.update(data),
            AlgorithmHasher::Sha512(h) => h.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            AlgorithmHasher::Sha256(h) => h.finalize(),
            AlgorithmHasher::Sha512(h) => h.finalize(),
        }
    }
}

/// A declared checksum in `<algorithm>:<hex digest>` form, e.g. `sha256:ab12...`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Checksum {
    algorithm: Algorithm,
    digest:    String,
}

impl Checksum {
    pub fn parse(s: &str) -> Result<Self> {
        let (algorithm, digest) = s
            .split_once(':')
            .ok_or_else(|| VerifyError::InvalidFormat(s.to_string()))?;
        if digest.is_empty() {
            return Err(VerifyError::InvalidFormat(s.to_string()));
        }
        Ok(Self {
            algorithm: algorithm.parse()?,
            digest:    digest.to_ascii_lowercase(),
        })
    }

    pub fn algorithm(&self) -> Algorithm { self.algorithm }

    /// Lowercase hex digest without the algorithm prefix.
    pub fn hex(&self) -> &str { &self.digest }

    pub fn hasher(&self) -> AlgorithmHasher { self.algorithm.hasher() }

    /// Compare a finished digest against this checksum.
    pub fn check(&self, actual: &[u8]) -> Result<()> {
        let actual = hex::encode(actual);
        if actual == self.digest {
            Ok(())
        } else {
            Err(VerifyError::Mismatch {
                expected: self.digest.clone(),
                actual,
            })
        }
    }
}

impl FromStr for Checksum {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}
