//! Content verification primitives for synced artifacts.
//!
//! Checksums are declared as `<algorithm>:<hex>` strings in the manifest and
//! parsed into [`Checksum`]. Verification is incremental: [`VerifiedReader`]
//! hashes bytes as they stream through, so a file is touched once.
//!
//! # Example
//!
//! ```
//! use imgsync_verify::{Checksum, verify_reader};
//!
//! let expected = Checksum::parse(
//!     "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
//! )
//! .unwrap();
//! let size = verify_reader(&b"hello world"[..], &expected).unwrap();
//! assert_eq!(size, 11);
//! ```

pub use self::checksum::{Algorithm, AlgorithmHasher, Checksum};
pub use self::error::{Result, VerifyError};
pub use self::hasher::{DigestHasher, Hasher, Sha256Hasher, Sha512Hasher};
pub use self::reader::{VerifiedReader, verify_file, verify_reader};

mod checksum;
mod error;
mod hasher;
mod reader;
