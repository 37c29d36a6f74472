//! Manifest model for artifact sync.
//!
//! A manifest lists the artifacts to mirror. Each [`Artifact`] names its
//! source, the checksums that pin it, the hooks that transform and gate it,
//! and the destination key in the object store. This crate also derives the
//! artifact's effective identity, the key that makes syncing idempotent.

pub use duration::parse_duration;
pub use error::{IdentityError, ManifestError, Result};
pub use identity::{INPUTS_MARKER, hash_input_files, resolve_inputs};
pub use model::{
    Artifact, DEFAULT_HOOK_TIMEOUT, Hook, Hooks, MANIFEST_KIND, Manifest, Metadata,
    SUPPORTED_API_VERSION, Source, Spec, Validation,
};

mod duration;
mod error;
mod identity;
mod model;
mod validate;
