//! External hook execution for synced artifacts.
//!
//! Transform hooks rewrite a private working copy of the artifact in place,
//! one after another. Pre-upload hooks gate the upload; their verdicts are
//! recorded in the object store so a hook that already passed for an
//! identity is not run again.
//!
//! Every hook runs as a subprocess with the artifact path as its first
//! argument, under a timeout, with stdout and stderr echoed line by line and
//! captured up to [`MAX_OUTPUT_BYTES`].

pub use capture::{ERROR_OUTPUT_BYTES, MAX_OUTPUT_BYTES, TRUNCATION_MARKER, truncate_output};
pub use error::{HookError, Result};
pub use executor::{HookExecutor, PreUploadReport, TransformOutput, Verdict};
pub use runner::{Completion, HOOK_CACHE_ENV, HookRun, HookRunner, OUTPUT_PREFIX};

mod capture;
mod error;
mod executor;
mod runner;
