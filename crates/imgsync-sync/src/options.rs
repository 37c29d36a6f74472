use std::path::PathBuf;

#[derive(Clone, Debug, Default)]
pub struct SyncOptions {
    /// Compute identities and report; fetch and write nothing.
    pub dry_run:              bool,
    /// Sync even when the store already records the identity.
    pub force:                bool,
    /// Run everything up to the upload, then stop. Hook verdicts are read
    /// but not recorded.
    pub no_upload:            bool,
    /// Skip pre-upload hooks.
    pub skip_hooks:           bool,
    /// Skip transform hooks. An artifact that declares any is then neither
    /// uploaded nor given new verdicts.
    pub skip_transform_hooks: bool,
    /// Directory hook input globs are resolved against.
    pub base_dir:             PathBuf,
}
