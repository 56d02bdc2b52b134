//! Centralized configuration for crucible-meta.
//!
//! Constants for the instance registry file, rickshaw run documents and the
//! Crucible result layout.

/// Built-in instance registry values, used when the registry file is missing
/// or empty.
pub struct RegistryConfig;

impl RegistryConfig {
    pub const DEFAULT_INSTANCE_NAME: &'static str = "local";
    pub const DEFAULT_INSTANCE_HOST: &'static str = "localhost:9200";
    pub const DEFAULT_INSTANCE_CDMVER: &'static str = "v8dev";
    pub const JSON_INDENT: &'static [u8] = b"  ";
    pub const CFG_ENV_VAR: &'static str = "CRUCIBLE_INSTANCES_CFG";
}

/// Crucible run result layout.
pub struct ResultsConfig;

impl ResultsConfig {
    pub const DEFAULT_RUN_DIR: &'static str = "/var/lib/crucible/run";
    pub const RUN_DIR_ENV_VAR: &'static str = "CRUCIBLE_RUN_DIR";
    pub const RUN_SUBDIR: &'static str = "run";
    pub const RUN_FILE_XZ: &'static str = "rickshaw-run.json.xz";
    pub const RUN_FILE_PLAIN: &'static str = "rickshaw-run.json";
    /// Directory entry in the run dir that always points at the newest result.
    pub const LATEST_LINK: &'static str = "latest";
    pub const JSON_INDENT: &'static [u8] = b"    ";
    /// Appended to the run file name when it is moved aside before a rewrite.
    pub const BACKUP_TIMESTAMP_FORMAT: &'static str = ".%Y-%m-%d_%H:%M:%S.%6f";
    pub const XZ_PRESET: u32 = 6;
}
