// Build-time version from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// "name vX.Y.Z" line for the dashboard header and final status.
pub fn banner() -> String {
    format!("{} v{}", NAME, VERSION)
}
