use std::fmt::Write;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of the analysis server protocol this catalog describes.
pub const PROTOCOL_VERSION: &str = "1.38.0";

/// Returns a formatted version string including build metadata if available.
#[must_use]
pub fn version_string() -> String {
    let mut s = format!("aswire {VERSION} (protocol {PROTOCOL_VERSION})");

    if let Some(hash) = option_env!("ASWIRE_BUILD_GIT_HASH") {
        let _ = write!(s, " [{hash}]");
    }

    s
}
