//! In-memory zip codec used to read uploaded archives and write the result.

mod zip;

pub use self::zip::{ZipBuilder, ZipReader};

/// File extension of a packaged module.
pub const PACKAGE_EXTENSION: &str = ".jar";

/// Returns true if an archive entry name looks like a packaged module.
pub fn is_package(entry_name: &str) -> bool {
    entry_name.ends_with(PACKAGE_EXTENSION)
}
