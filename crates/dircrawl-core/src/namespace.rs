//! The library filesystem namespace.
//!
//! Database libraries are exposed under a virtual `/QSYS.LIB` directory,
//! one `<NAME>.LIB` subdirectory per library.

use std::path::{Path, PathBuf};

/// Path marker identifying the library namespace.
pub const LIBRARY_NAMESPACE_MARKER: &str = "/QSYS.LIB";

/// Check if a path lies in (or is) the library namespace.
///
/// The match is case-insensitive and anywhere in the path.
pub fn is_library_path(path: &Path) -> bool {
    path.to_string_lossy()
        .to_uppercase()
        .contains(LIBRARY_NAMESPACE_MARKER)
}

/// Map a library name to its directory in the namespace.
pub fn library_path(library: &str) -> PathBuf {
    PathBuf::from(format!("{LIBRARY_NAMESPACE_MARKER}/{}.LIB", library.trim()).to_uppercase())
}
