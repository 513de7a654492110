//! Shared test utilities for the shortlinks test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let (registry, _) = build(&SiteConfig::default(), tmp.path()).unwrap();
//!
//! let entry = find_link(&registry, "go");
//! assert_eq!(entry.url, "https://example.com");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::registry::{LinkEntry, LinkRegistry};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated project they can mutate and build into without
/// affecting other tests or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Number of regular files below `dir`.
pub fn count_files(dir: &Path) -> usize {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}

// =========================================================================
// Registry lookups: panic with a clear message on miss
// =========================================================================

/// Find a link by code. Panics if not found.
pub fn find_link<'a>(registry: &'a LinkRegistry, code: &str) -> &'a LinkEntry {
    registry.get(code).unwrap_or_else(|| {
        let codes: Vec<&str> = registry.iter().map(|e| e.code.as_str()).collect();
        panic!("link '{code}' not found. Available: {codes:?}")
    })
}
