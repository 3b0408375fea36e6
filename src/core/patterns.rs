use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;

/// Builds a `GlobSet` from a set of `.gitignore`-style patterns.
///
/// Blank lines and `#` comments are skipped. A trailing `/` marks a directory
/// pattern, which matches the directory itself and everything below it.
pub fn build_globset_from_patterns(patterns: &HashSet<String>) -> GlobSet {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let trimmed_pattern = pattern.trim();
        if trimmed_pattern.is_empty() || trimmed_pattern.starts_with('#') {
            continue;
        }

        let name = trimmed_pattern.trim_end_matches('/');
        for glob in [format!("**/{name}"), format!("**/{name}/**")] {
            match Glob::new(&glob) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => tracing::warn!("Ignoring invalid pattern {:?}: {}", trimmed_pattern, e),
            }
        }
    }

    builder.build().unwrap_or_else(|e| {
        tracing::error!("Failed to build glob set from patterns: {}", e);
        GlobSet::empty()
    })
}
