// ktx-core/src/expand.rs
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use ktx_common::error::{KtxError, Result};
use tracing::{debug, trace};

/// Expands glob patterns into regular files, resolving relative patterns
/// against a fixed root directory.
#[derive(Debug, Clone)]
pub struct PatternExpander {
    root: PathBuf,
}

impl PatternExpander {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns every regular file matching `pattern`, in sorted order.
    /// Matching nothing is not an error.
    pub fn expand(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.to_string()
        } else {
            let root = self.root.to_str().ok_or_else(|| {
                KtxError::Glob(format!(
                    "Root directory contains invalid UTF-8: {}",
                    self.root.display()
                ))
            })?;
            format!(
                "{}/{}",
                Pattern::escape(root.trim_end_matches('/')),
                pattern.trim_start_matches("./")
            )
        };
        debug!("Expanding pattern '{}' as '{}'", pattern, full_pattern);

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        let entries = glob::glob_with(&full_pattern, options)
            .map_err(|e| KtxError::Glob(format!("Invalid glob pattern '{pattern}': {e}")))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                KtxError::Glob(format!("Failed to read match for '{pattern}': {e}"))
            })?;
            if path.is_file() {
                files.push(path);
            } else {
                trace!("Skipping non-file match {}", path.display());
            }
        }
        Ok(files)
    }
}
