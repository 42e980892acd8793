//! Run-wide configuration.
//!
//! The builders only read it. Files are loaded through the `config` crate so
//! `DOCLET_*` environment variables can override individual keys.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::layout::PageKind;
use crate::matching::EntityFilter;

/// Prefix for environment overrides, e.g. `DOCLET_JAVAFX=true`.
pub const ENV_PREFIX: &str = "DOCLET";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Passed through to writers untouched.
    pub locale: String,
    /// Page kinds whose builders are never constructed.
    pub disabled_pages: HashSet<PageKind>,
    /// Qualified-name globs of entities to document.
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    /// Treat a missing writer for an enabled page kind as a page failure.
    pub require_writers: bool,
    /// Document JavaFX-style properties.
    pub javafx: bool,
    /// Leave deprecated members out of summaries and details.
    pub no_deprecated: bool,
    /// Skip description, comment and tag steps.
    pub no_comment: bool,
    /// Build type pages on a thread pool.
    pub parallel_pages: bool,
    pub parallel_jobs: Option<usize>,
    /// Stop the run at the first failed page.
    pub fail_on_page_error: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            disabled_pages: HashSet::new(),
            include_patterns: vec!["**".to_string()],
            exclude_patterns: Vec::new(),
            require_writers: false,
            javafx: false,
            no_deprecated: false,
            no_comment: false,
            parallel_pages: false,
            parallel_jobs: None,
            fail_on_page_error: false,
        }
    }
}

impl BuildConfig {
    /// Load a TOML, YAML or JSON file, then apply `DOCLET_*` overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| BuildError::Config(format!("{}: {}", path.display(), e)))?;

        settings
            .try_deserialize()
            .map_err(|e| BuildError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn is_page_enabled(&self, kind: PageKind) -> bool {
        if self.disabled_pages.contains(&kind) {
            return false;
        }
        match kind {
            PageKind::PropertyDetails => self.javafx,
            _ => true,
        }
    }

    pub fn entity_filter(&self) -> Result<EntityFilter> {
        EntityFilter::new(&self.include_patterns, &self.exclude_patterns)
    }

    pub fn worker_threads(&self) -> usize {
        self.parallel_jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        })
    }
}
