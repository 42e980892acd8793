//! Shared build context: one per documentation run.
//!
//! Every builder created for a run borrows the same [`BuildContext`]. The
//! containing-packages-seen set is its only mutable state and is safe to
//! touch from concurrently built pages.

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;

use crate::config::BuildConfig;
use crate::entity::PackageId;
use crate::error::{BuildError, Result};
use crate::layout::{LayoutProvider, PageKind, StepId};

pub struct BuildContext<'a> {
    config: &'a BuildConfig,
    layout: &'a dyn LayoutProvider,
    containing_packages_seen: DashMap<PackageId, ()>,
    finished: AtomicBool,
}

impl<'a> BuildContext<'a> {
    pub fn new(config: &'a BuildConfig, layout: &'a dyn LayoutProvider) -> Self {
        Self {
            config,
            layout,
            containing_packages_seen: DashMap::new(),
            finished: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &'a BuildConfig {
        self.config
    }

    /// Ordered steps for `kind`; annotation type pages fall back to the class entry.
    pub fn steps_for(&self, kind: PageKind) -> &'a [StepId] {
        let layout = self.layout;
        layout
            .steps_for(kind)
            .or_else(|| kind.fallback().and_then(|f| layout.steps_for(f)))
            .unwrap_or_default()
    }

    /// Record `package` as documented. Returns `true` only for the first claim in this run.
    pub fn claim_package(&self, package: &PackageId) -> bool {
        let first = self.containing_packages_seen.insert(package.clone(), ()).is_none();
        debug!("claim package {}: first={}", package, first);
        first
    }

    /// Claim `package`, running `first` only for the first claim of the run.
    ///
    /// The claim is recorded only when `first` succeeds. Concurrent claimers
    /// of the same package wait for `first` to finish; after a failure the next
    /// claimer runs its own `first`. `first` must not touch this context's
    /// package set.
    pub fn claim_package_with<F>(&self, package: &PackageId, first: F) -> Result<bool>
    where
        F: FnOnce() -> Result<()>,
    {
        match self.containing_packages_seen.entry(package.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                first()?;
                slot.insert(());
                debug!("claim package {}: first=true", package);
                Ok(true)
            }
        }
    }

    pub fn is_package_seen(&self, package: &PackageId) -> bool {
        self.containing_packages_seen.contains_key(package)
    }

    pub fn packages_seen_count(&self) -> usize {
        self.containing_packages_seen.len()
    }

    /// Close the run. Later builder requests are contract violations.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_finished() {
            return Err(BuildError::invariant(
                "build context reused after its run finished",
            ));
        }
        Ok(())
    }
}
