//! Documentation run driver.
//!
//! Asks the factory for one builder per page in traversal order and runs it:
//! module pages, package pages, type pages, then the run-wide constants
//! summary and serialized form. A failed page is recorded and the run moves
//! on; invariant violations stop it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use parking_lot::Mutex;
use rayon::prelude::*;

use crate::builders::Builder;
use crate::entity::{ClassTree, DocSet, TypeElement};
use crate::error::{BuildError, Result};
use crate::factory::BuilderFactory;
use crate::layout::PageKind;
use crate::matching::EntityFilter;

/// A page whose builder failed; the rest of the run went on without it.
#[derive(Debug)]
pub struct PageFailure {
    pub page: PageKind,
    pub entity: String,
    pub error: BuildError,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub pages_built: usize,
    /// Pages whose builder was inert: disabled or writer unsupported.
    pub pages_skipped: usize,
    pub failures: Vec<PageFailure>,
    pub build_time: Duration,
    pub packages_seen: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Previous and next entries around `index`, absent at either end.
pub fn neighbors<T>(items: &[T], index: usize) -> (Option<&T>, Option<&T>) {
    let prev = index.checked_sub(1).and_then(|i| items.get(i));
    let next = index.checked_add(1).and_then(|i| items.get(i));
    (prev, next)
}

/// Entities of `docs` accepted by `filter`. An excluded package name drops
/// the package with all its types; otherwise a package is kept when its own
/// name or any of its remaining types is accepted.
pub fn select_entities(docs: &DocSet, filter: &EntityFilter) -> DocSet {
    let modules = docs
        .modules
        .iter()
        .filter(|m| filter.accepts(&m.name))
        .cloned()
        .collect();

    let packages = docs
        .packages
        .iter()
        .filter(|p| !filter.excludes(p.id.as_str()))
        .filter_map(|p| {
            let mut package = p.clone();
            package.types.retain(|t| filter.accepts(&t.qualified_name()));
            if package.types.is_empty() && !filter.accepts(package.id.as_str()) {
                None
            } else {
                Some(package)
            }
        })
        .collect();

    DocSet { modules, packages }
}

/// Page outcomes, shared by concurrently built pages.
struct Tally {
    built: AtomicUsize,
    skipped: AtomicUsize,
    failures: Mutex<Vec<PageFailure>>,
    stop_on_failure: bool,
}

impl Tally {
    fn new(stop_on_failure: bool) -> Self {
        Self {
            built: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            failures: Mutex::new(Vec::new()),
            stop_on_failure,
        }
    }

    /// Run one page builder. `Err` means the run must stop.
    fn run(&self, mut builder: Builder<'_>) -> Result<()> {
        let inert = builder.is_noop();
        match builder.run() {
            Ok(()) if inert => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Ok(()) => {
                self.built.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(error) if error.is_fatal() || self.stop_on_failure => Err(error),
            Err(error) => {
                warn!(
                    "Failed to build {} page for {}: {}",
                    builder.page_kind(),
                    builder.entity(),
                    error
                );
                self.failures.lock().push(PageFailure {
                    page: builder.page_kind(),
                    entity: builder.entity().to_string(),
                    error,
                });
                Ok(())
            }
        }
    }

    fn into_report(self, build_time: Duration, packages_seen: usize) -> RunReport {
        RunReport {
            pages_built: self.built.into_inner(),
            pages_skipped: self.skipped.into_inner(),
            failures: self.failures.into_inner(),
            build_time,
            packages_seen,
        }
    }
}

/// A type with its previous and next sibling in the package.
type TypePage<'d> = (
    &'d TypeElement,
    Option<&'d TypeElement>,
    Option<&'d TypeElement>,
);

fn build_type_page(
    tally: &Tally,
    factory: &BuilderFactory<'_>,
    tree: &ClassTree<'_>,
    &(ty, prev, next): &TypePage<'_>,
) -> Result<()> {
    tally.run(factory.class_builder(ty, prev, next, tree))
}

pub struct DocumentationRun;

impl DocumentationRun {
    /// Build every page of `docs` and close the factory's context.
    ///
    /// The context cannot be reused afterwards, whether the run succeeds or not.
    pub fn generate<'a>(factory: &'a BuilderFactory<'a>, docs: &DocSet) -> Result<RunReport> {
        let context = factory.context();
        context.ensure_open()?;

        let result = Self::build_pages(factory, docs);
        context.finish();
        result
    }

    fn build_pages(factory: &BuilderFactory<'_>, docs: &DocSet) -> Result<RunReport> {
        let start_time = Instant::now();
        let context = factory.context();
        let config = context.config();

        let docs = select_entities(docs, &config.entity_filter()?);
        let tree = ClassTree::build(&docs);
        let tally = Tally::new(config.fail_on_page_error);

        info!(
            "Documenting {} modules, {} packages, {} types",
            docs.modules.len(),
            docs.packages.len(),
            docs.types().count()
        );

        for (index, module) in docs.modules.iter().enumerate() {
            let (prev, next) = neighbors(&docs.modules, index);
            tally.run(factory.module_summary_builder(module, prev, next))?;
        }

        for (index, package) in docs.packages.iter().enumerate() {
            let (prev, next) = neighbors(&docs.packages, index);
            tally.run(factory.package_summary_builder(package, prev, next))?;
        }

        let type_pages: Vec<TypePage<'_>> = docs
            .packages
            .iter()
            .flat_map(|package| {
                let types = &package.types;
                (0..types.len()).map(move |index| {
                    let (prev, next) = neighbors(types, index);
                    (&types[index], prev, next)
                })
            })
            .collect();

        if config.parallel_pages && type_pages.len() > 1 {
            let jobs = config.worker_threads();
            debug!("Building {} type pages on {} threads", type_pages.len(), jobs);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|e| BuildError::Config(format!("thread pool: {}", e)))?;
            pool.install(|| {
                type_pages
                    .par_iter()
                    .try_for_each(|page| build_type_page(&tally, factory, &tree, page))
            })?;
        } else {
            for page in &type_pages {
                build_type_page(&tally, factory, &tree, page)?;
            }
        }

        tally.run(factory.constants_summary_builder(&docs))?;
        tally.run(factory.serialized_form_builder(&docs))?;

        let build_time = start_time.elapsed();
        let report = tally.into_report(build_time, context.packages_seen_count());
        info!(
            "Documentation run completed in {:?}: {} built, {} skipped, {} failed",
            build_time,
            report.pages_built,
            report.pages_skipped,
            report.failures.len()
        );
        Ok(report)
    }
}
