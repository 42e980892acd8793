//! The builder family.
//!
//! Each builder is bound to one context, one entity and one writer. When run,
//! it asks the layout for the step list of its page kind and executes the
//! steps in order: leaf steps call straight into the writer, section steps
//! construct a nested builder through the factory and run it to completion
//! before moving on.

use std::fmt;

use log::debug;

use crate::context::BuildContext;
use crate::error::{BuildError, Result};
use crate::layout::PageKind;
use crate::writer::WriteResult;

/// A step vocabulary understood by one builder.
pub(crate) trait LayoutStep: Copy + fmt::Debug {
    const NAMES: &'static [&'static str];

    fn parse(id: &str) -> Option<Self>;

    fn name(&self) -> &'static str;
}

/// Declares a step enum together with its layout identifiers.
macro_rules! layout_steps {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident => $id:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $($variant),+
        }

        impl $crate::builders::LayoutStep for $name {
            const NAMES: &'static [&'static str] = &[$($id),+];

            fn parse(id: &str) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $id,)+
                }
            }
        }
    };
}

mod class;
mod constants_summary;
mod member;
mod member_summary;
mod module_summary;
mod package_summary;
mod serialized_form;

pub(crate) use class::{TypeBuilder, TypeFamily};
pub(crate) use constants_summary::{ConstantsSummaryBuilder, ENTITY as CONSTANTS_ENTITY};
pub(crate) use member::{MemberDetailsBuilder, MemberWriters};
pub(crate) use member_summary::{MemberSummaryBuilder, ANNOTATION_SUMMARIES, CLASS_SUMMARIES};
pub(crate) use module_summary::ModuleSummaryBuilder;
pub(crate) use package_summary::PackageSummaryBuilder;
pub(crate) use serialized_form::{SerializedFormBuilder, ENTITY as SERIALIZED_FORM_ENTITY};

/// Whether the builder for `page` accepts the step `id`.
pub fn is_known_step(page: PageKind, id: &str) -> bool {
    fn known<S: LayoutStep>(id: &str) -> bool {
        S::NAMES.contains(&id)
    }

    match page {
        PageKind::Module => known::<module_summary::ModuleStep>(id),
        PageKind::Package => known::<package_summary::PackageStep>(id),
        PageKind::ConstantsSummary => known::<constants_summary::ConstantsStep>(id),
        PageKind::ConstantsPackage => known::<constants_summary::ConstantsPackageStep>(id),
        PageKind::Class | PageKind::AnnotationType => known::<class::TypeStep>(id),
        PageKind::MemberSummary | PageKind::AnnotationTypeMemberSummary => {
            known::<member_summary::SummaryStep>(id)
        }
        PageKind::MethodDetails
        | PageKind::FieldDetails
        | PageKind::ConstructorDetails
        | PageKind::PropertyDetails
        | PageKind::EnumConstantDetails
        | PageKind::AnnotationTypeFieldDetails
        | PageKind::AnnotationTypeRequiredMemberDetails
        | PageKind::AnnotationTypeOptionalMemberDetails => known::<member::MemberStep>(id),
        PageKind::SerializedForm => known::<serialized_form::SerializedFormStep>(id),
        PageKind::SerializedFormPackage => known::<serialized_form::SerializedPackageStep>(id),
        PageKind::SerializedFormClass => known::<serialized_form::SerializedClassStep>(id),
    }
}

/// Resolve the whole step list for `page` before anything is written, so a
/// bad layout entry fails the page without emitting half of it.
pub(crate) fn parse_steps<S: LayoutStep>(
    context: &BuildContext<'_>,
    page: PageKind,
    entity: &str,
) -> Result<Vec<S>> {
    context
        .steps_for(page)
        .iter()
        .map(|id| {
            S::parse(id.as_str()).ok_or_else(|| BuildError::UnknownStep {
                page,
                entity: entity.to_string(),
                step: id.to_string(),
            })
        })
        .collect()
}

/// Run the layout entry for `page`, one step at a time, in layout order.
pub(crate) fn run_layout<S, F>(
    context: &BuildContext<'_>,
    page: PageKind,
    entity: &str,
    mut build_step: F,
) -> Result<()>
where
    S: LayoutStep,
    F: FnMut(S) -> Result<()>,
{
    for step in parse_steps::<S>(context, page, entity)? {
        debug!("{} [{}]: {}", page, entity, step.name());
        build_step(step)?;
    }
    Ok(())
}

/// Attach page, entity and step to a writer failure.
pub(crate) fn written(result: WriteResult, page: PageKind, entity: &str, step: &str) -> Result<()> {
    result.map_err(|source| BuildError::Writer {
        page,
        entity: entity.to_string(),
        step: step.to_string(),
        source,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    Constructed,
    Running,
    Done,
}

pub(crate) enum BuilderKind<'a> {
    /// Writer not supported or page disabled: running does nothing.
    Noop,
    /// Carries an error detected at construction, reported when run.
    Misconfigured(Option<BuildError>),
    ModuleSummary(ModuleSummaryBuilder<'a>),
    PackageSummary(PackageSummaryBuilder<'a>),
    ConstantsSummary(ConstantsSummaryBuilder<'a>),
    Type(TypeBuilder<'a>),
    MemberDetails(MemberDetailsBuilder<'a>),
    MemberSummary(MemberSummaryBuilder<'a>),
    SerializedForm(SerializedFormBuilder<'a>),
}

/// A fully wired builder, runnable exactly once.
pub struct Builder<'a> {
    page: PageKind,
    entity: String,
    state: BuilderState,
    kind: BuilderKind<'a>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(page: PageKind, entity: String, kind: BuilderKind<'a>) -> Self {
        Self {
            page,
            entity,
            state: BuilderState::Constructed,
            kind,
        }
    }

    pub(crate) fn noop(page: PageKind, entity: String) -> Self {
        Self::new(page, entity, BuilderKind::Noop)
    }

    pub(crate) fn misconfigured(page: PageKind, entity: String, error: BuildError) -> Self {
        Self::new(page, entity, BuilderKind::Misconfigured(Some(error)))
    }

    pub fn page_kind(&self) -> PageKind {
        self.page
    }

    /// Name of the documented entity, used in diagnostics.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.kind, BuilderKind::Noop)
    }

    /// Execute the builder's layout. A second call is a contract violation.
    pub fn run(&mut self) -> Result<()> {
        if self.state != BuilderState::Constructed {
            return Err(BuildError::invariant(format!(
                "{} builder for {} run more than once",
                self.page, self.entity
            )));
        }
        self.state = BuilderState::Running;

        let result = match &mut self.kind {
            BuilderKind::Noop => {
                debug!("{} [{}]: skipped", self.page, self.entity);
                Ok(())
            }
            BuilderKind::Misconfigured(error) => Err(error.take().unwrap_or_else(|| {
                BuildError::invariant(format!("{} builder for {} lost its error", self.page, self.entity))
            })),
            BuilderKind::ModuleSummary(builder) => builder.build(),
            BuilderKind::PackageSummary(builder) => builder.build(),
            BuilderKind::ConstantsSummary(builder) => builder.build(),
            BuilderKind::Type(builder) => builder.build(),
            BuilderKind::MemberDetails(builder) => builder.build(),
            BuilderKind::MemberSummary(builder) => builder.build(),
            BuilderKind::SerializedForm(builder) => builder.build(),
        };

        self.state = BuilderState::Done;
        result
    }
}

impl fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("page", &self.page)
            .field("entity", &self.entity)
            .field("state", &self.state)
            .field("noop", &self.is_noop())
            .finish()
    }
}
