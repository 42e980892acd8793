//! Member summary tables of a class or annotation type page.
//!
//! One writer per summary kind. A summary lists the type's own members sorted
//! by name, followed by one inherited table per documented superclass for the
//! kinds that can be inherited.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::config::BuildConfig;
use crate::context::BuildContext;
use crate::entity::{ClassTree, MemberElement, TypeElement};
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::{MemberSummaryWriter, SummaryKind, WriteResult};

use super::{run_layout, written, LayoutStep};

layout_steps! {
    pub(crate) enum SummaryStep {
        EnumConstantsSummary => "enumConstantsSummary",
        PropertiesSummary => "propertiesSummary",
        FieldsSummary => "fieldsSummary",
        ConstructorsSummary => "constructorsSummary",
        MethodsSummary => "methodsSummary",
        AnnotationTypeFieldsSummary => "annotationTypeFieldsSummary",
        AnnotationTypeRequiredMemberSummary => "annotationTypeRequiredMemberSummary",
        AnnotationTypeOptionalMemberSummary => "annotationTypeOptionalMemberSummary",
    }
}

impl SummaryStep {
    fn summary_kind(&self) -> SummaryKind {
        match self {
            SummaryStep::EnumConstantsSummary => SummaryKind::EnumConstants,
            SummaryStep::PropertiesSummary => SummaryKind::Properties,
            SummaryStep::FieldsSummary => SummaryKind::Fields,
            SummaryStep::ConstructorsSummary => SummaryKind::Constructors,
            SummaryStep::MethodsSummary => SummaryKind::Methods,
            SummaryStep::AnnotationTypeFieldsSummary => SummaryKind::AnnotationTypeFields,
            SummaryStep::AnnotationTypeRequiredMemberSummary => {
                SummaryKind::AnnotationTypeRequiredMembers
            }
            SummaryStep::AnnotationTypeOptionalMemberSummary => {
                SummaryKind::AnnotationTypeOptionalMembers
            }
        }
    }
}

/// Summary kinds requested for each type family.
pub(crate) const CLASS_SUMMARIES: [SummaryKind; 5] = [
    SummaryKind::EnumConstants,
    SummaryKind::Properties,
    SummaryKind::Fields,
    SummaryKind::Constructors,
    SummaryKind::Methods,
];

pub(crate) const ANNOTATION_SUMMARIES: [SummaryKind; 3] = [
    SummaryKind::AnnotationTypeFields,
    SummaryKind::AnnotationTypeRequiredMembers,
    SummaryKind::AnnotationTypeOptionalMembers,
];

fn visible<'t>(
    members: impl Iterator<Item = &'t MemberElement>,
    config: &BuildConfig,
) -> Vec<&'t MemberElement> {
    let mut members: Vec<&MemberElement> = members
        .filter(|m| !(config.no_deprecated && m.deprecated))
        .collect();
    members.sort_by(|a, b| a.name.cmp(&b.name));
    members
}

/// Own members of `ty` listed by the summary `kind`, sorted by name.
pub(crate) fn summarized_members<'t>(
    kind: SummaryKind,
    ty: &'t TypeElement,
    config: &BuildConfig,
) -> Vec<&'t MemberElement> {
    match kind {
        SummaryKind::AnnotationTypeRequiredMembers => visible(ty.required_elements(), config),
        SummaryKind::AnnotationTypeOptionalMembers => visible(ty.optional_elements(), config),
        _ => visible(ty.members_of_kind(kind.member_kind()), config),
    }
}

/// Inherited members per superclass, nearest first, skipping names the
/// subclass or a nearer superclass already declares.
pub(crate) fn inherited_members<'t>(
    kind: SummaryKind,
    ty: &TypeElement,
    tree: &ClassTree<'t>,
    config: &BuildConfig,
) -> Vec<(&'t TypeElement, Vec<&'t MemberElement>)> {
    if !kind.is_inheritable() {
        return Vec::new();
    }

    let member_kind = kind.member_kind();
    let mut hidden: HashSet<&str> = ty
        .members_of_kind(member_kind)
        .map(|m| m.name.as_str())
        .collect();

    let mut inherited = Vec::new();
    for parent in tree.supertypes(ty) {
        let members: Vec<&'t MemberElement> = visible(parent.members_of_kind(member_kind), config)
            .into_iter()
            .filter(|m| !hidden.contains(m.name.as_str()))
            .collect();
        hidden.extend(parent.members_of_kind(member_kind).map(|m| m.name.as_str()));
        if !members.is_empty() {
            inherited.push((parent, members));
        }
    }
    inherited
}

pub(crate) struct MemberSummaryBuilder<'a> {
    context: &'a BuildContext<'a>,
    page: PageKind,
    ty: &'a TypeElement,
    tree: &'a ClassTree<'a>,
    writers: HashMap<SummaryKind, Box<dyn MemberSummaryWriter + 'a>>,
}

impl<'a> MemberSummaryBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        page: PageKind,
        ty: &'a TypeElement,
        tree: &'a ClassTree<'a>,
        writers: HashMap<SummaryKind, Box<dyn MemberSummaryWriter + 'a>>,
    ) -> Self {
        Self {
            context,
            page,
            ty,
            tree,
            writers,
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        let context = self.context;
        let page = self.page;
        let entity = self.ty.qualified_name();
        run_layout(context, page, &entity, |step| self.build_step(step, &entity))
    }

    fn build_step(&mut self, step: SummaryStep, entity: &str) -> Result<()> {
        let kind = step.summary_kind();
        let config = self.context.config();
        if kind == SummaryKind::Properties && !config.javafx {
            return Ok(());
        }

        let ty = self.ty;
        let members = summarized_members(kind, ty, config);
        let inherited = inherited_members(kind, ty, self.tree, config);
        if members.is_empty() && inherited.is_empty() {
            return Ok(());
        }

        let Some(writer) = self.writers.get_mut(&kind) else {
            debug!("{} [{}]: no writer for {:?}", self.page, entity, kind);
            return Ok(());
        };

        written(
            write_summary(writer.as_mut(), &members, &inherited),
            self.page,
            entity,
            step.name(),
        )
    }
}

fn write_summary(
    writer: &mut (dyn MemberSummaryWriter + '_),
    members: &[&MemberElement],
    inherited: &[(&TypeElement, Vec<&MemberElement>)],
) -> WriteResult {
    writer.add_summary_header()?;
    for member in members {
        writer.add_summary_row(member)?;
    }
    for (parent, members) in inherited {
        writer.add_inherited_summary(parent, members)?;
    }
    writer.add_summary_footer()
}
