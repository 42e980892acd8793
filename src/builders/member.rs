//! Member details sections: one builder per member kind of one type.

use log::debug;

use crate::config::BuildConfig;
use crate::context::BuildContext;
use crate::entity::{MemberElement, MemberKind, TypeElement};
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::{AnnotationMemberWriter, MemberWriter, WriteResult};

use super::{parse_steps, written, LayoutStep};

layout_steps! {
    /// Steps run once per documented member.
    pub(crate) enum MemberStep {
        Signature => "signature",
        Deprecation => "deprecation",
        Comments => "comments",
        Tags => "tags",
        DefaultValue => "defaultValue",
    }
}

pub(crate) enum MemberWriters<'a> {
    Plain(Box<dyn MemberWriter + 'a>),
    Annotation(Box<dyn AnnotationMemberWriter + 'a>),
}

/// Calls a [`MemberWriter`] operation on either writer family.
macro_rules! on_member_writer {
    ($writers:expr, $w:ident => $call:expr) => {
        match $writers {
            MemberWriters::Plain($w) => $call,
            MemberWriters::Annotation($w) => $call,
        }
    };
}

/// Members documented by the details section `page`, in declaration order.
pub(crate) fn members_for<'t>(
    page: PageKind,
    ty: &'t TypeElement,
    config: &BuildConfig,
) -> Vec<&'t MemberElement> {
    let members: Vec<&MemberElement> = match page {
        PageKind::MethodDetails => ty.members_of_kind(MemberKind::Method).collect(),
        PageKind::FieldDetails | PageKind::AnnotationTypeFieldDetails => {
            ty.members_of_kind(MemberKind::Field).collect()
        }
        PageKind::ConstructorDetails => ty.members_of_kind(MemberKind::Constructor).collect(),
        PageKind::PropertyDetails => ty.members_of_kind(MemberKind::Property).collect(),
        PageKind::EnumConstantDetails => ty.members_of_kind(MemberKind::EnumConstant).collect(),
        PageKind::AnnotationTypeRequiredMemberDetails => ty.required_elements().collect(),
        PageKind::AnnotationTypeOptionalMemberDetails => ty.optional_elements().collect(),
        _ => Vec::new(),
    };

    if config.no_deprecated {
        members.into_iter().filter(|m| !m.deprecated).collect()
    } else {
        members
    }
}

pub(crate) struct MemberDetailsBuilder<'a> {
    context: &'a BuildContext<'a>,
    page: PageKind,
    ty: &'a TypeElement,
    members: Vec<&'a MemberElement>,
    writer: MemberWriters<'a>,
}

impl<'a> MemberDetailsBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        page: PageKind,
        ty: &'a TypeElement,
        writer: MemberWriters<'a>,
    ) -> Self {
        Self {
            context,
            page,
            ty,
            members: members_for(page, ty, context.config()),
            writer,
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        let page = self.page;
        let entity = self.ty.qualified_name();
        let steps = parse_steps::<MemberStep>(self.context, page, &entity)?;

        if self.members.is_empty() {
            return Ok(());
        }

        let members = self.members.clone();
        written(
            on_member_writer!(&mut self.writer, w => w.add_details_header(&members)),
            page,
            &entity,
            "detailsHeader",
        )?;

        for member in members {
            let location = format!("{}#{}", entity, member.name);
            written(
                on_member_writer!(&mut self.writer, w => w.add_member_header(member)),
                page,
                &location,
                "memberHeader",
            )?;
            for &step in &steps {
                debug!("{} [{}]: {}", page, location, step.name());
                written(self.build_step(step, member), page, &location, step.name())?;
            }
            written(
                on_member_writer!(&mut self.writer, w => w.add_member_footer(member)),
                page,
                &location,
                "memberFooter",
            )?;
        }

        written(
            on_member_writer!(&mut self.writer, w => w.add_details_footer()),
            page,
            &entity,
            "detailsFooter",
        )
    }

    fn build_step(&mut self, step: MemberStep, member: &MemberElement) -> WriteResult {
        let no_comment = self.context.config().no_comment;
        match (step, &mut self.writer) {
            (MemberStep::Signature, ws) => on_member_writer!(ws, w => w.add_signature(member)),
            (MemberStep::Deprecation, ws) => {
                on_member_writer!(ws, w => w.add_deprecation_info(member))
            }
            (MemberStep::Comments | MemberStep::Tags, _) if no_comment => Ok(()),
            (MemberStep::Comments, ws) => on_member_writer!(ws, w => w.add_comments(member)),
            (MemberStep::Tags, ws) => on_member_writer!(ws, w => w.add_tags(member)),
            (MemberStep::DefaultValue, MemberWriters::Annotation(w)) => {
                if member.default_value.is_some() {
                    w.add_default_value(member)
                } else {
                    Ok(())
                }
            }
            (MemberStep::DefaultValue, MemberWriters::Plain(_)) => Ok(()),
        }
    }
}
