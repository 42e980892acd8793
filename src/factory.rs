//! The builder factory: the single place where writers meet builders.
//!
//! Every request goes through the same wiring: refuse a finished context,
//! skip disabled page kinds without asking for a writer, then ask the
//! [`WriterFactory`] for a writer bound to the entity. A writer that is not
//! supported yields an inert builder, or a misconfigured one when the run
//! requires writers for every enabled page kind.

use std::collections::HashMap;

use log::debug;

use crate::builders::{
    Builder, BuilderKind, ConstantsSummaryBuilder, MemberDetailsBuilder, MemberSummaryBuilder,
    MemberWriters, ModuleSummaryBuilder, PackageSummaryBuilder, SerializedFormBuilder,
    TypeBuilder, TypeFamily, ANNOTATION_SUMMARIES, CLASS_SUMMARIES, CONSTANTS_ENTITY,
    SERIALIZED_FORM_ENTITY,
};
use crate::context::BuildContext;
use crate::entity::{ClassTree, DocSet, MemberKind, ModuleElement, PackageElement, TypeElement};
use crate::error::BuildError;
use crate::layout::PageKind;
use crate::writer::{
    AnnotationTypeWriter, ClassWriter, MemberSummaryWriter, SummaryKind, WriterFactory,
};

pub struct BuilderFactory<'a> {
    context: &'a BuildContext<'a>,
    writers: &'a dyn WriterFactory,
}

impl<'a> BuilderFactory<'a> {
    pub fn new(context: &'a BuildContext<'a>, writers: &'a dyn WriterFactory) -> Self {
        Self { context, writers }
    }

    /// The run's shared context. Every builder from this factory borrows it.
    pub fn context(&self) -> &'a BuildContext<'a> {
        self.context
    }

    fn wire<W>(
        &self,
        page: PageKind,
        entity: String,
        request: impl FnOnce() -> Option<W>,
        bind: impl FnOnce(W) -> BuilderKind<'a>,
    ) -> Builder<'a> {
        if let Err(error) = self.context.ensure_open() {
            return Builder::misconfigured(page, entity, error);
        }

        let config = self.context.config();
        if !config.is_page_enabled(page) {
            debug!("{} [{}]: page kind disabled", page, entity);
            return Builder::noop(page, entity);
        }

        match request() {
            Some(writer) => {
                let kind = bind(writer);
                Builder::new(page, entity, kind)
            }
            None if config.require_writers => {
                let error = BuildError::MissingWriter {
                    page,
                    entity: entity.clone(),
                };
                Builder::misconfigured(page, entity, error)
            }
            None => {
                debug!("{} [{}]: writer unsupported", page, entity);
                Builder::noop(page, entity)
            }
        }
    }

    /// Constant field values across the whole run.
    pub fn constants_summary_builder(&'a self, docs: &'a DocSet) -> Builder<'a> {
        self.wire(
            PageKind::ConstantsSummary,
            CONSTANTS_ENTITY.to_string(),
            || self.writers.constants_summary_writer(),
            |writer| {
                BuilderKind::ConstantsSummary(ConstantsSummaryBuilder::new(
                    self.context,
                    docs,
                    writer,
                ))
            },
        )
    }

    pub fn package_summary_builder(
        &'a self,
        package: &'a PackageElement,
        prev: Option<&'a PackageElement>,
        next: Option<&'a PackageElement>,
    ) -> Builder<'a> {
        self.wire(
            PageKind::Package,
            package.id.to_string(),
            || self.writers.package_summary_writer(package, prev, next),
            |writer| {
                BuilderKind::PackageSummary(PackageSummaryBuilder::new(
                    self.context,
                    package,
                    writer,
                ))
            },
        )
    }

    pub fn module_summary_builder(
        &'a self,
        module: &'a ModuleElement,
        prev: Option<&'a ModuleElement>,
        next: Option<&'a ModuleElement>,
    ) -> Builder<'a> {
        self.wire(
            PageKind::Module,
            module.name.clone(),
            || self.writers.module_summary_writer(module, prev, next),
            |writer| {
                BuilderKind::ModuleSummary(ModuleSummaryBuilder::new(self.context, module, writer))
            },
        )
    }

    /// Class or interface page. Annotation types are routed to
    /// [`BuilderFactory::annotation_type_builder`].
    pub fn class_builder(
        &'a self,
        ty: &'a TypeElement,
        prev: Option<&'a TypeElement>,
        next: Option<&'a TypeElement>,
        tree: &'a ClassTree<'a>,
    ) -> Builder<'a> {
        if ty.is_annotation_type() {
            return self.annotation_type_builder(ty, prev, next, tree);
        }
        self.wire(
            PageKind::Class,
            ty.qualified_name(),
            || self.writers.class_writer(ty, prev, next, tree),
            |writer| {
                BuilderKind::Type(TypeBuilder::new(self, ty, tree, TypeFamily::Ordinary(writer)))
            },
        )
    }

    pub fn annotation_type_builder(
        &'a self,
        ty: &'a TypeElement,
        prev: Option<&'a TypeElement>,
        next: Option<&'a TypeElement>,
        tree: &'a ClassTree<'a>,
    ) -> Builder<'a> {
        self.wire(
            PageKind::AnnotationType,
            ty.qualified_name(),
            || self.writers.annotation_type_writer(ty, prev, next),
            |writer| {
                BuilderKind::Type(TypeBuilder::new(
                    self,
                    ty,
                    tree,
                    TypeFamily::Annotation(writer),
                ))
            },
        )
    }

    fn member_details(
        &'a self,
        page: PageKind,
        kind: MemberKind,
        ty: &'a TypeElement,
        parent: &dyn ClassWriter,
    ) -> Builder<'a> {
        self.wire(
            page,
            ty.qualified_name(),
            || self.writers.member_writer(parent, kind),
            |writer| {
                BuilderKind::MemberDetails(MemberDetailsBuilder::new(
                    self.context,
                    page,
                    ty,
                    MemberWriters::Plain(writer),
                ))
            },
        )
    }

    fn annotation_member_details(
        &'a self,
        page: PageKind,
        kind: SummaryKind,
        ty: &'a TypeElement,
        parent: &dyn AnnotationTypeWriter,
    ) -> Builder<'a> {
        self.wire(
            page,
            ty.qualified_name(),
            || self.writers.annotation_member_writer(parent, kind),
            |writer| {
                BuilderKind::MemberDetails(MemberDetailsBuilder::new(
                    self.context,
                    page,
                    ty,
                    MemberWriters::Annotation(writer),
                ))
            },
        )
    }

    pub fn method_builder(&'a self, ty: &'a TypeElement, parent: &dyn ClassWriter) -> Builder<'a> {
        self.member_details(PageKind::MethodDetails, MemberKind::Method, ty, parent)
    }

    pub fn field_builder(&'a self, ty: &'a TypeElement, parent: &dyn ClassWriter) -> Builder<'a> {
        self.member_details(PageKind::FieldDetails, MemberKind::Field, ty, parent)
    }

    pub fn constructor_builder(
        &'a self,
        ty: &'a TypeElement,
        parent: &dyn ClassWriter,
    ) -> Builder<'a> {
        self.member_details(PageKind::ConstructorDetails, MemberKind::Constructor, ty, parent)
    }

    /// JavaFX properties; inert unless the run documents them.
    pub fn property_builder(&'a self, ty: &'a TypeElement, parent: &dyn ClassWriter) -> Builder<'a> {
        self.member_details(PageKind::PropertyDetails, MemberKind::Property, ty, parent)
    }

    pub fn enum_constants_builder(
        &'a self,
        ty: &'a TypeElement,
        parent: &dyn ClassWriter,
    ) -> Builder<'a> {
        self.member_details(PageKind::EnumConstantDetails, MemberKind::EnumConstant, ty, parent)
    }

    pub fn annotation_type_fields_builder(
        &'a self,
        ty: &'a TypeElement,
        parent: &dyn AnnotationTypeWriter,
    ) -> Builder<'a> {
        self.annotation_member_details(
            PageKind::AnnotationTypeFieldDetails,
            SummaryKind::AnnotationTypeFields,
            ty,
            parent,
        )
    }

    pub fn annotation_type_required_member_builder(
        &'a self,
        ty: &'a TypeElement,
        parent: &dyn AnnotationTypeWriter,
    ) -> Builder<'a> {
        self.annotation_member_details(
            PageKind::AnnotationTypeRequiredMemberDetails,
            SummaryKind::AnnotationTypeRequiredMembers,
            ty,
            parent,
        )
    }

    pub fn annotation_type_optional_member_builder(
        &'a self,
        ty: &'a TypeElement,
        parent: &dyn AnnotationTypeWriter,
    ) -> Builder<'a> {
        self.annotation_member_details(
            PageKind::AnnotationTypeOptionalMemberDetails,
            SummaryKind::AnnotationTypeOptionalMembers,
            ty,
            parent,
        )
    }

    fn summary_builder(
        &'a self,
        page: PageKind,
        ty: &'a TypeElement,
        tree: &'a ClassTree<'a>,
        request: impl Fn(SummaryKind) -> Option<Box<dyn MemberSummaryWriter + 'a>>,
        kinds: &[SummaryKind],
    ) -> Builder<'a> {
        let javafx = self.context.config().javafx;
        self.wire(
            page,
            ty.qualified_name(),
            || {
                let writers: HashMap<SummaryKind, Box<dyn MemberSummaryWriter + 'a>> = kinds
                    .iter()
                    .filter(|&&kind| javafx || kind != SummaryKind::Properties)
                    .filter_map(|&kind| request(kind).map(|writer| (kind, writer)))
                    .collect();
                if writers.is_empty() {
                    None
                } else {
                    Some(writers)
                }
            },
            |writers| {
                BuilderKind::MemberSummary(MemberSummaryBuilder::new(
                    self.context,
                    page,
                    ty,
                    tree,
                    writers,
                ))
            },
        )
    }

    /// Member summary of an ordinary type, one table per summary kind.
    pub fn member_summary_builder(
        &'a self,
        ty: &'a TypeElement,
        tree: &'a ClassTree<'a>,
        parent: &dyn ClassWriter,
    ) -> Builder<'a> {
        self.summary_builder(
            PageKind::MemberSummary,
            ty,
            tree,
            |kind| self.writers.member_summary_writer(parent, kind),
            &CLASS_SUMMARIES,
        )
    }

    /// Member summary of an annotation type: fields, required and optional elements.
    pub fn annotation_type_member_summary_builder(
        &'a self,
        ty: &'a TypeElement,
        tree: &'a ClassTree<'a>,
        parent: &dyn AnnotationTypeWriter,
    ) -> Builder<'a> {
        self.summary_builder(
            PageKind::AnnotationTypeMemberSummary,
            ty,
            tree,
            |kind| self.writers.annotation_member_summary_writer(parent, kind),
            &ANNOTATION_SUMMARIES,
        )
    }

    /// The serialized form of every serializable type in the run.
    pub fn serialized_form_builder(&'a self, docs: &'a DocSet) -> Builder<'a> {
        self.wire(
            PageKind::SerializedForm,
            SERIALIZED_FORM_ENTITY.to_string(),
            || self.writers.serialized_form_writer(),
            |writer| {
                BuilderKind::SerializedForm(SerializedFormBuilder::new(self.context, docs, writer))
            },
        )
    }
}
