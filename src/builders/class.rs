//! Class and annotation type pages.
//!
//! Both type families share one builder. The family decides which writer the
//! page is bound to and which variant of each nested section is constructed:
//! an annotation type gets the annotation member summary and annotation
//! member details, never constructors or enum constants.

use log::debug;

use crate::context::BuildContext;
use crate::entity::{ClassTree, PackageElement, TypeElement};
use crate::error::Result;
use crate::factory::BuilderFactory;
use crate::layout::PageKind;
use crate::writer::{AnnotationTypeWriter, ClassWriter, WriteResult};

use super::{run_layout, written, Builder, LayoutStep};

layout_steps! {
    pub(crate) enum TypeStep {
        Header => "header",
        ClassTree => "classTree",
        TypeParameters => "typeParameters",
        SuperInterfaces => "superInterfaces",
        ImplementedInterfaces => "implementedInterfaces",
        Subclasses => "subclasses",
        Subinterfaces => "subinterfaces",
        ImplementingClasses => "implementingClasses",
        Deprecation => "deprecation",
        Signature => "signature",
        Description => "description",
        Tags => "tags",
        MemberSummary => "memberSummary",
        EnumConstantDetails => "enumConstantDetails",
        PropertyDetails => "propertyDetails",
        FieldDetails => "fieldDetails",
        ConstructorDetails => "constructorDetails",
        MethodDetails => "methodDetails",
        AnnotationTypeFieldDetails => "annotationTypeFieldDetails",
        AnnotationTypeRequiredMemberDetails => "annotationTypeRequiredMemberDetails",
        AnnotationTypeOptionalMemberDetails => "annotationTypeOptionalMemberDetails",
        Footer => "footer",
    }
}

impl TypeStep {
    fn is_section(&self) -> bool {
        matches!(
            self,
            TypeStep::MemberSummary
                | TypeStep::EnumConstantDetails
                | TypeStep::PropertyDetails
                | TypeStep::FieldDetails
                | TypeStep::ConstructorDetails
                | TypeStep::MethodDetails
                | TypeStep::AnnotationTypeFieldDetails
                | TypeStep::AnnotationTypeRequiredMemberDetails
                | TypeStep::AnnotationTypeOptionalMemberDetails
        )
    }
}

pub(crate) enum TypeFamily<'a> {
    Ordinary(Box<dyn ClassWriter + 'a>),
    Annotation(Box<dyn AnnotationTypeWriter + 'a>),
}

/// Calls a [`crate::writer::TypeWriter`] operation on either family.
macro_rules! on_type_writer {
    ($family:expr, $w:ident => $call:expr) => {
        match $family {
            TypeFamily::Ordinary($w) => $call,
            TypeFamily::Annotation($w) => $call,
        }
    };
}

fn non_empty(items: &[String], write: impl FnOnce(&[String]) -> WriteResult) -> WriteResult {
    if items.is_empty() {
        Ok(())
    } else {
        write(items)
    }
}

pub(crate) struct TypeBuilder<'a> {
    factory: &'a BuilderFactory<'a>,
    ty: &'a TypeElement,
    tree: &'a ClassTree<'a>,
    writer: TypeFamily<'a>,
}

impl<'a> TypeBuilder<'a> {
    pub(crate) fn new(
        factory: &'a BuilderFactory<'a>,
        ty: &'a TypeElement,
        tree: &'a ClassTree<'a>,
        writer: TypeFamily<'a>,
    ) -> Self {
        Self {
            factory,
            ty,
            tree,
            writer,
        }
    }

    fn page_kind(&self) -> PageKind {
        match self.writer {
            TypeFamily::Ordinary(_) => PageKind::Class,
            TypeFamily::Annotation(_) => PageKind::AnnotationType,
        }
    }

    fn context(&self) -> &'a BuildContext<'a> {
        self.factory.context()
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        let context = self.context();
        let page = self.page_kind();
        let entity = self.ty.qualified_name();

        run_layout(context, page, &entity, |step| self.build_step(step))?;

        let printed = on_type_writer!(&mut self.writer, w => w.print_document());
        written(printed, page, &entity, "printDocument")?;
        self.copy_doc_files(page, &entity)
    }

    /// Claim the containing package and copy its doc-files on the first claim of the run.
    fn copy_doc_files(&mut self, page: PageKind, entity: &str) -> Result<()> {
        let context = self.context();
        let ty = self.ty;
        let package_id = &ty.package;
        let docs = self.tree.docs();
        let writer = &mut self.writer;
        context.claim_package_with(package_id, || {
            let package: Option<&PackageElement> = docs.package(package_id);
            let Some(package) = package.filter(|p| !p.doc_files.is_empty()) else {
                return Ok(());
            };
            let copied = on_type_writer!(writer, w => w.copy_doc_files(package));
            written(copied, page, entity, "copyDocFiles")
        })?;
        Ok(())
    }

    fn build_step(&mut self, step: TypeStep) -> Result<()> {
        if step.is_section() {
            return self.build_section(step);
        }

        let page = self.page_kind();
        let ty = self.ty;
        let tree = self.tree;
        let no_comment = self.context().config().no_comment;
        let qualified = ty.qualified_name();

        let result = match (step, &mut self.writer) {
            (TypeStep::Header, family) => on_type_writer!(family, w => w.add_header()),
            (TypeStep::Deprecation, family) => on_type_writer!(family, w => w.add_deprecation_info()),
            (TypeStep::Signature, family) => on_type_writer!(family, w => w.add_signature()),
            (TypeStep::Description | TypeStep::Tags, _) if no_comment => Ok(()),
            (TypeStep::Description, family) => on_type_writer!(family, w => w.add_description()),
            (TypeStep::Tags, family) => on_type_writer!(family, w => w.add_tags()),
            (TypeStep::Footer, family) => on_type_writer!(family, w => w.add_footer()),
            (TypeStep::ClassTree, TypeFamily::Ordinary(w)) => {
                w.add_class_tree(&tree.supertypes(ty))
            }
            (TypeStep::TypeParameters, TypeFamily::Ordinary(w)) => {
                non_empty(&ty.type_parameters, |p| w.add_type_parameter_info(p))
            }
            (TypeStep::SuperInterfaces, TypeFamily::Ordinary(w)) if ty.is_interface() => {
                non_empty(&ty.interfaces, |i| w.add_super_interfaces_info(i))
            }
            (TypeStep::ImplementedInterfaces, TypeFamily::Ordinary(w)) if !ty.is_interface() => {
                non_empty(&ty.interfaces, |i| w.add_implemented_interfaces_info(i))
            }
            (TypeStep::Subclasses, TypeFamily::Ordinary(w)) => {
                non_empty(tree.subclasses(&qualified), |s| w.add_subclasses_info(s))
            }
            (TypeStep::Subinterfaces, TypeFamily::Ordinary(w)) => {
                non_empty(tree.subinterfaces(&qualified), |s| w.add_subinterfaces_info(s))
            }
            (TypeStep::ImplementingClasses, TypeFamily::Ordinary(w)) => {
                non_empty(tree.implementors(&qualified), |s| w.add_implementing_classes_info(s))
            }
            _ => {
                debug!("{} [{}]: {} does not apply", page, qualified, step.name());
                Ok(())
            }
        };

        written(result, page, &qualified, step.name())
    }

    /// Construct the nested builders for a section step and run each to completion.
    fn build_section(&mut self, step: TypeStep) -> Result<()> {
        let factory = self.factory;
        let ty = self.ty;
        let tree = self.tree;

        let sections: Vec<Builder<'a>> = match (&self.writer, step) {
            (TypeFamily::Ordinary(w), TypeStep::MemberSummary) => {
                vec![factory.member_summary_builder(ty, tree, w.as_ref())]
            }
            (TypeFamily::Ordinary(w), TypeStep::EnumConstantDetails) => {
                vec![factory.enum_constants_builder(ty, w.as_ref())]
            }
            (TypeFamily::Ordinary(w), TypeStep::PropertyDetails) => {
                vec![factory.property_builder(ty, w.as_ref())]
            }
            (TypeFamily::Ordinary(w), TypeStep::FieldDetails) => {
                vec![factory.field_builder(ty, w.as_ref())]
            }
            (TypeFamily::Ordinary(w), TypeStep::ConstructorDetails) => {
                vec![factory.constructor_builder(ty, w.as_ref())]
            }
            (TypeFamily::Ordinary(w), TypeStep::MethodDetails) => {
                vec![factory.method_builder(ty, w.as_ref())]
            }
            (TypeFamily::Annotation(w), TypeStep::MemberSummary) => {
                vec![factory.annotation_type_member_summary_builder(ty, tree, w.as_ref())]
            }
            (
                TypeFamily::Annotation(w),
                TypeStep::FieldDetails | TypeStep::AnnotationTypeFieldDetails,
            ) => vec![factory.annotation_type_fields_builder(ty, w.as_ref())],
            // annotation elements are the methods of an annotation type
            (TypeFamily::Annotation(w), TypeStep::MethodDetails) => vec![
                factory.annotation_type_required_member_builder(ty, w.as_ref()),
                factory.annotation_type_optional_member_builder(ty, w.as_ref()),
            ],
            (TypeFamily::Annotation(w), TypeStep::AnnotationTypeRequiredMemberDetails) => {
                vec![factory.annotation_type_required_member_builder(ty, w.as_ref())]
            }
            (TypeFamily::Annotation(w), TypeStep::AnnotationTypeOptionalMemberDetails) => {
                vec![factory.annotation_type_optional_member_builder(ty, w.as_ref())]
            }
            _ => {
                debug!(
                    "{} [{}]: {} does not apply",
                    self.page_kind(),
                    ty.qualified_name(),
                    step.name()
                );
                Vec::new()
            }
        };

        for mut section in sections {
            section.run()?;
        }
        Ok(())
    }
}
