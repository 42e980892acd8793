//! Writer capabilities.
//!
//! Builders decide which sections run and in what order; writers decide what
//! the sections look like. Every writer is bound to its entity when the
//! [`WriterFactory`] hands it out, and nothing reaches the output until the
//! page-level `print_document` call.

use crate::entity::{
    ClassTree, MemberElement, MemberKind, ModuleElement, PackageElement, PackageId,
    ServiceElement, TypeElement, TypeKind,
};

pub type WriteResult = anyhow::Result<()>;

pub trait ModuleSummaryWriter {
    fn add_header(&mut self) -> WriteResult;
    fn add_description(&mut self) -> WriteResult;
    fn add_tags(&mut self) -> WriteResult;
    fn add_modules_summary(&mut self, requires: &[String]) -> WriteResult;
    fn add_packages_summary(&mut self, exports: &[PackageId]) -> WriteResult;
    fn add_services_summary(
        &mut self,
        uses: &[ServiceElement],
        provides: &[ServiceElement],
    ) -> WriteResult;
    fn add_footer(&mut self) -> WriteResult;
    fn print_document(&mut self) -> WriteResult;
}

pub trait PackageSummaryWriter {
    fn add_header(&mut self) -> WriteResult;
    /// One summary table per type kind, e.g. all interfaces of the package.
    fn add_type_summary(&mut self, kind: TypeKind, types: &[&TypeElement]) -> WriteResult;
    fn add_description(&mut self) -> WriteResult;
    fn add_tags(&mut self) -> WriteResult;
    fn add_footer(&mut self) -> WriteResult;
    fn copy_doc_files(&mut self, package: &PackageElement) -> WriteResult;
    fn print_document(&mut self) -> WriteResult;
}

pub trait ConstantsSummaryWriter {
    fn add_header(&mut self) -> WriteResult;
    fn add_contents(&mut self, packages: &[&PackageId]) -> WriteResult;
    fn add_package_header(&mut self, package: &PackageId) -> WriteResult;
    fn add_class_constants(&mut self, ty: &TypeElement, fields: &[&MemberElement])
        -> WriteResult;
    fn add_footer(&mut self) -> WriteResult;
    fn print_document(&mut self) -> WriteResult;
}

/// Operations shared by class and annotation type pages.
pub trait TypeWriter {
    fn type_element(&self) -> &TypeElement;
    fn add_header(&mut self) -> WriteResult;
    fn add_deprecation_info(&mut self) -> WriteResult;
    fn add_signature(&mut self) -> WriteResult;
    fn add_description(&mut self) -> WriteResult;
    fn add_tags(&mut self) -> WriteResult;
    fn add_footer(&mut self) -> WriteResult;
    /// Copy the containing package's `doc-files/`. Called once per package per run.
    fn copy_doc_files(&mut self, package: &PackageElement) -> WriteResult;
    fn print_document(&mut self) -> WriteResult;
}

pub trait ClassWriter: TypeWriter {
    /// Superclass chain, nearest first.
    fn add_class_tree(&mut self, ancestors: &[&TypeElement]) -> WriteResult;
    fn add_type_parameter_info(&mut self, parameters: &[String]) -> WriteResult;
    fn add_super_interfaces_info(&mut self, interfaces: &[String]) -> WriteResult;
    fn add_implemented_interfaces_info(&mut self, interfaces: &[String]) -> WriteResult;
    fn add_subclasses_info(&mut self, subclasses: &[String]) -> WriteResult;
    fn add_subinterfaces_info(&mut self, subinterfaces: &[String]) -> WriteResult;
    fn add_implementing_classes_info(&mut self, implementors: &[String]) -> WriteResult;
}

/// Annotation type pages. Kept apart from [`ClassWriter`] because member
/// writers and member summaries are requested per family.
pub trait AnnotationTypeWriter: TypeWriter {}

/// Details section for one member kind of one type.
pub trait MemberWriter {
    fn add_details_header(&mut self, members: &[&MemberElement]) -> WriteResult;
    fn add_member_header(&mut self, member: &MemberElement) -> WriteResult;
    fn add_signature(&mut self, member: &MemberElement) -> WriteResult;
    fn add_deprecation_info(&mut self, member: &MemberElement) -> WriteResult;
    fn add_comments(&mut self, member: &MemberElement) -> WriteResult;
    fn add_tags(&mut self, member: &MemberElement) -> WriteResult;
    fn add_member_footer(&mut self, member: &MemberElement) -> WriteResult;
    fn add_details_footer(&mut self) -> WriteResult;
}

/// Annotation type elements additionally carry default values.
pub trait AnnotationMemberWriter: MemberWriter {
    fn add_default_value(&mut self, member: &MemberElement) -> WriteResult;
}

/// Which summary table a [`MemberSummaryWriter`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryKind {
    EnumConstants,
    Properties,
    Fields,
    Constructors,
    Methods,
    AnnotationTypeFields,
    AnnotationTypeRequiredMembers,
    AnnotationTypeOptionalMembers,
}

impl SummaryKind {
    /// The member kind this summary lists.
    pub fn member_kind(&self) -> MemberKind {
        match self {
            SummaryKind::EnumConstants => MemberKind::EnumConstant,
            SummaryKind::Properties => MemberKind::Property,
            SummaryKind::Fields | SummaryKind::AnnotationTypeFields => MemberKind::Field,
            SummaryKind::Constructors => MemberKind::Constructor,
            SummaryKind::Methods => MemberKind::Method,
            SummaryKind::AnnotationTypeRequiredMembers
            | SummaryKind::AnnotationTypeOptionalMembers => MemberKind::AnnotationElement,
        }
    }

    /// Constructors and annotation elements are never inherited.
    pub fn is_inheritable(&self) -> bool {
        matches!(
            self,
            SummaryKind::Fields | SummaryKind::Methods | SummaryKind::Properties
        )
    }
}

pub trait MemberSummaryWriter {
    fn add_summary_header(&mut self) -> WriteResult;
    fn add_summary_row(&mut self, member: &MemberElement) -> WriteResult;
    fn add_inherited_summary(
        &mut self,
        from: &TypeElement,
        members: &[&MemberElement],
    ) -> WriteResult;
    fn add_summary_footer(&mut self) -> WriteResult;
}

pub trait SerializedFormWriter {
    fn add_header(&mut self) -> WriteResult;
    fn add_package_header(&mut self, package: &PackageElement) -> WriteResult;
    fn add_class_header(&mut self, ty: &TypeElement) -> WriteResult;
    fn add_serial_uid(&mut self, ty: &TypeElement, uid: &str) -> WriteResult;
    fn add_serializable_methods(
        &mut self,
        ty: &TypeElement,
        methods: &[&MemberElement],
    ) -> WriteResult;
    fn add_serializable_fields(&mut self, ty: &TypeElement, fields: &[&MemberElement])
        -> WriteResult;
    fn add_footer(&mut self) -> WriteResult;
    fn print_document(&mut self) -> WriteResult;
}

/// The writer capability provider.
///
/// `None` means the output kind is not supported in this run; the builder
/// factory then hands out an inert builder instead of failing.
pub trait WriterFactory: Send + Sync {
    fn constants_summary_writer(&self) -> Option<Box<dyn ConstantsSummaryWriter + '_>>;

    fn package_summary_writer<'w>(
        &'w self,
        package: &'w PackageElement,
        prev: Option<&'w PackageElement>,
        next: Option<&'w PackageElement>,
    ) -> Option<Box<dyn PackageSummaryWriter + 'w>>;

    fn module_summary_writer<'w>(
        &'w self,
        module: &'w ModuleElement,
        prev: Option<&'w ModuleElement>,
        next: Option<&'w ModuleElement>,
    ) -> Option<Box<dyn ModuleSummaryWriter + 'w>>;

    fn class_writer<'w>(
        &'w self,
        ty: &'w TypeElement,
        prev: Option<&'w TypeElement>,
        next: Option<&'w TypeElement>,
        tree: &'w ClassTree<'w>,
    ) -> Option<Box<dyn ClassWriter + 'w>>;

    fn annotation_type_writer<'w>(
        &'w self,
        ty: &'w TypeElement,
        prev: Option<&'w TypeElement>,
        next: Option<&'w TypeElement>,
    ) -> Option<Box<dyn AnnotationTypeWriter + 'w>>;

    /// Details writer for methods, fields, constructors, properties or enum constants.
    fn member_writer(
        &self,
        parent: &dyn ClassWriter,
        kind: MemberKind,
    ) -> Option<Box<dyn MemberWriter + '_>>;

    /// Details writer for annotation type fields, required or optional elements.
    fn annotation_member_writer(
        &self,
        parent: &dyn AnnotationTypeWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn AnnotationMemberWriter + '_>>;

    fn member_summary_writer(
        &self,
        parent: &dyn ClassWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn MemberSummaryWriter + '_>>;

    fn annotation_member_summary_writer(
        &self,
        parent: &dyn AnnotationTypeWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn MemberSummaryWriter + '_>>;

    fn serialized_form_writer(&self) -> Option<Box<dyn SerializedFormWriter + '_>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_kind_member_mapping() {
        assert_eq!(SummaryKind::Methods.member_kind(), MemberKind::Method);
        assert_eq!(
            SummaryKind::AnnotationTypeOptionalMembers.member_kind(),
            MemberKind::AnnotationElement
        );
        assert!(SummaryKind::Methods.is_inheritable());
        assert!(!SummaryKind::Constructors.is_inheritable());
    }
}
