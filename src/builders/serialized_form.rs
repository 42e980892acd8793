//! The serialized form page: every serializable type, grouped by package.

use crate::context::BuildContext;
use crate::entity::{DocSet, MemberElement, MemberKind, PackageElement, TypeElement};
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::SerializedFormWriter;

use super::{run_layout, written, LayoutStep};

pub(crate) const ENTITY: &str = "serialized form";

/// Methods that take part in the serialization protocol.
pub(crate) const SERIALIZATION_METHODS: [&str; 5] = [
    "readObject",
    "writeObject",
    "readObjectNoData",
    "readResolve",
    "writeReplace",
];

layout_steps! {
    pub(crate) enum SerializedFormStep {
        Header => "header",
        Packages => "packages",
        Footer => "footer",
    }
}

layout_steps! {
    pub(crate) enum SerializedPackageStep {
        PackageHeader => "packageHeader",
        Classes => "classes",
    }
}

layout_steps! {
    pub(crate) enum SerializedClassStep {
        ClassHeader => "classHeader",
        SerialUid => "serialUid",
        SerializableMethods => "serializableMethods",
        SerializableFields => "serializableFields",
    }
}

pub(crate) fn serialization_methods(ty: &TypeElement) -> Vec<&MemberElement> {
    ty.members_of_kind(MemberKind::Method)
        .filter(|m| SERIALIZATION_METHODS.contains(&m.name.as_str()))
        .collect()
}

/// Fields written by default serialization: neither static nor transient.
pub(crate) fn serializable_fields(ty: &TypeElement) -> Vec<&MemberElement> {
    ty.members_of_kind(MemberKind::Field)
        .filter(|m| !m.is_static && !m.is_transient)
        .collect()
}

/// Serializable types of `package` that appear on the page.
pub(crate) fn documented_types(
    package: &PackageElement,
    hide_deprecated: bool,
) -> impl Iterator<Item = &TypeElement> {
    package
        .types
        .iter()
        .filter(move |t| t.serializable && !(hide_deprecated && t.deprecated))
}

pub(crate) struct SerializedFormBuilder<'a> {
    context: &'a BuildContext<'a>,
    docs: &'a DocSet,
    writer: Box<dyn SerializedFormWriter + 'a>,
}

impl<'a> SerializedFormBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        docs: &'a DocSet,
        writer: Box<dyn SerializedFormWriter + 'a>,
    ) -> Self {
        Self {
            context,
            docs,
            writer,
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        run_layout(self.context, PageKind::SerializedForm, ENTITY, |step| {
            self.build_step(step)
        })?;
        written(
            self.writer.print_document(),
            PageKind::SerializedForm,
            ENTITY,
            "printDocument",
        )
    }

    fn build_step(&mut self, step: SerializedFormStep) -> Result<()> {
        let result = match step {
            SerializedFormStep::Header => self.writer.add_header(),
            SerializedFormStep::Packages => {
                let context = self.context;
                let docs = self.docs;
                let hide_deprecated = context.config().no_deprecated;
                let packages: Vec<&'a PackageElement> = docs
                    .packages
                    .iter()
                    .filter(|p| documented_types(p, hide_deprecated).next().is_some())
                    .collect();
                for package in packages {
                    run_layout(context, PageKind::SerializedFormPackage, package.id.as_str(), |step| {
                        self.build_package_step(package, step)
                    })?;
                }
                Ok(())
            }
            SerializedFormStep::Footer => self.writer.add_footer(),
        };

        written(result, PageKind::SerializedForm, ENTITY, step.name())
    }

    fn build_package_step(
        &mut self,
        package: &'a PackageElement,
        step: SerializedPackageStep,
    ) -> Result<()> {
        let result = match step {
            SerializedPackageStep::PackageHeader => self.writer.add_package_header(package),
            SerializedPackageStep::Classes => {
                let context = self.context;
                let hide_deprecated = context.config().no_deprecated;
                for ty in documented_types(package, hide_deprecated) {
                    let entity = ty.qualified_name();
                    run_layout(context, PageKind::SerializedFormClass, &entity, |step| {
                        self.build_class_step(ty, &entity, step)
                    })?;
                }
                Ok(())
            }
        };

        written(
            result,
            PageKind::SerializedFormPackage,
            package.id.as_str(),
            step.name(),
        )
    }

    fn build_class_step(
        &mut self,
        ty: &'a TypeElement,
        entity: &str,
        step: SerializedClassStep,
    ) -> Result<()> {
        let result = match step {
            SerializedClassStep::ClassHeader => self.writer.add_class_header(ty),
            SerializedClassStep::SerialUid => match &ty.serial_version_uid {
                Some(uid) => self.writer.add_serial_uid(ty, uid),
                None => Ok(()),
            },
            SerializedClassStep::SerializableMethods => {
                let methods = serialization_methods(ty);
                if methods.is_empty() {
                    Ok(())
                } else {
                    self.writer.add_serializable_methods(ty, &methods)
                }
            }
            SerializedClassStep::SerializableFields => {
                let fields = serializable_fields(ty);
                if fields.is_empty() {
                    Ok(())
                } else {
                    self.writer.add_serializable_fields(ty, &fields)
                }
            }
        };

        written(result, PageKind::SerializedFormClass, entity, step.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TypeKind;

    fn record() -> TypeElement {
        let mut transient = MemberElement::new("cache", MemberKind::Field);
        transient.is_transient = true;
        let mut ty = TypeElement::new("com.acme", "Record", TypeKind::Class)
            .with_member(MemberElement::new("id", MemberKind::Field))
            .with_member(transient)
            .with_member(MemberElement::constant("VERSION", "1"))
            .with_member(MemberElement::new("readObject", MemberKind::Method))
            .with_member(MemberElement::new("toString", MemberKind::Method));
        ty.serializable = true;
        ty
    }

    #[test]
    fn test_serializable_fields_skip_static_and_transient() {
        let ty = record();
        let names: Vec<&str> = serializable_fields(&ty).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_documented_types_hide_deprecated() {
        let mut legacy = record();
        legacy.name = "Legacy".to_string();
        legacy.deprecated = true;
        let package = PackageElement::new("com.acme")
            .with_type(record())
            .with_type(legacy)
            .with_type(TypeElement::new("com.acme", "Plain", TypeKind::Class));

        assert_eq!(documented_types(&package, false).count(), 2);
        let shown: Vec<&str> = documented_types(&package, true).map(|t| t.name.as_str()).collect();
        assert_eq!(shown, vec!["Record"]);
    }

    #[test]
    fn test_serialization_methods() {
        let ty = record();
        let methods = serialization_methods(&ty);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].name, "readObject");
    }
}
