//! Recording writers shared by the integration tests.
//!
//! Every writer call is appended to one event log as `scope:entity:operation`,
//! so tests can assert on the exact order in which builders drive writers.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use parking_lot::Mutex;

use doclet_builders::{
    AnnotationMemberWriter, AnnotationTypeWriter, ClassTree, ClassWriter, ConstantsSummaryWriter,
    DocSet, MemberElement, MemberKind, MemberSummaryWriter, MemberWriter, ModuleElement,
    ModuleSummaryWriter, PackageElement, PackageId, PackageSummaryWriter, SerializedFormWriter,
    ServiceElement, SummaryKind, TypeElement, TypeKind, TypeWriter, WriteResult, WriterFactory,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone, Default)]
struct Log {
    events: Arc<Mutex<Vec<String>>>,
    fail_on: Option<String>,
}

impl Log {
    fn record(&self, scope: &str, entity: &str, op: impl Into<String>) -> WriteResult {
        let event = format!("{}:{}:{}", scope, entity, op.into());
        self.events.lock().push(event.clone());
        if self.fail_on.as_deref() == Some(event.as_str()) {
            bail!("simulated writer failure at {}", event);
        }
        Ok(())
    }
}

/// A [`WriterFactory`] whose writers record their calls.
#[derive(Default)]
pub struct Recorder {
    log: Log,
    unsupported: HashSet<&'static str>,
    requests: Mutex<Vec<String>>,
    navigation: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `None` for one writer kind, e.g. `"module"` or `"memberSummary"`.
    pub fn unsupported(mut self, kind: &'static str) -> Self {
        self.unsupported.insert(kind);
        self
    }

    /// Make the writer call producing `event` fail.
    pub fn failing_at(mut self, event: &str) -> Self {
        self.log.fail_on = Some(event.to_string());
        self
    }

    pub fn events(&self) -> Vec<String> {
        self.log.events.lock().clone()
    }

    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn navigation(&self) -> Vec<String> {
        self.navigation.lock().clone()
    }

    fn request(&self, kind: &str, entity: &str) -> Option<()> {
        self.requests.lock().push(format!("{}:{}", kind, entity));
        if self.unsupported.contains(kind) {
            None
        } else {
            Some(())
        }
    }

    fn navigate(&self, entity: &str, prev: Option<String>, next: Option<String>) {
        self.navigation.lock().push(format!(
            "{} prev={} next={}",
            entity,
            prev.as_deref().unwrap_or("-"),
            next.as_deref().unwrap_or("-")
        ));
    }
}

impl WriterFactory for Recorder {
    fn constants_summary_writer(&self) -> Option<Box<dyn ConstantsSummaryWriter + '_>> {
        self.request("constants", "")?;
        Some(Box::new(ConstantsRecorder {
            log: self.log.clone(),
        }))
    }

    fn package_summary_writer<'w>(
        &'w self,
        package: &'w PackageElement,
        prev: Option<&'w PackageElement>,
        next: Option<&'w PackageElement>,
    ) -> Option<Box<dyn PackageSummaryWriter + 'w>> {
        self.request("package", package.id.as_str())?;
        self.navigate(
            package.id.as_str(),
            prev.map(|p| p.id.to_string()),
            next.map(|p| p.id.to_string()),
        );
        Some(Box::new(PackageRecorder {
            log: self.log.clone(),
            id: package.id.to_string(),
        }))
    }

    fn module_summary_writer<'w>(
        &'w self,
        module: &'w ModuleElement,
        prev: Option<&'w ModuleElement>,
        next: Option<&'w ModuleElement>,
    ) -> Option<Box<dyn ModuleSummaryWriter + 'w>> {
        self.request("module", &module.name)?;
        self.navigate(
            &module.name,
            prev.map(|m| m.name.clone()),
            next.map(|m| m.name.clone()),
        );
        Some(Box::new(ModuleRecorder {
            log: self.log.clone(),
            name: module.name.clone(),
        }))
    }

    fn class_writer<'w>(
        &'w self,
        ty: &'w TypeElement,
        prev: Option<&'w TypeElement>,
        next: Option<&'w TypeElement>,
        _tree: &'w ClassTree<'w>,
    ) -> Option<Box<dyn ClassWriter + 'w>> {
        let entity = ty.qualified_name();
        self.request("class", &entity)?;
        self.navigate(&entity, prev.map(|t| t.name.clone()), next.map(|t| t.name.clone()));
        Some(Box::new(TypeRecorder::new(self.log.clone(), "class", ty)))
    }

    fn annotation_type_writer<'w>(
        &'w self,
        ty: &'w TypeElement,
        prev: Option<&'w TypeElement>,
        next: Option<&'w TypeElement>,
    ) -> Option<Box<dyn AnnotationTypeWriter + 'w>> {
        let entity = ty.qualified_name();
        self.request("annotationType", &entity)?;
        self.navigate(&entity, prev.map(|t| t.name.clone()), next.map(|t| t.name.clone()));
        Some(Box::new(TypeRecorder::new(self.log.clone(), "annotationType", ty)))
    }

    fn member_writer(
        &self,
        parent: &dyn ClassWriter,
        kind: MemberKind,
    ) -> Option<Box<dyn MemberWriter + '_>> {
        let entity = parent.type_element().qualified_name();
        self.request("member", &entity)?;
        let scope = match kind {
            MemberKind::Method => "methodDetails",
            MemberKind::Field => "fieldDetails",
            MemberKind::Constructor => "constructorDetails",
            MemberKind::Property => "propertyDetails",
            MemberKind::EnumConstant => "enumConstantDetails",
            MemberKind::AnnotationElement => "elementDetails",
        };
        Some(Box::new(MemberRecorder {
            log: self.log.clone(),
            scope: scope.to_string(),
            entity,
        }))
    }

    fn annotation_member_writer(
        &self,
        parent: &dyn AnnotationTypeWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn AnnotationMemberWriter + '_>> {
        let entity = parent.type_element().qualified_name();
        self.request("annotationMember", &entity)?;
        let scope = match kind {
            SummaryKind::AnnotationTypeFields => "annotationFieldDetails",
            SummaryKind::AnnotationTypeRequiredMembers => "requiredDetails",
            _ => "optionalDetails",
        };
        Some(Box::new(MemberRecorder {
            log: self.log.clone(),
            scope: scope.to_string(),
            entity,
        }))
    }

    fn member_summary_writer(
        &self,
        parent: &dyn ClassWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn MemberSummaryWriter + '_>> {
        let entity = parent.type_element().qualified_name();
        self.request("memberSummary", &entity)?;
        Some(Box::new(SummaryRecorder {
            log: self.log.clone(),
            scope: format!("summary.{:?}", kind),
            entity,
        }))
    }

    fn annotation_member_summary_writer(
        &self,
        parent: &dyn AnnotationTypeWriter,
        kind: SummaryKind,
    ) -> Option<Box<dyn MemberSummaryWriter + '_>> {
        let entity = parent.type_element().qualified_name();
        self.request("annotationMemberSummary", &entity)?;
        Some(Box::new(SummaryRecorder {
            log: self.log.clone(),
            scope: format!("annotationSummary.{:?}", kind),
            entity,
        }))
    }

    fn serialized_form_writer(&self) -> Option<Box<dyn SerializedFormWriter + '_>> {
        self.request("serializedForm", "")?;
        Some(Box::new(SerialRecorder {
            log: self.log.clone(),
        }))
    }
}

struct ModuleRecorder {
    log: Log,
    name: String,
}

impl ModuleSummaryWriter for ModuleRecorder {
    fn add_header(&mut self) -> WriteResult {
        self.log.record("module", &self.name, "header")
    }
    fn add_description(&mut self) -> WriteResult {
        self.log.record("module", &self.name, "description")
    }
    fn add_tags(&mut self) -> WriteResult {
        self.log.record("module", &self.name, "tags")
    }
    fn add_modules_summary(&mut self, requires: &[String]) -> WriteResult {
        self.log
            .record("module", &self.name, format!("requires({})", requires.join(",")))
    }
    fn add_packages_summary(&mut self, exports: &[PackageId]) -> WriteResult {
        self.log
            .record("module", &self.name, format!("exports({})", exports.len()))
    }
    fn add_services_summary(
        &mut self,
        uses: &[ServiceElement],
        provides: &[ServiceElement],
    ) -> WriteResult {
        self.log.record(
            "module",
            &self.name,
            format!("services({},{})", uses.len(), provides.len()),
        )
    }
    fn add_footer(&mut self) -> WriteResult {
        self.log.record("module", &self.name, "footer")
    }
    fn print_document(&mut self) -> WriteResult {
        self.log.record("module", &self.name, "print")
    }
}

struct PackageRecorder {
    log: Log,
    id: String,
}

impl PackageSummaryWriter for PackageRecorder {
    fn add_header(&mut self) -> WriteResult {
        self.log.record("package", &self.id, "header")
    }
    fn add_type_summary(&mut self, kind: TypeKind, types: &[&TypeElement]) -> WriteResult {
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        self.log
            .record("package", &self.id, format!("{}({})", kind, names.join(",")))
    }
    fn add_description(&mut self) -> WriteResult {
        self.log.record("package", &self.id, "description")
    }
    fn add_tags(&mut self) -> WriteResult {
        self.log.record("package", &self.id, "tags")
    }
    fn add_footer(&mut self) -> WriteResult {
        self.log.record("package", &self.id, "footer")
    }
    fn copy_doc_files(&mut self, package: &PackageElement) -> WriteResult {
        self.log.record(
            "package",
            &self.id,
            format!("copyDocFiles({})", package.doc_files.len()),
        )
    }
    fn print_document(&mut self) -> WriteResult {
        self.log.record("package", &self.id, "print")
    }
}

struct ConstantsRecorder {
    log: Log,
}

impl ConstantsSummaryWriter for ConstantsRecorder {
    fn add_header(&mut self) -> WriteResult {
        self.log.record("constants", "", "header")
    }
    fn add_contents(&mut self, packages: &[&PackageId]) -> WriteResult {
        let names: Vec<&str> = packages.iter().map(|p| p.as_str()).collect();
        self.log
            .record("constants", "", format!("contents({})", names.join(",")))
    }
    fn add_package_header(&mut self, package: &PackageId) -> WriteResult {
        self.log
            .record("constants", "", format!("package({})", package))
    }
    fn add_class_constants(&mut self, ty: &TypeElement, fields: &[&MemberElement]) -> WriteResult {
        self.log.record(
            "constants",
            "",
            format!("class({},{})", ty.qualified_name(), fields.len()),
        )
    }
    fn add_footer(&mut self) -> WriteResult {
        self.log.record("constants", "", "footer")
    }
    fn print_document(&mut self) -> WriteResult {
        self.log.record("constants", "", "print")
    }
}

pub struct TypeRecorder {
    log: Log,
    scope: &'static str,
    ty: TypeElement,
    entity: String,
}

impl TypeRecorder {
    fn new(log: Log, scope: &'static str, ty: &TypeElement) -> Self {
        Self {
            log,
            scope,
            entity: ty.qualified_name(),
            ty: ty.clone(),
        }
    }

    fn record(&self, op: impl Into<String>) -> WriteResult {
        self.log.record(self.scope, &self.entity, op)
    }
}

impl TypeWriter for TypeRecorder {
    fn type_element(&self) -> &TypeElement {
        &self.ty
    }
    fn add_header(&mut self) -> WriteResult {
        self.record("header")
    }
    fn add_deprecation_info(&mut self) -> WriteResult {
        self.record("deprecation")
    }
    fn add_signature(&mut self) -> WriteResult {
        self.record("signature")
    }
    fn add_description(&mut self) -> WriteResult {
        self.record("description")
    }
    fn add_tags(&mut self) -> WriteResult {
        self.record("tags")
    }
    fn add_footer(&mut self) -> WriteResult {
        self.record("footer")
    }
    fn copy_doc_files(&mut self, package: &PackageElement) -> WriteResult {
        self.record(format!("copyDocFiles({})", package.id))
    }
    fn print_document(&mut self) -> WriteResult {
        self.record("print")
    }
}

impl ClassWriter for TypeRecorder {
    fn add_class_tree(&mut self, ancestors: &[&TypeElement]) -> WriteResult {
        let names: Vec<&str> = ancestors.iter().map(|t| t.name.as_str()).collect();
        self.record(format!("classTree({})", names.join(",")))
    }
    fn add_type_parameter_info(&mut self, parameters: &[String]) -> WriteResult {
        self.record(format!("typeParameters({})", parameters.join(",")))
    }
    fn add_super_interfaces_info(&mut self, interfaces: &[String]) -> WriteResult {
        self.record(format!("superInterfaces({})", interfaces.join(",")))
    }
    fn add_implemented_interfaces_info(&mut self, interfaces: &[String]) -> WriteResult {
        self.record(format!("implementedInterfaces({})", interfaces.join(",")))
    }
    fn add_subclasses_info(&mut self, subclasses: &[String]) -> WriteResult {
        self.record(format!("subclasses({})", subclasses.join(",")))
    }
    fn add_subinterfaces_info(&mut self, subinterfaces: &[String]) -> WriteResult {
        self.record(format!("subinterfaces({})", subinterfaces.join(",")))
    }
    fn add_implementing_classes_info(&mut self, implementors: &[String]) -> WriteResult {
        self.record(format!("implementingClasses({})", implementors.join(",")))
    }
}

impl AnnotationTypeWriter for TypeRecorder {}

struct MemberRecorder {
    log: Log,
    scope: String,
    entity: String,
}

impl MemberRecorder {
    fn record(&self, op: impl Into<String>) -> WriteResult {
        self.log.record(&self.scope, &self.entity, op)
    }
}

impl MemberWriter for MemberRecorder {
    fn add_details_header(&mut self, members: &[&MemberElement]) -> WriteResult {
        self.record(format!("header({})", members.len()))
    }
    fn add_member_header(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("member({})", member.name))
    }
    fn add_signature(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("signature({})", member.name))
    }
    fn add_deprecation_info(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("deprecation({})", member.name))
    }
    fn add_comments(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("comments({})", member.name))
    }
    fn add_tags(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("tags({})", member.name))
    }
    fn add_member_footer(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!("memberFooter({})", member.name))
    }
    fn add_details_footer(&mut self) -> WriteResult {
        self.record("footer")
    }
}

impl AnnotationMemberWriter for MemberRecorder {
    fn add_default_value(&mut self, member: &MemberElement) -> WriteResult {
        self.record(format!(
            "defaultValue({}={})",
            member.name,
            member.default_value.as_deref().unwrap_or_default()
        ))
    }
}

struct SummaryRecorder {
    log: Log,
    scope: String,
    entity: String,
}

impl MemberSummaryWriter for SummaryRecorder {
    fn add_summary_header(&mut self) -> WriteResult {
        self.log.record(&self.scope, &self.entity, "header")
    }
    fn add_summary_row(&mut self, member: &MemberElement) -> WriteResult {
        self.log
            .record(&self.scope, &self.entity, format!("row({})", member.name))
    }
    fn add_inherited_summary(&mut self, from: &TypeElement, members: &[&MemberElement]) -> WriteResult {
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        self.log.record(
            &self.scope,
            &self.entity,
            format!("inherited({}:{})", from.name, names.join(",")),
        )
    }
    fn add_summary_footer(&mut self) -> WriteResult {
        self.log.record(&self.scope, &self.entity, "footer")
    }
}

struct SerialRecorder {
    log: Log,
}

impl SerializedFormWriter for SerialRecorder {
    fn add_header(&mut self) -> WriteResult {
        self.log.record("serialized", "", "header")
    }
    fn add_package_header(&mut self, package: &PackageElement) -> WriteResult {
        self.log
            .record("serialized", "", format!("package({})", package.id))
    }
    fn add_class_header(&mut self, ty: &TypeElement) -> WriteResult {
        self.log
            .record("serialized", "", format!("class({})", ty.qualified_name()))
    }
    fn add_serial_uid(&mut self, ty: &TypeElement, uid: &str) -> WriteResult {
        self.log
            .record("serialized", "", format!("uid({}={})", ty.name, uid))
    }
    fn add_serializable_methods(&mut self, ty: &TypeElement, methods: &[&MemberElement]) -> WriteResult {
        let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
        self.log
            .record("serialized", "", format!("methods({}:{})", ty.name, names.join(",")))
    }
    fn add_serializable_fields(&mut self, ty: &TypeElement, fields: &[&MemberElement]) -> WriteResult {
        let names: Vec<&str> = fields.iter().map(|m| m.name.as_str()).collect();
        self.log
            .record("serialized", "", format!("fields({}:{})", ty.name, names.join(",")))
    }
    fn add_footer(&mut self) -> WriteResult {
        self.log.record("serialized", "", "footer")
    }
    fn print_document(&mut self) -> WriteResult {
        self.log.record("serialized", "", "print")
    }
}

/// `com.acme` with a class, an interface, an annotation type and doc-files,
/// plus `com.acme.util` with a constants holder.
pub fn sample_docs() -> DocSet {
    let mut shape = TypeElement::new("com.acme", "Shape", TypeKind::Interface)
        .with_member(MemberElement::new("area", MemberKind::Method));
    shape.description = Some("A shape.".to_string());

    let mut widget = TypeElement::new("com.acme", "Widget", TypeKind::Class)
        .with_member(MemberElement::new("Widget", MemberKind::Constructor))
        .with_member(MemberElement::new("draw", MemberKind::Method))
        .with_member(MemberElement::new("area", MemberKind::Method))
        .with_member(MemberElement::new("size", MemberKind::Field));
    widget.interfaces.push("com.acme.Shape".to_string());
    widget.serializable = true;
    widget.serial_version_uid = Some("42".to_string());

    let audit = TypeElement::new("com.acme", "Audit", TypeKind::AnnotationType)
        .with_member(MemberElement::annotation_element("value", None))
        .with_member(MemberElement::annotation_element("level", Some("1")));

    let mut acme = PackageElement::new("com.acme")
        .with_type(shape)
        .with_type(widget)
        .with_type(audit);
    acme.doc_files.push(PathBuf::from("doc-files/overview.png"));

    let limits = TypeElement::new("com.acme.util", "Limits", TypeKind::Class)
        .with_member(MemberElement::constant("MAX", "10"))
        .with_member(MemberElement::constant("MIN", "0"));
    let util = PackageElement::new("com.acme.util").with_type(limits);

    let module = ModuleElement {
        name: "acme.core".to_string(),
        requires: vec!["java.base".to_string()],
        exports: vec![PackageId::from("com.acme"), PackageId::from("com.acme.util")],
        ..ModuleElement::default()
    };

    DocSet::new()
        .with_module(module)
        .with_package(acme)
        .with_package(util)
}
