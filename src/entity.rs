//! Documented language constructs: modules, packages, types and their members.
//!
//! These are plain data; builders traverse them and writers render them.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Dotted package name; the key of the containing-packages-seen set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// A provided or used service of a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceElement {
    pub interface: String,
    /// Implementations for `provides`; empty for `uses`.
    #[serde(default)]
    pub implementations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleElement {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub exports: Vec<PackageId>,
    #[serde(default)]
    pub uses: Vec<ServiceElement>,
    #[serde(default)]
    pub provides: Vec<ServiceElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageElement {
    pub id: PackageId,
    /// Name of the owning module, if any.
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    /// Resources under the package's `doc-files/` directory.
    #[serde(default)]
    pub doc_files: Vec<PathBuf>,
    #[serde(default)]
    pub types: Vec<TypeElement>,
}

impl PackageElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PackageId::new(name),
            module: None,
            description: None,
            deprecated: false,
            doc_files: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: TypeElement) -> Self {
        self.types.push(ty);
        self
    }

    pub fn types_of_kind(&self, kind: TypeKind) -> impl Iterator<Item = &TypeElement> {
        self.types.iter().filter(move |t| t.kind == kind)
    }

    pub fn has_constants(&self) -> bool {
        self.types.iter().any(|t| t.constant_fields().next().is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Exception,
    Error,
    AnnotationType,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Exception => "exception",
            TypeKind::Error => "error",
            TypeKind::AnnotationType => "annotation type",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeElement {
    pub name: String,
    pub package: PackageId,
    pub kind: TypeKind,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub serializable: bool,
    #[serde(default)]
    pub serial_version_uid: Option<String>,
    #[serde(default)]
    pub members: Vec<MemberElement>,
}

impl TypeElement {
    pub fn new(package: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            package: PackageId::new(package),
            kind,
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            description: None,
            deprecated: false,
            serializable: false,
            serial_version_uid: None,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberElement) -> Self {
        self.members.push(member);
        self
    }

    pub fn qualified_name(&self) -> String {
        if self.package.as_str().is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn is_annotation_type(&self) -> bool {
        self.kind == TypeKind::AnnotationType
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::AnnotationType)
    }

    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &MemberElement> {
        self.members.iter().filter(move |m| m.kind == kind)
    }

    /// Static final fields carrying a compile-time value.
    pub fn constant_fields(&self) -> impl Iterator<Item = &MemberElement> {
        self.members
            .iter()
            .filter(|m| {
                m.kind == MemberKind::Field
                    && m.is_static
                    && m.is_final
                    && m.constant_value.is_some()
            })
    }

    /// Annotation elements without a default value.
    pub fn required_elements(&self) -> impl Iterator<Item = &MemberElement> {
        self.members_of_kind(MemberKind::AnnotationElement)
            .filter(|m| m.default_value.is_none())
    }

    /// Annotation elements with a default value.
    pub fn optional_elements(&self) -> impl Iterator<Item = &MemberElement> {
        self.members_of_kind(MemberKind::AnnotationElement)
            .filter(|m| m.default_value.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Method,
    Field,
    Constructor,
    Property,
    EnumConstant,
    AnnotationElement,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemberKind::Method => "method",
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Property => "property",
            MemberKind::EnumConstant => "enum constant",
            MemberKind::AnnotationElement => "annotation element",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberElement {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_transient: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub constant_value: Option<String>,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl MemberElement {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        let name = name.into();
        Self {
            signature: name.clone(),
            name,
            kind,
            description: None,
            is_static: false,
            is_final: false,
            is_transient: false,
            deprecated: false,
            constant_value: None,
            default_value: None,
        }
    }

    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = Self::new(name, MemberKind::Field);
        field.is_static = true;
        field.is_final = true;
        field.constant_value = Some(value.into());
        field
    }

    pub fn annotation_element(name: impl Into<String>, default_value: Option<&str>) -> Self {
        let mut element = Self::new(name, MemberKind::AnnotationElement);
        element.default_value = default_value.map(str::to_string);
        element
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

/// The whole documented body of one run, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocSet {
    #[serde(default)]
    pub modules: Vec<ModuleElement>,
    #[serde(default)]
    pub packages: Vec<PackageElement>,
}

impl DocSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: ModuleElement) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_package(mut self, package: PackageElement) -> Self {
        self.packages.push(package);
        self
    }

    pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    pub fn package(&self, id: &PackageId) -> Option<&PackageElement> {
        self.packages.iter().find(|p| &p.id == id)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeElement> {
        self.packages.iter().flat_map(|p| p.types.iter())
    }

    /// Look a type up by qualified name.
    pub fn find_type(&self, qualified_name: &str) -> Option<&TypeElement> {
        self.types().find(|t| t.qualified_name() == qualified_name)
    }
}

/// Hierarchy index over a [`DocSet`], built once per run.
///
/// Type references are resolved as a qualified name first, then as a type of
/// the referencing package, then as a simple name shared by no other type.
/// References that stay unresolved are indexed under their literal text.
#[derive(Debug, Clone)]
pub struct ClassTree<'d> {
    docs: &'d DocSet,
    by_qualified_name: HashMap<String, &'d TypeElement>,
    by_simple_name: HashMap<&'d str, Vec<&'d TypeElement>>,
    subclasses: HashMap<String, Vec<String>>,
    subinterfaces: HashMap<String, Vec<String>>,
    implementors: HashMap<String, Vec<String>>,
}

impl<'d> ClassTree<'d> {
    pub fn build(docs: &'d DocSet) -> Self {
        let mut tree = Self {
            docs,
            by_qualified_name: HashMap::new(),
            by_simple_name: HashMap::new(),
            subclasses: HashMap::new(),
            subinterfaces: HashMap::new(),
            implementors: HashMap::new(),
        };

        for ty in docs.types() {
            tree.by_qualified_name.entry(ty.qualified_name()).or_insert(ty);
            tree.by_simple_name.entry(ty.name.as_str()).or_default().push(ty);
        }

        for ty in docs.types() {
            let qualified = ty.qualified_name();

            if let Some(superclass) = &ty.superclass {
                let key = tree.resolved_name(ty, superclass);
                tree.subclasses.entry(key).or_default().push(qualified.clone());
            }

            for interface in &ty.interfaces {
                let key = tree.resolved_name(ty, interface);
                let target = if ty.is_interface() {
                    &mut tree.subinterfaces
                } else {
                    &mut tree.implementors
                };
                target.entry(key).or_default().push(qualified.clone());
            }
        }

        tree
    }

    /// The type `name` refers to when written inside `from`.
    pub fn resolve(&self, from: &TypeElement, name: &str) -> Option<&'d TypeElement> {
        if let Some(ty) = self.by_qualified_name.get(name) {
            return Some(*ty);
        }
        if !from.package.as_str().is_empty() {
            let local = format!("{}.{}", from.package, name);
            if let Some(ty) = self.by_qualified_name.get(&local) {
                return Some(*ty);
            }
        }
        match self.by_simple_name.get(name).map(Vec::as_slice) {
            Some([only]) => Some(*only),
            _ => None,
        }
    }

    fn resolved_name(&self, from: &TypeElement, name: &str) -> String {
        self.resolve(from, name)
            .map(TypeElement::qualified_name)
            .unwrap_or_else(|| name.to_string())
    }

    pub fn docs(&self) -> &'d DocSet {
        self.docs
    }

    pub fn subclasses(&self, qualified_name: &str) -> &[String] {
        self.subclasses
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn subinterfaces(&self, qualified_name: &str) -> &[String] {
        self.subinterfaces
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn implementors(&self, qualified_name: &str) -> &[String] {
        self.implementors
            .get(qualified_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Superclass chain of `ty` that is present in the doc set, nearest first.
    pub fn supertypes(&self, ty: &TypeElement) -> Vec<&'d TypeElement> {
        let mut chain: Vec<&'d TypeElement> = Vec::new();
        let mut current = ty.superclass.as_deref().and_then(|s| self.resolve(ty, s));
        while let Some(parent) = current {
            // cyclic input must not loop forever
            if std::ptr::eq(parent, ty) || chain.iter().any(|t| std::ptr::eq(*t, parent)) {
                break;
            }
            chain.push(parent);
            current = parent
                .superclass
                .as_deref()
                .and_then(|s| self.resolve(parent, s));
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocSet {
        let mut base = TypeElement::new("com.acme", "Base", TypeKind::Class);
        base.interfaces.push("Shape".to_string());
        let mut derived = TypeElement::new("com.acme", "Derived", TypeKind::Class);
        derived.superclass = Some("com.acme.Base".to_string());
        let shape = TypeElement::new("com.acme", "Shape", TypeKind::Interface);
        let mut solid = TypeElement::new("com.acme", "Solid", TypeKind::Interface);
        solid.interfaces.push("com.acme.Shape".to_string());

        DocSet::new().with_package(
            PackageElement::new("com.acme")
                .with_type(base)
                .with_type(derived)
                .with_type(shape)
                .with_type(solid),
        )
    }

    #[test]
    fn test_class_tree_indexes_hierarchy() {
        let docs = sample();
        let tree = ClassTree::build(&docs);
        assert_eq!(tree.subclasses("com.acme.Base"), ["com.acme.Derived".to_string()]);
        assert_eq!(tree.implementors("com.acme.Shape"), ["com.acme.Base".to_string()]);
        assert_eq!(tree.subinterfaces("com.acme.Shape"), ["com.acme.Solid".to_string()]);
        assert!(tree.subclasses("com.acme.Derived").is_empty());
    }

    #[test]
    fn test_supertypes_follow_superclass_chain() {
        let docs = sample();
        let tree = ClassTree::build(&docs);
        let derived = docs.find_type("com.acme.Derived").unwrap();
        let chain = tree.supertypes(derived);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "Base");
    }

    #[test]
    fn test_simple_names_resolve_within_referencing_package() {
        let mut derived = TypeElement::new("b", "Derived", TypeKind::Class);
        derived.superclass = Some("Base".to_string());
        let mut stray = TypeElement::new("c", "Stray", TypeKind::Class);
        stray.superclass = Some("Base".to_string());
        let docs = DocSet::new()
            .with_package(
                PackageElement::new("a").with_type(TypeElement::new("a", "Base", TypeKind::Class)),
            )
            .with_package(
                PackageElement::new("b")
                    .with_type(TypeElement::new("b", "Base", TypeKind::Class))
                    .with_type(derived),
            )
            .with_package(PackageElement::new("c").with_type(stray));
        let tree = ClassTree::build(&docs);

        let derived = docs.find_type("b.Derived").unwrap();
        let chain = tree.supertypes(derived);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].qualified_name(), "b.Base");
        assert_eq!(tree.subclasses("b.Base"), ["b.Derived".to_string()]);
        assert!(tree.subclasses("a.Base").is_empty());

        // two candidates outside the referencing package: left unresolved
        let stray = docs.find_type("c.Stray").unwrap();
        assert!(tree.supertypes(stray).is_empty());
        assert_eq!(tree.subclasses("Base"), ["c.Stray".to_string()]);
    }

    #[test]
    fn test_unique_simple_name_resolves_across_packages() {
        let mut leaf = TypeElement::new("b", "Leaf", TypeKind::Class);
        leaf.superclass = Some("Root".to_string());
        let docs = DocSet::new()
            .with_package(
                PackageElement::new("a").with_type(TypeElement::new("a", "Root", TypeKind::Class)),
            )
            .with_package(PackageElement::new("b").with_type(leaf));
        let tree = ClassTree::build(&docs);

        let leaf = docs.find_type("b.Leaf").unwrap();
        assert_eq!(tree.supertypes(leaf)[0].qualified_name(), "a.Root");
        assert_eq!(tree.subclasses("a.Root"), ["b.Leaf".to_string()]);
    }

    #[test]
    fn test_supertypes_stop_on_cycle() {
        let mut first = TypeElement::new("a", "First", TypeKind::Class);
        first.superclass = Some("Second".to_string());
        let mut second = TypeElement::new("a", "Second", TypeKind::Class);
        second.superclass = Some("a.First".to_string());
        let docs = DocSet::new()
            .with_package(PackageElement::new("a").with_type(first).with_type(second));
        let tree = ClassTree::build(&docs);

        let first = docs.find_type("a.First").unwrap();
        let chain = tree.supertypes(first);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].name, "Second");
    }

    #[test]
    fn test_constant_fields_require_static_final() {
        let mut instance = MemberElement::new("cached", MemberKind::Field);
        instance.constant_value = Some("3".to_string());
        let ty = TypeElement::new("com.acme", "Limits", TypeKind::Class)
            .with_member(MemberElement::constant("MAX", "10"))
            .with_member(instance);
        let names: Vec<&str> = ty.constant_fields().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["MAX"]);
    }

    #[test]
    fn test_annotation_element_partition() {
        let ty = TypeElement::new("com.acme", "Marker", TypeKind::AnnotationType)
            .with_member(MemberElement::annotation_element("value", None))
            .with_member(MemberElement::annotation_element("level", Some("1")));
        assert_eq!(ty.required_elements().count(), 1);
        assert_eq!(ty.optional_elements().next().unwrap().name, "level");
    }

    #[test]
    fn test_doc_set_from_json() {
        let docs = DocSet::from_json_str(
            r#"{"packages": [{"id": "a.b", "types": [
                {"name": "C", "package": "a.b", "kind": "annotationType"}
            ]}]}"#,
        )
        .unwrap();
        let ty = docs.find_type("a.b.C").unwrap();
        assert!(ty.is_annotation_type());
        assert!(docs.package(&PackageId::from("a.b")).is_some());
    }
}
