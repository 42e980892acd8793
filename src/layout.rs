//! Page layouts: the ordered step list each builder executes.
//!
//! A layout maps every [`PageKind`] to the step identifiers its builder runs,
//! in order. Builders never hard-code their sequencing; swapping the layout
//! changes page structure without touching builder code.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::builders;
use crate::error::{BuildError, Result};

/// Every page or section kind a builder looks up in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageKind {
    Module,
    Package,
    ConstantsSummary,
    /// Per-package sub-list of the constants summary.
    ConstantsPackage,
    Class,
    AnnotationType,
    MemberSummary,
    AnnotationTypeMemberSummary,
    MethodDetails,
    FieldDetails,
    ConstructorDetails,
    PropertyDetails,
    EnumConstantDetails,
    AnnotationTypeFieldDetails,
    AnnotationTypeRequiredMemberDetails,
    AnnotationTypeOptionalMemberDetails,
    SerializedForm,
    SerializedFormPackage,
    SerializedFormClass,
}

impl PageKind {
    pub const ALL: [PageKind; 19] = [
        PageKind::Module,
        PageKind::Package,
        PageKind::ConstantsSummary,
        PageKind::ConstantsPackage,
        PageKind::Class,
        PageKind::AnnotationType,
        PageKind::MemberSummary,
        PageKind::AnnotationTypeMemberSummary,
        PageKind::MethodDetails,
        PageKind::FieldDetails,
        PageKind::ConstructorDetails,
        PageKind::PropertyDetails,
        PageKind::EnumConstantDetails,
        PageKind::AnnotationTypeFieldDetails,
        PageKind::AnnotationTypeRequiredMemberDetails,
        PageKind::AnnotationTypeOptionalMemberDetails,
        PageKind::SerializedForm,
        PageKind::SerializedFormPackage,
        PageKind::SerializedFormClass,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Module => "module",
            PageKind::Package => "package",
            PageKind::ConstantsSummary => "constantsSummary",
            PageKind::ConstantsPackage => "constantsPackage",
            PageKind::Class => "class",
            PageKind::AnnotationType => "annotationType",
            PageKind::MemberSummary => "memberSummary",
            PageKind::AnnotationTypeMemberSummary => "annotationTypeMemberSummary",
            PageKind::MethodDetails => "methodDetails",
            PageKind::FieldDetails => "fieldDetails",
            PageKind::ConstructorDetails => "constructorDetails",
            PageKind::PropertyDetails => "propertyDetails",
            PageKind::EnumConstantDetails => "enumConstantDetails",
            PageKind::AnnotationTypeFieldDetails => "annotationTypeFieldDetails",
            PageKind::AnnotationTypeRequiredMemberDetails => "annotationTypeRequiredMemberDetails",
            PageKind::AnnotationTypeOptionalMemberDetails => "annotationTypeOptionalMemberDetails",
            PageKind::SerializedForm => "serializedForm",
            PageKind::SerializedFormPackage => "serializedFormPackage",
            PageKind::SerializedFormClass => "serializedFormClass",
        }
    }

    /// The entry consulted when the layout has none for this kind.
    ///
    /// Annotation type pages share the class page vocabulary.
    pub fn fallback(&self) -> Option<PageKind> {
        match self {
            PageKind::AnnotationType => Some(PageKind::Class),
            _ => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        PageKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| BuildError::Layout(format!("unknown page kind '{}'", s)))
    }
}

impl TryFrom<String> for PageKind {
    type Error = BuildError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PageKind> for String {
    fn from(kind: PageKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Identifier of one layout step: either a leaf writer action or a nested section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Source of step lists, read-only for the duration of a run.
pub trait LayoutProvider: Send + Sync {
    /// Ordered steps for `kind`, or `None` when the layout has no entry for it.
    fn steps_for(&self, kind: PageKind) -> Option<&[StepId]>;
}

/// A step the builders would reject at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutIssue {
    pub page: PageKind,
    pub step: StepId,
}

impl fmt::Display for LayoutIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} layout references unknown step '{}'", self.page, self.step)
    }
}

const DEFAULT_LAYOUT: &[(PageKind, &[&str])] = &[
    (
        PageKind::Module,
        &[
            "header",
            "description",
            "tags",
            "modulesSummary",
            "packagesSummary",
            "servicesSummary",
            "footer",
        ],
    ),
    (
        PageKind::Package,
        &[
            "header",
            "interfaceSummary",
            "classSummary",
            "enumSummary",
            "exceptionSummary",
            "errorSummary",
            "annotationTypeSummary",
            "description",
            "tags",
            "footer",
        ],
    ),
    (
        PageKind::ConstantsSummary,
        &["header", "contents", "constantSummaries", "footer"],
    ),
    (PageKind::ConstantsPackage, &["packageHeader", "classConstants"]),
    (
        PageKind::Class,
        &[
            "header",
            "classTree",
            "typeParameters",
            "superInterfaces",
            "implementedInterfaces",
            "subclasses",
            "subinterfaces",
            "implementingClasses",
            "deprecation",
            "signature",
            "description",
            "tags",
            "memberSummary",
            "enumConstantDetails",
            "propertyDetails",
            "fieldDetails",
            "constructorDetails",
            "methodDetails",
            "footer",
        ],
    ),
    (
        PageKind::AnnotationType,
        &[
            "header",
            "deprecation",
            "signature",
            "description",
            "tags",
            "memberSummary",
            "annotationTypeFieldDetails",
            "annotationTypeRequiredMemberDetails",
            "annotationTypeOptionalMemberDetails",
            "footer",
        ],
    ),
    (
        PageKind::MemberSummary,
        &[
            "enumConstantsSummary",
            "propertiesSummary",
            "fieldsSummary",
            "constructorsSummary",
            "methodsSummary",
        ],
    ),
    (
        PageKind::AnnotationTypeMemberSummary,
        &[
            "annotationTypeFieldsSummary",
            "annotationTypeRequiredMemberSummary",
            "annotationTypeOptionalMemberSummary",
        ],
    ),
    (PageKind::MethodDetails, &["signature", "deprecation", "comments", "tags"]),
    (PageKind::FieldDetails, &["signature", "deprecation", "comments", "tags"]),
    (PageKind::ConstructorDetails, &["signature", "deprecation", "comments", "tags"]),
    (PageKind::PropertyDetails, &["signature", "deprecation", "comments", "tags"]),
    (PageKind::EnumConstantDetails, &["signature", "deprecation", "comments", "tags"]),
    (
        PageKind::AnnotationTypeFieldDetails,
        &["signature", "deprecation", "comments", "tags"],
    ),
    (
        PageKind::AnnotationTypeRequiredMemberDetails,
        &["signature", "deprecation", "comments", "tags"],
    ),
    (
        PageKind::AnnotationTypeOptionalMemberDetails,
        &["signature", "deprecation", "comments", "tags", "defaultValue"],
    ),
    (PageKind::SerializedForm, &["header", "packages", "footer"]),
    (PageKind::SerializedFormPackage, &["packageHeader", "classes"]),
    (
        PageKind::SerializedFormClass,
        &["classHeader", "serialUid", "serializableMethods", "serializableFields"],
    ),
];

/// In-memory layout keyed by page kind, preserving declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    pages: IndexMap<PageKind, Vec<StepId>>,
}

impl Layout {
    /// An empty layout: every builder runs zero steps.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard doclet page structure.
    pub fn default_layout() -> Self {
        let mut layout = Self::new();
        for (kind, steps) in DEFAULT_LAYOUT {
            layout.set(*kind, steps.iter().copied());
        }
        layout
    }

    /// Replace the step list for `kind`.
    pub fn set<I, S>(&mut self, kind: PageKind, steps: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StepId>,
    {
        self.pages
            .insert(kind, steps.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style variant of [`Layout::set`].
    pub fn with<I, S>(mut self, kind: PageKind, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StepId>,
    {
        self.set(kind, steps);
        self
    }

    pub fn remove(&mut self, kind: PageKind) -> Option<Vec<StepId>> {
        self.pages.shift_remove(&kind)
    }

    pub fn page_kinds(&self) -> impl Iterator<Item = PageKind> + '_ {
        self.pages.keys().copied()
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source)
            .map_err(|e| BuildError::Layout(format!("invalid YAML layout: {}", e)))
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| BuildError::Layout(format!("invalid TOML layout: {}", e)))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source)
            .map_err(|e| BuildError::Layout(format!("invalid JSON layout: {}", e)))
    }

    /// Load a layout file; the format follows the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            BuildError::Layout(format!("failed to read layout {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            Some("toml") => Self::from_toml_str(&source),
            Some("json") => Self::from_json_str(&source),
            other => Err(BuildError::Layout(format!(
                "unsupported layout format {:?} for {}",
                other,
                path.display()
            ))),
        }
    }

    /// Report every step no builder would accept.
    pub fn lint(&self) -> Vec<LayoutIssue> {
        let mut issues = Vec::new();
        for (kind, steps) in &self.pages {
            for step in steps {
                if !builders::is_known_step(*kind, step.as_str()) {
                    issues.push(LayoutIssue {
                        page: *kind,
                        step: step.clone(),
                    });
                }
            }
        }
        issues
    }
}

impl LayoutProvider for Layout {
    fn steps_for(&self, kind: PageKind) -> Option<&[StepId]> {
        self.pages.get(&kind).map(Vec::as_slice)
    }
}
