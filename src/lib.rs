//! Doclet Builders
//!
//! Layout-driven orchestration of documentation pages. A [`BuilderFactory`]
//! wires one builder per page to a shared [`BuildContext`] and a writer from
//! the caller's [`WriterFactory`]; the builder then runs the steps the
//! [`Layout`] names for its page kind.

pub mod builders;
pub mod config;
pub mod context;
pub mod driver;
pub mod entity;
pub mod error;
pub mod factory;
pub mod layout;
pub mod matching;
pub mod writer;

pub use builders::{is_known_step, Builder, BuilderState};
pub use config::BuildConfig;
pub use context::BuildContext;
pub use driver::{neighbors, select_entities, DocumentationRun, PageFailure, RunReport};
pub use entity::{
    ClassTree, DocSet, MemberElement, MemberKind, ModuleElement, PackageElement, PackageId,
    ServiceElement, TypeElement, TypeKind,
};
pub use error::{BuildError, Result};
pub use factory::BuilderFactory;
pub use layout::{Layout, LayoutIssue, LayoutProvider, PageKind, StepId};
pub use matching::EntityFilter;
pub use writer::{
    AnnotationMemberWriter, AnnotationTypeWriter, ClassWriter, ConstantsSummaryWriter,
    MemberSummaryWriter, MemberWriter, ModuleSummaryWriter, PackageSummaryWriter,
    SerializedFormWriter, SummaryKind, TypeWriter, WriteResult, WriterFactory,
};
