//! Package summary page.
//!
//! The package page is a package-level artifact: it claims its package in the
//! shared context so the package's doc-files are copied once per run, whether
//! the package page or one of its type pages gets there first.

use log::debug;

use crate::context::BuildContext;
use crate::entity::{PackageElement, TypeElement, TypeKind};
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::PackageSummaryWriter;

use super::{run_layout, written, LayoutStep};

layout_steps! {
    pub(crate) enum PackageStep {
        Header => "header",
        InterfaceSummary => "interfaceSummary",
        ClassSummary => "classSummary",
        EnumSummary => "enumSummary",
        ExceptionSummary => "exceptionSummary",
        ErrorSummary => "errorSummary",
        AnnotationTypeSummary => "annotationTypeSummary",
        Description => "description",
        Tags => "tags",
        Footer => "footer",
    }
}

impl PackageStep {
    fn summarized_kind(&self) -> Option<TypeKind> {
        match self {
            PackageStep::InterfaceSummary => Some(TypeKind::Interface),
            PackageStep::ClassSummary => Some(TypeKind::Class),
            PackageStep::EnumSummary => Some(TypeKind::Enum),
            PackageStep::ExceptionSummary => Some(TypeKind::Exception),
            PackageStep::ErrorSummary => Some(TypeKind::Error),
            PackageStep::AnnotationTypeSummary => Some(TypeKind::AnnotationType),
            _ => None,
        }
    }
}

pub(crate) struct PackageSummaryBuilder<'a> {
    context: &'a BuildContext<'a>,
    package: &'a PackageElement,
    writer: Box<dyn PackageSummaryWriter + 'a>,
}

impl<'a> PackageSummaryBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        package: &'a PackageElement,
        writer: Box<dyn PackageSummaryWriter + 'a>,
    ) -> Self {
        Self {
            context,
            package,
            writer,
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        let context = self.context;
        let package = self.package;
        let entity = package.id.to_string();

        run_layout(context, PageKind::Package, &entity, |step| self.build_step(step))?;
        written(
            self.writer.print_document(),
            PageKind::Package,
            &entity,
            "printDocument",
        )?;

        let writer = &mut self.writer;
        let first = context.claim_package_with(&package.id, || {
            if package.doc_files.is_empty() {
                return Ok(());
            }
            written(
                writer.copy_doc_files(package),
                PageKind::Package,
                &entity,
                "copyDocFiles",
            )
        })?;
        if !first {
            debug!("doc-files of {} already copied", package.id);
        }
        Ok(())
    }

    fn build_step(&mut self, step: PackageStep) -> Result<()> {
        let package = self.package;
        let config = self.context.config();

        let result = if let Some(kind) = step.summarized_kind() {
            let types: Vec<&TypeElement> = package
                .types_of_kind(kind)
                .filter(|t| !(config.no_deprecated && t.deprecated))
                .collect();
            if types.is_empty() {
                Ok(())
            } else {
                self.writer.add_type_summary(kind, &types)
            }
        } else {
            match step {
                PackageStep::Header => self.writer.add_header(),
                PackageStep::Description | PackageStep::Tags if config.no_comment => Ok(()),
                PackageStep::Description => self.writer.add_description(),
                PackageStep::Tags => self.writer.add_tags(),
                PackageStep::Footer => self.writer.add_footer(),
                _ => Ok(()),
            }
        };

        written(result, PageKind::Package, package.id.as_str(), step.name())
    }
}
