//! Constant field values, across the whole run.

use std::collections::HashSet;

use crate::context::BuildContext;
use crate::entity::{DocSet, MemberElement, PackageElement, PackageId};
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::ConstantsSummaryWriter;

use super::{run_layout, written, LayoutStep};

pub(crate) const ENTITY: &str = "constant field values";

layout_steps! {
    pub(crate) enum ConstantsStep {
        Header => "header",
        Contents => "contents",
        ConstantSummaries => "constantSummaries",
        Footer => "footer",
    }
}

layout_steps! {
    /// Steps run once per package that declares constants.
    pub(crate) enum ConstantsPackageStep {
        PackageHeader => "packageHeader",
        ClassConstants => "classConstants",
    }
}

pub(crate) struct ConstantsSummaryBuilder<'a> {
    context: &'a BuildContext<'a>,
    docs: &'a DocSet,
    writer: Box<dyn ConstantsSummaryWriter + 'a>,
    printed_package_headers: HashSet<PackageId>,
}

impl<'a> ConstantsSummaryBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        docs: &'a DocSet,
        writer: Box<dyn ConstantsSummaryWriter + 'a>,
    ) -> Self {
        Self {
            context,
            docs,
            writer,
            printed_package_headers: HashSet::new(),
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        run_layout(self.context, PageKind::ConstantsSummary, ENTITY, |step| {
            self.build_step(step)
        })?;
        written(
            self.writer.print_document(),
            PageKind::ConstantsSummary,
            ENTITY,
            "printDocument",
        )
    }

    fn packages(&self) -> impl Iterator<Item = &'a PackageElement> {
        self.docs.packages.iter().filter(|p| p.has_constants())
    }

    fn build_step(&mut self, step: ConstantsStep) -> Result<()> {
        let result = match step {
            ConstantsStep::Header => self.writer.add_header(),
            ConstantsStep::Contents => {
                let mut ids: Vec<&PackageId> = Vec::new();
                for package in self.packages() {
                    if !ids.contains(&&package.id) {
                        ids.push(&package.id);
                    }
                }
                self.writer.add_contents(&ids)
            }
            ConstantsStep::ConstantSummaries => {
                let context = self.context;
                let packages: Vec<&'a PackageElement> = self.packages().collect();
                for package in packages {
                    run_layout(context, PageKind::ConstantsPackage, package.id.as_str(), |step| {
                        self.build_package_step(package, step)
                    })?;
                }
                Ok(())
            }
            ConstantsStep::Footer => self.writer.add_footer(),
        };

        written(result, PageKind::ConstantsSummary, ENTITY, step.name())
    }

    fn build_package_step(
        &mut self,
        package: &'a PackageElement,
        step: ConstantsPackageStep,
    ) -> Result<()> {
        let result = match step {
            ConstantsPackageStep::PackageHeader => {
                // one header per package name, even when split across modules
                if self.printed_package_headers.insert(package.id.clone()) {
                    self.writer.add_package_header(&package.id)
                } else {
                    Ok(())
                }
            }
            ConstantsPackageStep::ClassConstants => {
                for ty in &package.types {
                    let fields: Vec<&MemberElement> = ty.constant_fields().collect();
                    if fields.is_empty() {
                        continue;
                    }
                    written(
                        self.writer.add_class_constants(ty, &fields),
                        PageKind::ConstantsPackage,
                        &ty.qualified_name(),
                        step.name(),
                    )?;
                }
                Ok(())
            }
        };

        written(result, PageKind::ConstantsPackage, package.id.as_str(), step.name())
    }
}
