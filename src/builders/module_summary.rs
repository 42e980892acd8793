//! Module summary page.

use crate::context::BuildContext;
use crate::entity::ModuleElement;
use crate::error::Result;
use crate::layout::PageKind;
use crate::writer::ModuleSummaryWriter;

use super::{run_layout, written, LayoutStep};

layout_steps! {
    pub(crate) enum ModuleStep {
        Header => "header",
        Description => "description",
        Tags => "tags",
        ModulesSummary => "modulesSummary",
        PackagesSummary => "packagesSummary",
        ServicesSummary => "servicesSummary",
        Footer => "footer",
    }
}

pub(crate) struct ModuleSummaryBuilder<'a> {
    context: &'a BuildContext<'a>,
    module: &'a ModuleElement,
    writer: Box<dyn ModuleSummaryWriter + 'a>,
}

impl<'a> ModuleSummaryBuilder<'a> {
    pub(crate) fn new(
        context: &'a BuildContext<'a>,
        module: &'a ModuleElement,
        writer: Box<dyn ModuleSummaryWriter + 'a>,
    ) -> Self {
        Self {
            context,
            module,
            writer,
        }
    }

    pub(crate) fn build(&mut self) -> Result<()> {
        let module = self.module;
        run_layout(self.context, PageKind::Module, &module.name, |step| {
            self.build_step(step)
        })?;
        written(
            self.writer.print_document(),
            PageKind::Module,
            &module.name,
            "printDocument",
        )
    }

    fn build_step(&mut self, step: ModuleStep) -> Result<()> {
        let module = self.module;
        let no_comment = self.context.config().no_comment;

        let result = match step {
            ModuleStep::Header => self.writer.add_header(),
            ModuleStep::Description if no_comment => Ok(()),
            ModuleStep::Description => self.writer.add_description(),
            ModuleStep::Tags if no_comment => Ok(()),
            ModuleStep::Tags => self.writer.add_tags(),
            ModuleStep::ModulesSummary if module.requires.is_empty() => Ok(()),
            ModuleStep::ModulesSummary => self.writer.add_modules_summary(&module.requires),
            ModuleStep::PackagesSummary if module.exports.is_empty() => Ok(()),
            ModuleStep::PackagesSummary => self.writer.add_packages_summary(&module.exports),
            ModuleStep::ServicesSummary if module.uses.is_empty() && module.provides.is_empty() => {
                Ok(())
            }
            ModuleStep::ServicesSummary => {
                self.writer
                    .add_services_summary(&module.uses, &module.provides)
            }
            ModuleStep::Footer => self.writer.add_footer(),
        };

        written(result, PageKind::Module, &module.name, step.name())
    }
}
