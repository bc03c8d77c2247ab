use anyhow::Result;
use clap::Parser;
use fc_core::manager::ConverterManager;

#[derive(Parser, Debug)]
pub struct AddCommand {
    /// Source repository URL of the converter
    pub url: String,
}

impl AddCommand {
    pub async fn execute(self, manager: &ConverterManager) -> Result<()> {
        let spinner = cliclack::spinner();
        spinner.start(format!("Installing converter from {}...", self.url));

        match manager.add_converter(&self.url).await {
            Ok(descriptor) => {
                spinner.stop(format!(
                    "Added converter: {}",
                    console::style(&descriptor.name).bold()
                ));
                Ok(())
            }
            Err(err) => {
                spinner.error("Installation failed");
                Err(err.into())
            }
        }
    }
}
