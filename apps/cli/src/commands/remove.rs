use anyhow::Result;
use clap::Parser;
use fc_core::manager::ConverterManager;

#[derive(Parser, Debug)]
pub struct RemoveCommand {
    /// Name of the converter to remove
    pub name: String,
}

impl RemoveCommand {
    pub async fn execute(self, manager: &ConverterManager) -> Result<()> {
        manager.remove_converter(&self.name).await?;
        cliclack::log::success(format!("Removed converter: {}", self.name))?;
        Ok(())
    }
}
