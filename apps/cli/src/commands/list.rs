use anyhow::Result;
use clap::Parser;
use fc_core::manager::ConverterManager;

#[derive(Parser, Debug)]
pub struct ListCommand {}

impl ListCommand {
    pub async fn execute(self, manager: &ConverterManager) -> Result<()> {
        let converters = manager.list_converters().await;

        if converters.is_empty() {
            cliclack::log::info("No converters installed.")?;
            cliclack::log::info("Use \"fc add <url>\" to add a new converter.")?;
            return Ok(());
        }

        println!("Available converters:");
        for converter in converters {
            println!(
                "  {}  {}",
                console::style(&converter.name).bold(),
                console::style(&converter.description).dim()
            );
            println!("      {}", converter.formats.join(", "));
        }

        Ok(())
    }
}
