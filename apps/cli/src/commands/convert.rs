use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fc_core::descriptor::ConverterDescriptor;
use fc_core::manager::ConverterManager;

#[derive(Parser, Debug)]
pub struct ConvertCommand {
    /// Path to the input file
    pub input: PathBuf,
    /// Path to the output file
    pub output: PathBuf,
    /// Target format when the output path has no extension
    #[arg(long)]
    pub to: Option<String>,
    /// Overwrite the output file if it already exists
    #[arg(short, long)]
    pub force: bool,
    /// Converter options as key=value pairs (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

impl ConvertCommand {
    pub async fn execute(self, manager: &ConverterManager) -> Result<()> {
        let source_format = extension_tag(&self.input)
            .context("input file has no extension to derive a source format from")?;

        // The output extension decides the target format; without one
        // the caller must say what to produce via --to.
        let target_format = match (extension_tag(&self.output), &self.to) {
            (Some(ext), Some(to)) if !to.eq_ignore_ascii_case(&ext) => {
                bail!("--to {to} conflicts with the output extension .{ext}");
            }
            (Some(ext), _) => ext,
            (None, Some(to)) => to.to_lowercase(),
            (None, None) => {
                bail!("output file has no extension; pass --to <format>");
            }
        };

        if self.output.exists() && !self.force {
            bail!(
                "output file {} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        let Some(converter) = manager.get_converter(&source_format, &target_format).await else {
            bail!(
                "no converter found for {source_format} -> {target_format}; use \"fc list\" to see available converters"
            );
        };

        let options = resolve_options(&converter, &self.options)?;

        cliclack::log::info(format!(
            "Converting {} to {} using {}",
            self.input.display(),
            self.output.display(),
            console::style(&converter.name).bold()
        ))?;

        if converter.convert(&self.input, &self.output, &options)? {
            cliclack::log::success("Conversion successful")?;
            Ok(())
        } else {
            bail!("conversion failed");
        }
    }
}

/// Lower-cased extension without the leading dot, if any.
fn extension_tag(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| !e.is_empty())
}

/// Parse key=value pairs, check the converter's declared required
/// options and fill in declared defaults for absent ones.
fn resolve_options(
    converter: &ConverterDescriptor,
    raw: &[String],
) -> Result<BTreeMap<String, String>> {
    let mut options: BTreeMap<String, String> = raw
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("invalid option \"{pair}\" (expected key=value)"))
        })
        .collect::<Result<_>>()?;

    for (name, declared) in &converter.options {
        if options.contains_key(name) {
            continue;
        }
        if declared.required {
            bail!("converter \"{}\" requires option --{name}", converter.name);
        }
        if let Some(default) = &declared.default {
            let value = match default {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            options.insert(name.clone(), value);
        }
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::descriptor::ConverterOption;

    fn converter_with_options(options: &[(&str, bool, Option<serde_json::Value>)]) -> ConverterDescriptor {
        ConverterDescriptor {
            name: "test".to_string(),
            description: String::new(),
            source_formats: vec!["json".to_string()],
            target_formats: vec!["yaml".to_string()],
            entry: PathBuf::from("/nonexistent"),
            options: options
                .iter()
                .map(|(name, required, default)| {
                    (
                        name.to_string(),
                        ConverterOption {
                            description: String::new(),
                            required: *required,
                            default: default.clone(),
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_extension_tag_is_lowercased() {
        assert_eq!(extension_tag(Path::new("a/b.JSON")), Some("json".to_string()));
        assert_eq!(extension_tag(Path::new("a/b.yaml")), Some("yaml".to_string()));
        assert_eq!(extension_tag(Path::new("a/noext")), None);
    }

    #[test]
    fn test_resolve_options_parses_pairs() {
        let converter = converter_with_options(&[]);
        let options =
            resolve_options(&converter, &["indent=4".to_string(), "mode=fast".to_string()])
                .unwrap();
        assert_eq!(options.get("indent").map(String::as_str), Some("4"));
        assert_eq!(options.get("mode").map(String::as_str), Some("fast"));

        assert!(resolve_options(&converter, &["broken".to_string()]).is_err());
    }

    #[test]
    fn test_resolve_options_enforces_required_and_applies_defaults() {
        let converter = converter_with_options(&[
            ("level", true, None),
            ("indent", false, Some(serde_json::json!(2))),
        ]);

        let err = resolve_options(&converter, &[]).unwrap_err();
        assert!(err.to_string().contains("--level"));

        let options = resolve_options(&converter, &["level=high".to_string()]).unwrap();
        assert_eq!(options.get("indent").map(String::as_str), Some("2"));
    }
}
