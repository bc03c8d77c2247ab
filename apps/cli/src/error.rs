use fc_core::error::ConverterError;

/// Render a failure to stderr with a themed, actionable suggestion.
/// Full cause detail is only shown in debug mode.
pub fn render(err: &anyhow::Error) {
    eprintln!("\n{} {}", console::style("Error:").red().bold(), err);

    if let Some(s) = suggestion(err) {
        eprintln!("{} {}", console::style("  help:").dim(), s);
    }

    if std::env::var_os(fc_core::config::DEBUG_ENV).is_some() {
        for cause in err.chain().skip(1) {
            eprintln!("{} {}", console::style("  cause:").dim(), cause);
        }
    }
}

fn suggestion(err: &anyhow::Error) -> Option<String> {
    match err.downcast_ref::<ConverterError>()? {
        ConverterError::AlreadyInstalled { name } => Some(format!(
            "Remove it first with \"fc remove {name}\" if you want to reinstall."
        )),
        ConverterError::NotFound { .. } => {
            Some("Use \"fc list\" to see installed converters.".to_string())
        }
        ConverterError::CorruptRegistry { path, .. } => Some(format!(
            "Fix or delete {} and run fc again.",
            path.display()
        )),
        ConverterError::FetchFailed { .. } => {
            Some("Check that the URL points to a reachable git repository.".to_string())
        }
        ConverterError::SchemaInvalid { .. } => Some(
            "The converter's build output is missing or malformed; contact its author.".to_string(),
        ),
        _ => None,
    }
}
