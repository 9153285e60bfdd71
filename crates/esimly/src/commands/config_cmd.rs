//! Config commands: init, show, path. These never need a session.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = esimly_config::config_path();
            if path.exists() && !global.yes {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!(
                        "{} already exists (re-run with --yes to overwrite)",
                        path.display()
                    ),
                });
            }
            let config = esimly_config::Config::default();
            esimly_config::save_config(&config)?;
            output::notify_success(
                &format!("Wrote starter config to {}", path.display()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let config = esimly_config::load_config_or_default();
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::Other {
                message: format!("failed to render config: {e}"),
            })?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &esimly_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }
    }
}
