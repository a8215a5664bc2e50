//! Command dispatch and per-command handlers

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::ReportFormat;
use crate::cli::args::{ApproximatorArgs, Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::parse_value;
use crate::infrastructure::di::ServiceContainer;

/// Dispatch the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Root {
            value,
            approximator,
        }) => {
            let settings = load_settings(cli.config.as_deref(), approximator)?;
            settings.validate()?;
            cmd_root(&ServiceContainer::new(settings), value)
        }
        Some(Commands::Bench {
            max_digits,
            repetitions,
            export,
            format,
            approximator,
        }) => {
            let mut settings = load_settings(cli.config.as_deref(), approximator)?;
            if let Some(d) = max_digits {
                settings.bench.max_digits = *d;
            }
            if let Some(r) = repetitions {
                settings.bench.repetitions = *r;
            }
            if let Some(path) = export {
                settings.bench.export = Some(path.clone());
            }
            if let Some(f) = format {
                if settings.bench.export.is_none() {
                    return Err(CliError::InvalidArgs(
                        "--format needs --export or bench.export".into(),
                    ));
                }
                settings.bench.format = *f;
            }
            settings.validate()?;
            cmd_bench(&ServiceContainer::new(settings), format.is_some())
        }
        Some(Commands::Config { command }) => {
            let settings = Settings::load(cli.config.as_deref())?;
            cmd_config(&settings, command)
        }
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::Usage(
            "no command given, see `rootbench --help`".into(),
        )),
    }
}

/// Load layered settings, then apply approximator flags on top.
/// Validation is left to the caller, after any remaining flags.
fn load_settings(config: Option<&Path>, args: &ApproximatorArgs) -> CliResult<Settings> {
    let mut settings = Settings::load(config)?;
    apply_approximator_args(&mut settings, args);
    debug!("effective settings: {:?}", settings);
    Ok(settings)
}

pub fn apply_approximator_args(settings: &mut Settings, args: &ApproximatorArgs) {
    if let Some(degree) = args.degree {
        settings.approximator.degree = degree;
    }
    if let Some(precision) = args.precision {
        settings.approximator.precision = precision;
    }
    if let Some(max_iterations) = args.max_iterations {
        settings.approximator.max_iterations = max_iterations;
    }
    if args.strict {
        settings.approximator.strict = true;
    }
}

#[instrument(skip(container))]
fn cmd_root(container: &ServiceContainer, value: &str) -> CliResult<()> {
    let n = parse_value(value)?;
    let approximator = container.approximator()?;
    let result = approximator.approximate(n)?;

    output::info(&result.root);
    output::field("steps", &result.steps);
    output::field("termination", &result.termination);
    if !result.termination.is_converged() {
        output::warning(&format!(
            "precision {} not reached for {} ({})",
            approximator.precision(),
            n,
            result.termination
        ));
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_bench(container: &ServiceContainer, format_given: bool) -> CliResult<()> {
    let settings = &container.settings;
    let service = container.benchmark_service()?;
    let report = service.run(settings.bench.max_digits)?;

    let reporter = container.report_service();
    for line in reporter.render_lines(&report) {
        output::info(&line);
    }

    let unconverged = report.unconverged().count();
    if unconverged > 0 {
        output::warning(&format!(
            "{} of {} samples stopped outside precision {}",
            unconverged,
            report.samples.len(),
            report.precision
        ));
    }

    if let Some(path) = &settings.bench.export {
        let format = export_format(path, settings.bench.format, format_given);
        let written = reporter.export(&report, path, format)?;
        output::action("Exported", &written.display());
    }
    Ok(())
}

/// Explicit `--format` wins, then the file extension, then the configured default.
fn export_format(path: &Path, configured: ReportFormat, explicit: bool) -> ReportFormat {
    if explicit {
        return configured;
    }
    ReportFormat::from_extension(path).unwrap_or(configured)
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            settings.validate()?;
            output::info(&settings.to_toml()?)
        }
        ConfigCommands::Path => {
            let path = global_config_path().unwrap_or_else(|| PathBuf::from("(unavailable)"));
            output::info(&path.display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_explicit_format_when_choosing_export_format_then_ignores_extension() {
        let path = Path::new("run.json");
        assert_eq!(
            export_format(path, ReportFormat::Toml, true),
            ReportFormat::Toml
        );
        assert_eq!(
            export_format(path, ReportFormat::Toml, false),
            ReportFormat::Json
        );
        assert_eq!(
            export_format(Path::new("run.dat"), ReportFormat::Json, false),
            ReportFormat::Json
        );
    }

    #[test]
    fn given_approximator_flags_when_applied_then_override_settings() {
        let mut settings = Settings::default();
        let args = ApproximatorArgs {
            degree: Some(5),
            precision: Some(1e-6),
            max_iterations: None,
            strict: true,
        };

        apply_approximator_args(&mut settings, &args);

        assert_eq!(settings.approximator.degree, 5);
        assert_eq!(settings.approximator.precision, 1e-6);
        assert_eq!(settings.approximator.max_iterations, 4096);
        assert!(settings.approximator.strict);
    }
}
