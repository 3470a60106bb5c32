use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::Cli;
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    if let Some(shell) = cli.generator {
        return _completion(shell);
    }

    let settings = load_settings(cli)?;
    if cli.show_config {
        output::info(&settings.to_toml()?);
        return Ok(());
    }

    match (&cli.inp_dir, &cli.output) {
        (Some(inp_dir), Some(output_base)) => {
            _preprocess(settings, inp_dir, output_base, cli.print_tree)
        }
        _ => Err(CliError::Usage(
            "both --output and an input directory are required".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = match &cli.config {
        Some(path) => Settings::load_file(path)?,
        None => Settings::load(cli.inp_dir.as_deref().filter(|dir| dir.is_dir()))?,
    };
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(settings))]
fn _preprocess(
    settings: Settings,
    inp_dir: &Path,
    output_base: &Path,
    print_tree: bool,
) -> CliResult<()> {
    let container = ServiceContainer::new(settings);
    let result = container.preprocess_service().run(inp_dir, output_base)?;

    if result.tests == 0 {
        output::warning("no tests listed, output contains only the structure");
    }
    output::success(&format!(
        "{} rooms, {} tests",
        result.structure.len(),
        result.tests
    ));
    output::success_detail(&result.paths.input.display());
    output::success_detail(&result.paths.expected.display());
    output::detail(&format!(
        "{} input lines, {} expected-only lines, {} skipped",
        result.stats.input_lines, result.stats.annotation_lines, result.stats.skipped_lines
    ));

    if print_tree {
        output::info(&result.structure.to_tree_string());
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
