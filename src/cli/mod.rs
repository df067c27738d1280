//! CLI for the formula runner
//!
//! - `run`: Execute an installed formula
//! - `paths`: Show where a formula resolves to
//! - `completions`: Generate shell completions

pub mod completions;
pub mod paths;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use formula_runner::executor::native_runner;
use formula_runner::infrastructure::{self, Config};
use formula_runner::session::{SessionManager, TeamValidator, Validator};
use formula_runner::{ContainerRuntime, Definition, FormulaError, InputType, Runner, Validate};
use std::path::PathBuf;

pub(crate) const BIN_NAME: &str = "formula";

/// CLI arguments for formula
#[derive(Parser, Debug)]
#[command(name = "formula")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Formula home directory (defaults to $FORMULA_HOME or ~/.formula)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Log level (defaults to $FORMULA_LOG or info)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute an installed formula
    Run {
        #[command(flatten)]
        definition: DefinitionArgs,
        /// Read inputs as a JSON object from stdin instead of prompting
        #[arg(long)]
        stdin: bool,
        /// Runtime used to remove the formula's container, if it ran in one
        #[arg(long, value_enum, default_value_t = RuntimeArg::Docker)]
        container_runtime: RuntimeArg,
    },

    /// Show the paths and URLs a formula resolves to
    Paths {
        #[command(flatten)]
        definition: DefinitionArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Flags describing a formula definition
#[derive(ClapArgs, Debug)]
struct DefinitionArgs {
    /// Formula path, e.g. `greet/hello`
    path: String,
    /// Binary name; `${so}` is replaced by the platform
    #[arg(long, default_value = "run.sh")]
    bin: String,
    /// Linux binary override
    #[arg(long, default_value = "")]
    linux_bin: String,
    /// macOS binary override
    #[arg(long, default_value = "")]
    mac_bin: String,
    /// Windows binary override
    #[arg(long, default_value = "")]
    windows_bin: String,
    /// Bundle archive name
    #[arg(long, default_value = "")]
    bundle: String,
    /// Config file name
    #[arg(long, default_value = "")]
    config: String,
    /// Repository base URL
    #[arg(long, default_value = "")]
    repo_url: String,
    /// Repository name
    #[arg(long, default_value = "")]
    repo_name: String,
}

impl DefinitionArgs {
    fn into_definition(self) -> Definition {
        Definition {
            path: self.path,
            bin: self.bin,
            linux_bin: self.linux_bin,
            mac_bin: self.mac_bin,
            windows_bin: self.windows_bin,
            bundle: self.bundle,
            config: self.config,
            repo_url: self.repo_url,
            repo_name: self.repo_name,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum RuntimeArg {
    Docker,
    Podman,
}

impl From<RuntimeArg> for ContainerRuntime {
    fn from(arg: RuntimeArg) -> Self {
        match arg {
            RuntimeArg::Docker => ContainerRuntime::Docker,
            RuntimeArg::Podman => ContainerRuntime::Podman,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(home) = args.home {
        config.home = home;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    infrastructure::init_logging(&config.log_level);

    match args.command {
        Command::Run {
            definition,
            stdin,
            container_runtime,
        } => {
            let def = definition.into_definition();
            def.validate()?;

            if config.team {
                TeamValidator::new(SessionManager::new(&config.home))
                    .validate()
                    .context("Team session check failed")?;
            }

            let input_type = if stdin {
                InputType::Stdin
            } else {
                InputType::Prompt
            };
            let runner = native_runner(config.layout(), container_runtime.into());
            finish_run(&def, runner.run(&def, input_type))?;
        }
        Command::Paths { definition } => {
            let def = definition.into_definition();
            def.validate()?;

            let resolved = paths::ResolvedPaths::resolve(&def, &config.layout());
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
                ShellArg::Elvish => Shell::Elvish,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, &output_path)?;
            } else {
                println!("{}", completions);
            }
        }
    }

    Ok(())
}

/// Turns a run outcome into the command result
///
/// Cleanup failures happen after the formula succeeded and only warn.
fn finish_run(def: &Definition, outcome: Result<(), FormulaError>) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) if e.is_cleanup() => {
            tracing::warn!(formula = %def, error = %e, "Formula succeeded but cleanup failed");
            eprintln!("Warning: {e}");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("Formula '{def}' failed")),
    }
}
