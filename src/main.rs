//! formula - Run packaged formulas from the command line
//!
//! ## Commands
//!
//! - `formula run` - Execute an installed formula
//! - `formula paths` - Show the paths and URLs a formula resolves to
//! - `formula completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Run a formula, prompting for its inputs
//! formula run greet/hello --bin 'hello-${so}'
//!
//! # Feed inputs as JSON instead of prompting
//! echo '{"name":"dennis"}' | formula run greet/hello --stdin
//!
//! # Inspect where a formula is expected to live
//! formula paths greet/hello
//!
//! # Generate shell completions
//! formula completions bash > /etc/bash_completion.d/formula
//! ```
//!
//! Set `FORMULA_HOME` to change the home directory and `FORMULA_LOG` to
//! change the log level.

use formula_runner::FormulaError;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(failure_code(&e))
        }
    }
}

/// Mirrors the formula's own exit code when it has one
fn failure_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FormulaError>() {
        Some(FormulaError::Exit {
            code: Some(code), ..
        }) => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn exit(code: Option<i32>) -> anyhow::Error {
        let err: Result<(), FormulaError> = Err(FormulaError::Exit {
            bin: "run.sh".to_string(),
            code,
        });
        err.context("Formula 'greet/hello' failed").unwrap_err()
    }

    #[test]
    fn test_failure_code_mirrors_formula_exit() {
        assert_eq!(failure_code(&exit(Some(3))), 3);
        assert_eq!(failure_code(&exit(Some(255))), 255);
    }

    #[test]
    fn test_failure_code_falls_back_to_one() {
        assert_eq!(failure_code(&exit(None)), 1);
        assert_eq!(failure_code(&exit(Some(-1))), 1);
        assert_eq!(failure_code(&exit(Some(300))), 1);
        assert_eq!(failure_code(&anyhow::anyhow!("bad flag")), 1);
    }
}
