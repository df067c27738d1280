//! Environment-based input runner
//!
//! Every formula receives its inputs as environment variables named after the
//! input, upper-cased (`who` becomes `WHO`), next to two fixed variables:
//!
//! | Variable | Value |
//! |----------|-------|
//! | `PWD` | Directory the user invoked the formula from |
//! | `COMMAND` | The formula's command line from its config |
//!
//! Values are either typed on the terminal ([`InputType::Prompt`]) or read as
//! one JSON object from standard input ([`InputType::Stdin`]):
//!
//! ```bash
//! echo '{"who": "world", "loud": true}' | formula run greet/hello --stdin
//! ```

use super::cache::{cache_path, load_cached, store_cached};
use super::traits::InputRunner;
use crate::formula::{FormulaError, Input, InputKind, InputType, Setup};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::process::Command;

/// Variable carrying the caller's working directory
pub const PWD_ENV: &str = "PWD";

/// Variable carrying the formula command
pub const COMMAND_ENV: &str = "COMMAND";

/// Asks the user for input values
#[allow(clippy::missing_errors_doc)]
pub trait Prompter: Send + Sync {
    /// Returns true if the user can actually be asked
    fn is_interactive(&self) -> bool;

    /// Free text; an empty answer yields `default` when there is one
    fn text(&self, label: &str, default: Option<&str>) -> io::Result<String>;

    /// Free text that is not echoed back
    fn password(&self, label: &str) -> io::Result<String>;

    /// One of `items`
    fn choose(&self, label: &str, items: &[String]) -> io::Result<String>;

    /// Yes or no
    fn confirm(&self, label: &str, default: Option<bool>) -> io::Result<bool>;
}

/// Line-based prompter on the process terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn ask(label: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{label}")?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_hidden(label: &str) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        write!(stderr, "{label}")?;
        stderr.flush()?;

        // raw mode turns echo off; it must be restored whatever happens
        terminal::enable_raw_mode()?;
        let secret = read_secret(std::iter::from_fn(|| loop {
            match event::read() {
                Ok(Event::Key(key)) => return Some(Ok(key)),
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }
        }));
        let restored = terminal::disable_raw_mode();
        writeln!(stderr)?;

        let secret = secret?;
        restored?;
        Ok(secret)
    }
}

/// Collects key presses into a line until Enter, honoring Backspace
///
/// Ctrl+C and Esc abort with [`io::ErrorKind::Interrupted`].
fn read_secret(keys: impl Iterator<Item = io::Result<KeyEvent>>) -> io::Result<String> {
    let mut secret = String::new();
    for key in keys {
        let key = key?;
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Esc => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input ended before Enter"))
}

impl Prompter for TerminalPrompter {
    fn is_interactive(&self) -> bool {
        io::stdin().is_terminal()
    }

    fn text(&self, label: &str, default: Option<&str>) -> io::Result<String> {
        let prompt = match default {
            Some(default) => format!("{label} [{default}] "),
            None => format!("{label} "),
        };
        let answer = Self::ask(&prompt)?;
        Ok(match default {
            Some(default) if answer.is_empty() => default.to_string(),
            _ => answer,
        })
    }

    fn password(&self, label: &str) -> io::Result<String> {
        Self::ask_hidden(&format!("{label} "))
    }

    fn choose(&self, label: &str, items: &[String]) -> io::Result<String> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "{label}")?;
        for (i, item) in items.iter().enumerate() {
            writeln!(stderr, "  {}) {item}", i + 1)?;
        }
        drop(stderr);

        let answer = Self::ask("> ")?;
        answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| items.get(i))
            .or_else(|| items.iter().find(|item| **item == answer))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("'{answer}' is not an option")))
    }

    fn confirm(&self, label: &str, default: Option<bool>) -> io::Result<bool> {
        let hint = match default {
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
            None => "[y/n]",
        };
        let answer = Self::ask(&format!("{label} {hint} "))?.to_lowercase();
        match (answer.as_str(), default) {
            ("y" | "yes" | "true", _) => Ok(true),
            ("n" | "no" | "false", _) => Ok(false),
            ("", Some(default)) => Ok(default),
            _ => Err(io::Error::new(io::ErrorKind::InvalidInput, format!("'{answer}' is not yes or no"))),
        }
    }
}

/// Input runner exporting each formula input as an environment variable
pub struct EnvInputRunner<P> {
    prompter: P,
    stdin: Mutex<Box<dyn Read + Send>>,
}

impl EnvInputRunner<TerminalPrompter> {
    /// Creates a runner reading from the process terminal and standard input
    #[must_use]
    pub fn terminal() -> Self {
        Self::new(TerminalPrompter)
    }
}

impl<P: Prompter> EnvInputRunner<P> {
    /// Creates a runner that prompts through `prompter`
    #[must_use]
    pub fn new(prompter: P) -> Self {
        Self {
            prompter,
            stdin: Mutex::new(Box::new(io::stdin())),
        }
    }

    /// Replaces the source of [`InputType::Stdin`] values
    #[must_use]
    pub fn with_stdin(mut self, reader: impl Read + Send + 'static) -> Self {
        self.stdin = Mutex::new(Box::new(reader));
        self
    }

    fn read_stdin_values(&self) -> Result<Map<String, Value>, FormulaError> {
        let mut json = String::new();
        self.stdin
            .lock()
            .read_to_string(&mut json)
            .map_err(|e| FormulaError::input("stdin", e))?;

        if json.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&json) {
            Ok(Value::Object(values)) => Ok(values),
            Ok(_) => Err(FormulaError::input("stdin", "expected a JSON object")),
            Err(e) => Err(FormulaError::input("stdin", e)),
        }
    }

    fn stdin_value(input: &Input, values: &Map<String, Value>) -> Result<String, FormulaError> {
        let value = match values.get(&input.name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(_) => {
                return Err(FormulaError::input(&input.name, "expected a string, number or boolean"));
            }
        };

        value
            .or_else(|| input.default_value().map(str::to_string))
            .ok_or_else(|| FormulaError::input(&input.name, "missing from stdin and has no default"))
    }

    fn prompt_value(&self, input: &Input, setup: &Setup) -> Result<String, FormulaError> {
        if !self.prompter.is_interactive() {
            return input
                .default_value()
                .map(str::to_string)
                .ok_or_else(|| FormulaError::input(&input.name, "no terminal to prompt on and no default"));
        }

        let label = if input.label.is_empty() {
            &input.name
        } else {
            &input.label
        };
        let asked = |e: io::Error| FormulaError::input(&input.name, e);

        let value = match input.kind {
            InputKind::Bool => {
                let default = input.default_value().and_then(|d| d.parse().ok());
                self.prompter.confirm(label, default).map_err(asked)?.to_string()
            }
            InputKind::Password => self.prompter.password(label).map_err(asked)?,
            InputKind::Text if input.is_choice() => {
                self.prompter.choose(label, &input.items).map_err(asked)?
            }
            InputKind::Text if input.cache.active => self.cached_text(input, label, setup)?,
            InputKind::Text => self
                .prompter
                .text(label, input.default_value())
                .map_err(asked)?,
        };

        if value.is_empty() {
            return Err(FormulaError::input(&input.name, "a value is required"));
        }
        Ok(value)
    }

    fn cached_text(&self, input: &Input, label: &str, setup: &Setup) -> Result<String, FormulaError> {
        let path = cache_path(setup.formula_path(), input);
        let mut options = load_cached(&path);
        let asked = |e: io::Error| FormulaError::input(&input.name, e);

        let value = if options.is_empty() {
            self.prompter.text(label, input.default_value()).map_err(asked)?
        } else {
            let new_label = input.cache.new_value_label().to_string();
            options.push(new_label.clone());
            let choice = self.prompter.choose(label, &options).map_err(asked)?;
            if choice == new_label {
                self.prompter.text(label, input.default_value()).map_err(asked)?
            } else {
                choice
            }
        };

        if !value.is_empty()
            && let Err(e) = store_cached(&path, &value, input.cache.capacity())
        {
            tracing::warn!(cache = %path.display(), error = %e, "Could not update input cache");
        }
        Ok(value)
    }
}

impl<P: Prompter> InputRunner for EnvInputRunner<P> {
    fn inputs(
        &self,
        cmd: &mut Command,
        setup: &Setup,
        input_type: InputType,
    ) -> Result<(), FormulaError> {
        let config = setup.config();
        cmd.env(PWD_ENV, setup.pwd());
        cmd.env(COMMAND_ENV, &config.command);

        if config.inputs.is_empty() {
            return Ok(());
        }

        let stdin_values = if input_type.is_interactive() {
            None
        } else {
            Some(self.read_stdin_values()?)
        };

        for input in &config.inputs {
            let value = match &stdin_values {
                Some(values) => Self::stdin_value(input, values)?,
                None => self.prompt_value(input, setup)?,
            };
            tracing::debug!(input = %input.name, env = %input.env_name(), "Input attached");
            cmd.env(input.env_name(), value);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{Cache, Config};
    use pretty_assertions::assert_eq;
    use std::collections::{HashMap, VecDeque};
    use tempfile::TempDir;

    /// Prompter answering from a script and recording what it was asked
    #[derive(Default)]
    struct ScriptedPrompter {
        interactive: bool,
        answers: Mutex<VecDeque<String>>,
        choices_seen: Mutex<Vec<Vec<String>>>,
        asked: Mutex<Vec<&'static str>>,
    }

    impl ScriptedPrompter {
        fn answering(answers: &[&str]) -> Self {
            Self {
                interactive: true,
                answers: Mutex::new(answers.iter().map(ToString::to_string).collect()),
                choices_seen: Mutex::new(Vec::new()),
                asked: Mutex::new(Vec::new()),
            }
        }

        fn next(&self) -> io::Result<String> {
            self.answers
                .lock()
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn text(&self, _label: &str, default: Option<&str>) -> io::Result<String> {
            self.asked.lock().push("text");
            let answer = self.next()?;
            Ok(match default {
                Some(d) if answer.is_empty() => d.to_string(),
                _ => answer,
            })
        }

        fn password(&self, _label: &str) -> io::Result<String> {
            self.asked.lock().push("password");
            self.next()
        }

        fn choose(&self, _label: &str, items: &[String]) -> io::Result<String> {
            self.asked.lock().push("choose");
            self.choices_seen.lock().push(items.to_vec());
            self.next()
        }

        fn confirm(&self, _label: &str, _default: Option<bool>) -> io::Result<bool> {
            self.asked.lock().push("confirm");
            Ok(self.next()? == "y")
        }
    }

    fn text(name: &str) -> Input {
        Input {
            name: name.to_string(),
            ..Input::default()
        }
    }

    fn setup_with(formula_path: &std::path::Path, inputs: Vec<Input>) -> Setup {
        Setup::builder()
            .pwd("/work")
            .formula(formula_path, formula_path.join("bin"))
            .config(Config {
                command: "greet hello".to_string(),
                inputs,
                ..Config::default()
            })
            .build()
    }

    fn envs(cmd: &Command) -> HashMap<String, String> {
        cmd.get_envs()
            .filter_map(|(k, v)| {
                Some((k.to_string_lossy().into_owned(), v?.to_string_lossy().into_owned()))
            })
            .collect()
    }

    #[test]
    fn test_fixed_variables_always_set() {
        let dir = TempDir::new().unwrap();
        let runner = EnvInputRunner::new(ScriptedPrompter::default());
        let mut cmd = Command::new("true");

        runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![]), InputType::Prompt)
            .unwrap();

        let envs = envs(&cmd);
        assert_eq!(envs["PWD"], "/work");
        assert_eq!(envs["COMMAND"], "greet hello");
    }

    #[test]
    fn test_stdin_values() {
        let dir = TempDir::new().unwrap();
        let mut greeting = text("greeting");
        greeting.default = "hello".to_string();
        let inputs = vec![text("who"), text("loud"), text("times"), greeting];
        let runner = EnvInputRunner::new(ScriptedPrompter::default())
            .with_stdin(io::Cursor::new(r#"{"who": "world", "loud": true, "times": 3}"#));
        let mut cmd = Command::new("true");

        runner
            .inputs(&mut cmd, &setup_with(dir.path(), inputs), InputType::Stdin)
            .unwrap();

        let envs = envs(&cmd);
        assert_eq!(envs["WHO"], "world");
        assert_eq!(envs["LOUD"], "true");
        assert_eq!(envs["TIMES"], "3");
        assert_eq!(envs["GREETING"], "hello");
    }

    #[test]
    fn test_stdin_missing_value_without_default() {
        let dir = TempDir::new().unwrap();
        let runner = EnvInputRunner::new(ScriptedPrompter::default()).with_stdin(io::Cursor::new("{}"));
        let mut cmd = Command::new("true");

        let err = runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![text("who")]), InputType::Stdin)
            .unwrap_err();

        assert!(matches!(err, FormulaError::Input { ref input, .. } if input == "who"));
    }

    #[test]
    fn test_stdin_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let runner = EnvInputRunner::new(ScriptedPrompter::default()).with_stdin(io::Cursor::new("[1]"));
        let mut cmd = Command::new("true");

        let err = runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![text("who")]), InputType::Stdin)
            .unwrap_err();

        assert!(matches!(err, FormulaError::Input { ref input, .. } if input == "stdin"));
    }

    #[test]
    fn test_prompt_kinds() {
        let dir = TempDir::new().unwrap();
        let loud = Input {
            kind: InputKind::Bool,
            ..text("loud")
        };
        let secret = Input {
            kind: InputKind::Password,
            ..text("secret")
        };
        let color = Input {
            items: vec!["red".to_string(), "blue".to_string()],
            ..text("color")
        };
        let inputs = vec![text("who"), loud, secret, color];
        let runner = EnvInputRunner::new(ScriptedPrompter::answering(&["world", "y", "s3cret", "blue"]));
        let mut cmd = Command::new("true");

        runner
            .inputs(&mut cmd, &setup_with(dir.path(), inputs), InputType::Prompt)
            .unwrap();

        let envs = envs(&cmd);
        assert_eq!(envs["WHO"], "world");
        assert_eq!(envs["LOUD"], "true");
        assert_eq!(envs["SECRET"], "s3cret");
        assert_eq!(envs["COLOR"], "blue");
        assert_eq!(
            *runner.prompter.asked.lock(),
            vec!["text", "confirm", "password", "choose"]
        );
    }

    #[test]
    fn test_password_with_default_is_still_hidden() {
        let dir = TempDir::new().unwrap();
        let token = Input {
            kind: InputKind::Password,
            default: "changeme".to_string(),
            ..text("token")
        };
        let runner = EnvInputRunner::new(ScriptedPrompter::answering(&["t0ken"]));
        let mut cmd = Command::new("true");

        runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![token]), InputType::Prompt)
            .unwrap();

        assert_eq!(envs(&cmd)["TOKEN"], "t0ken");
        assert_eq!(*runner.prompter.asked.lock(), vec!["password"]);
    }

    fn keys(codes: &[KeyCode]) -> impl Iterator<Item = io::Result<KeyEvent>> + '_ {
        codes
            .iter()
            .map(|code| Ok(KeyEvent::new(*code, KeyModifiers::NONE)))
    }

    #[test]
    fn test_read_secret_until_enter() {
        let typed = [
            KeyCode::Char('s'),
            KeyCode::Char('3'),
            KeyCode::Char('x'),
            KeyCode::Backspace,
            KeyCode::Char('c'),
            KeyCode::Enter,
            KeyCode::Char('z'),
        ];
        assert_eq!(read_secret(keys(&typed)).unwrap(), "s3c");
    }

    #[test]
    fn test_read_secret_cancel_and_eof() {
        let ctrl_c: [io::Result<KeyEvent>; 1] =
            [Ok(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))];
        let err = read_secret(ctrl_c.into_iter()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);

        let err = read_secret(keys(&[KeyCode::Esc])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);

        let err = read_secret(keys(&[KeyCode::Char('a')])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_prompt_requires_value() {
        let dir = TempDir::new().unwrap();
        let runner = EnvInputRunner::new(ScriptedPrompter::answering(&[""]));
        let mut cmd = Command::new("true");

        let err = runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![text("who")]), InputType::Prompt)
            .unwrap_err();

        assert!(matches!(err, FormulaError::Input { .. }));
    }

    #[test]
    fn test_non_interactive_prompt_uses_default_or_fails() {
        let dir = TempDir::new().unwrap();
        let mut with_default = text("who");
        with_default.default = "world".to_string();
        let runner = EnvInputRunner::new(ScriptedPrompter::default());

        let mut cmd = Command::new("true");
        runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![with_default]), InputType::Prompt)
            .unwrap();
        assert_eq!(envs(&cmd)["WHO"], "world");

        let mut cmd = Command::new("true");
        let err = runner
            .inputs(&mut cmd, &setup_with(dir.path(), vec![text("who")]), InputType::Prompt)
            .unwrap_err();
        assert!(matches!(err, FormulaError::Input { .. }));
    }

    #[test]
    fn test_cached_input_offers_previous_values() {
        let dir = TempDir::new().unwrap();
        let who = Input {
            cache: Cache {
                active: true,
                qty: 2,
                new_label: "Someone else".to_string(),
            },
            ..text("who")
        };
        let setup = setup_with(dir.path(), vec![who]);

        // first run: empty cache, plain text prompt
        let runner = EnvInputRunner::new(ScriptedPrompter::answering(&["alice"]));
        runner.inputs(&mut Command::new("true"), &setup, InputType::Prompt).unwrap();

        // second run: cache offered, user types a new value
        let prompter = ScriptedPrompter::answering(&["Someone else", "bob"]);
        let runner = EnvInputRunner::new(prompter);
        let mut cmd = Command::new("true");
        runner.inputs(&mut cmd, &setup, InputType::Prompt).unwrap();
        assert_eq!(envs(&cmd)["WHO"], "bob");
        assert_eq!(
            runner.prompter.choices_seen.lock()[0],
            vec!["alice".to_string(), "Someone else".to_string()]
        );

        // third run: pick a cached value
        let runner = EnvInputRunner::new(ScriptedPrompter::answering(&["alice"]));
        let mut cmd = Command::new("true");
        runner.inputs(&mut cmd, &setup, InputType::Prompt).unwrap();
        assert_eq!(envs(&cmd)["WHO"], "alice");
        assert_eq!(
            runner.prompter.choices_seen.lock()[0],
            vec!["bob".to_string(), "alice".to_string(), "Someone else".to_string()]
        );

        assert_eq!(
            load_cached(&dir.path().join(".WHO.cache")),
            vec!["alice".to_string(), "bob".to_string()]
        );
    }
}
