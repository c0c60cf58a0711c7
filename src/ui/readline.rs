//! Readline wrapper with report-name completion.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Config, Context, Editor, Helper};

use super::session::Prompt;

pub struct SelectionHelper {
    words: Vec<String>,
    hinter: HistoryHinter,
}

impl SelectionHelper {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            hinter: HistoryHinter::default(),
        }
    }

    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|i| i + 1)
            .unwrap_or(0);
        let prefix = before[start..].trim_start_matches('/').to_lowercase();
        let slash = if start == 0 && before.starts_with('/') { "/" } else { "" };

        let matches = self
            .words
            .iter()
            .filter(|w| w.starts_with(&prefix))
            .map(|w| {
                let replacement = format!("{}{} ", slash, w);
                Pair {
                    display: replacement.clone(),
                    replacement,
                }
            })
            .collect();

        (start, matches)
    }
}

impl Helper for SelectionHelper {}
impl Validator for SelectionHelper {}
impl Highlighter for SelectionHelper {}

impl Hinter for SelectionHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Completer for SelectionHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Thin wrapper over `rustyline::Editor` with preset words and history path.
pub struct Readline {
    editor: Editor<SelectionHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl Readline {
    pub fn new(words: &[&str], history_path: PathBuf) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_dups(true)?
            .history_ignore_space(true)
            .build();
        let mut editor = Editor::with_config(config)?;
        editor.set_helper(Some(SelectionHelper::new(words)));

        let _ = editor.load_history(&history_path);

        Ok(Self {
            editor,
            history_path,
        })
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        let line = self.editor.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.editor.add_history_entry(line.as_str());
            let _ = self.editor.append_history(&self.history_path);
        }
        Ok(line)
    }
}

impl Prompt for Readline {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl+C abandons the current line only
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
