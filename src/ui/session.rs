//! Report session state machine
//!
//! `SelectingReport -> ExecutingReport -> DisplayingResult -> SelectingReport`
//! until the operator quits. Report failures are shown and the session goes
//! back to selection; they never end the loop.

use anyhow::Result;
use tracing::{debug, warn};

use crate::commands::{parse_selection, Selection};
use fundledger::db::RecordSource;
use fundledger::reports::{run_report, QueryParams, ReportKind, ReportOutput};

/// Source of operator input. `None` means end of input.
pub trait Prompt {
    fn next_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Sink for everything the session shows.
pub trait Renderer {
    fn menu(&mut self);
    fn render(&mut self, output: &ReportOutput);
    fn error(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SelectingReport,
    ExecutingReport(ReportKind),
    DisplayingResult(ReportOutput),
    Terminated,
}

pub struct Session<'a, S: RecordSource + ?Sized> {
    source: &'a S,
    params: QueryParams,
    state: SessionState,
}

impl<'a, S: RecordSource + ?Sized> Session<'a, S> {
    pub fn new(source: &'a S, params: QueryParams) -> Self {
        Self {
            source,
            params,
            state: SessionState::SelectingReport,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Advance by one transition.
    pub fn step<P: Prompt, R: Renderer>(&mut self, prompt: &mut P, renderer: &mut R) -> Result<()> {
        let current = std::mem::replace(&mut self.state, SessionState::Terminated);
        self.state = match current {
            SessionState::SelectingReport => match prompt.next_line("report> ")? {
                None => SessionState::Terminated,
                Some(line) => match parse_selection(&line) {
                    Ok(Selection::Report(kind)) => SessionState::ExecutingReport(kind),
                    Ok(Selection::Quit) => SessionState::Terminated,
                    Ok(Selection::Menu) => {
                        renderer.menu();
                        SessionState::SelectingReport
                    }
                    Ok(Selection::Nothing) => SessionState::SelectingReport,
                    Err(e) => {
                        renderer.error(&e.message);
                        SessionState::SelectingReport
                    }
                },
            },
            SessionState::ExecutingReport(kind) => {
                match run_report(self.source, kind, &self.params) {
                    Ok(output) => SessionState::DisplayingResult(output),
                    Err(e) => {
                        warn!(report = kind.id(), "report failed: {}", e);
                        renderer.error(&format!("{} failed: {}", kind.name(), e));
                        SessionState::SelectingReport
                    }
                }
            }
            SessionState::DisplayingResult(output) => {
                renderer.render(&output);
                SessionState::SelectingReport
            }
            SessionState::Terminated => SessionState::Terminated,
        };
        debug!(state = ?self.state, "session transition");
        Ok(())
    }

    /// Loop until the operator quits or input ends.
    pub fn run<P: Prompt, R: Renderer>(&mut self, prompt: &mut P, renderer: &mut R) -> Result<()> {
        while self.state != SessionState::Terminated {
            self.step(prompt, renderer)?;
        }
        Ok(())
    }
}
