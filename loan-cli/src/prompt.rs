//! Interactive loan calculator.
//!
//! One command per line; see [`HELP`]. Inputs are only read when `calc` runs,
//! so fields can be set in any order. History lives for the length of the
//! prompt.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};

use loan_core::export::calculation_report_file_name;
use loan_core::{CalculatorSession, RecordId};

use crate::logging;
use crate::render;
use crate::utils::{parse_amount, parse_count};

pub const HELP: &str = "\
Commands:
  amount <value>     loan amount, e.g. 1,00,000
  rate <percent>     annual interest rate
  years <n>          term in years
  months <n>         extra months on top of the years
  calc               calculate and save to history
  show               current inputs and result
  schedule           monthly breakdown of the selected calculation
  history            past calculations, most recent first
  load <n>           restore calculation n from history
  delete <n>         remove calculation n from history
  reset              clear inputs and result (history is kept)
  report [path]      save the selected calculation as a text report
  log <level>        change the log filter, e.g. debug
  help               this text
  quit               leave the calculator";

/// What the caller should do after a line has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    Quit,
}

#[derive(Debug, Default)]
pub struct CalculatorPrompt {
    session: CalculatorSession,
}

impl CalculatorPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &CalculatorSession {
        &self.session
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> Result<()> {
        writeln!(output, "Loan calculator. Type 'help' for commands.")?;
        write!(output, "> ")?;
        output.flush()?;

        for line in input.lines() {
            let line = line.context("failed to read input")?;
            match self.handle_line(&line) {
                Step::Quit => return Ok(()),
                Step::Continue(text) if text.is_empty() => {}
                Step::Continue(text) => writeln!(output, "{text}")?,
            }
            write!(output, "> ")?;
            output.flush()?;
        }
        writeln!(output)?;
        Ok(())
    }

    pub fn handle_line(
        &mut self,
        line: &str,
    ) -> Step {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Step::Continue(String::new());
        };
        let arg = words.collect::<Vec<_>>().join(" ");
        debug!(command, arg = %arg, "calculator command");

        let reply = match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => return Step::Quit,
            "help" | "?" => Ok(HELP.to_string()),
            "amount" => self.set_amount(&arg),
            "rate" => self.set_rate(&arg),
            "years" => self.set_years(&arg),
            "months" => self.set_months(&arg),
            "calc" | "calculate" => Ok(self.calculate()),
            "show" => Ok(self.show()),
            "schedule" => Ok(render::schedule(self.session.amortization_schedule())),
            "history" => Ok(render::history(
                self.session.history().records(),
                self.session.history().selected_id(),
            )),
            "load" => self.load(&arg),
            "delete" => self.delete(&arg),
            "reset" => {
                self.session.reset();
                Ok("Calculator reset.".to_string())
            }
            "report" => self.report(&arg),
            "log" => logging::set_log_level(&arg).map(|()| format!("Log level set to '{arg}'.")),
            other => Ok(format!("Unknown command '{other}'. Type 'help' for commands.")),
        };

        Step::Continue(reply.unwrap_or_else(|e| format!("Error: {e:#}")))
    }

    fn set_amount(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        self.session.form.principal = parse_amount(arg)?;
        Ok(String::new())
    }

    fn set_rate(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        self.session.form.annual_rate_percent = parse_amount(arg)?;
        Ok(String::new())
    }

    fn set_years(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        self.session.form.term_years = parse_count(arg)?;
        Ok(String::new())
    }

    fn set_months(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        self.session.form.term_extra_months = parse_count(arg)?;
        Ok(String::new())
    }

    fn calculate(&mut self) -> String {
        match self.session.calculate() {
            Some(record) => render::result_summary(&record.terms, &record.result),
            None => render::NOT_READY.to_string(),
        }
    }

    fn show(&self) -> String {
        let form = &self.session.form;
        let inputs = format!(
            "Inputs: amount {}, rate {}%, term {} ({} months)",
            form.principal,
            form.annual_rate_percent,
            self.session.term_display(),
            self.session.total_months(),
        );
        // the result belongs to the selected record, not to later edits
        let terms = self.session.selected().map_or(form, |record| &record.terms);
        match self.session.result() {
            Some(result) => format!("{inputs}\n{}", render::result_summary(terms, result)),
            None => format!("{inputs}\nNo result yet."),
        }
    }

    /// Maps a 1-based history position to the record id shown there.
    fn history_id(
        &self,
        arg: &str,
    ) -> Result<RecordId> {
        let n = parse_count(arg)? as usize;
        let records = self.session.history().records();
        n.checked_sub(1)
            .and_then(|i| records.get(i))
            .map(|record| record.id)
            .with_context(|| format!("no calculation numbered {n}; see 'history'"))
    }

    fn load(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        let id = self.history_id(arg)?;
        self.session.load(id);
        Ok(self.show())
    }

    fn delete(
        &mut self,
        arg: &str,
    ) -> Result<String> {
        let id = self.history_id(arg)?;
        self.session.delete(id);
        Ok("Calculation deleted.".to_string())
    }

    fn report(
        &self,
        arg: &str,
    ) -> Result<String> {
        let text = self.session.report()?;
        let path = if arg.is_empty() {
            PathBuf::from(calculation_report_file_name(Local::now().date_naive()))
        } else {
            PathBuf::from(arg)
        };
        std::fs::write(&path, text)
            .with_context(|| format!("cannot write report to '{}'", path.display()))?;
        info!(path = %path.display(), "calculation report saved");
        Ok(format!("Report saved to {}", path.display()))
    }
}
