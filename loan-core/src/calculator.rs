//! State of the loan calculator view.
//!
//! The session holds what the borrower typed, the result currently on
//! display, and the calculation history. Nothing here is persisted.

use crate::calculations::{AmortizationEngine, Computation};
use crate::export::{self, ReportError};
use crate::history::CalculationHistory;
use crate::models::{AmortizationResult, CalculationRecord, LoanTerms, PaymentRow, RecordId};

#[derive(Debug, Clone, Default)]
pub struct CalculatorSession {
    /// Form inputs. Edited freely; only read by [`CalculatorSession::calculate`].
    pub form: LoanTerms,
    displayed: Option<AmortizationResult>,
    history: CalculationHistory,
    engine: AmortizationEngine,
}

impl CalculatorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the calculation for the current form.
    ///
    /// On success the result is displayed, recorded in history and selected.
    /// When the form is incomplete nothing changes and `None` is returned.
    pub fn calculate(&mut self) -> Option<&CalculationRecord> {
        match self.engine.compute(&self.form) {
            Computation::Ready(result) => {
                self.displayed = Some(result.clone());
                Some(self.history.record(self.form, result))
            }
            Computation::NotReady(_) => None,
        }
    }

    /// Clears the form, the displayed result and the selection.
    /// History is kept.
    pub fn reset(&mut self) {
        self.form = LoanTerms::default();
        self.displayed = None;
        self.history.clear_selection();
    }

    /// Restores a past calculation into the form and display.
    /// Returns `false` when no record has that id.
    pub fn load(
        &mut self,
        id: RecordId,
    ) -> bool {
        let Some(record) = self.history.select(id) else {
            return false;
        };
        self.form = record.terms;
        self.displayed = Some(record.result.clone());
        true
    }

    /// Deletes a past calculation. Returns `false` when no record has that id.
    pub fn delete(
        &mut self,
        id: RecordId,
    ) -> bool {
        self.history.remove(id)
    }

    /// The result on display, if any.
    pub fn result(&self) -> Option<&AmortizationResult> {
        self.displayed.as_ref()
    }

    pub fn history(&self) -> &CalculationHistory {
        &self.history
    }

    pub fn selected(&self) -> Option<&CalculationRecord> {
        self.history.selected()
    }

    /// Schedule of the selected calculation; empty when nothing is selected.
    pub fn amortization_schedule(&self) -> &[PaymentRow] {
        self.history
            .selected()
            .map(|record| record.result.schedule.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_months(&self) -> u32 {
        self.form.term_months()
    }

    pub fn term_display(&self) -> String {
        self.form.term_display()
    }

    /// Plain-text report of the selected calculation.
    ///
    /// # Errors
    ///
    /// [`ReportError::NothingSelected`] when no calculation is selected.
    pub fn report(&self) -> Result<String, ReportError> {
        let record = self.history.selected().ok_or(ReportError::NothingSelected)?;
        Ok(export::calculation_report(record))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session_with(
        principal: f64,
        rate: f64,
        years: u32,
        months: u32,
    ) -> CalculatorSession {
        let mut session = CalculatorSession::new();
        session.form = LoanTerms::from_years_months(principal, rate, years, months);
        session
    }

    #[test]
    fn new_session_shows_nothing() {
        let session = CalculatorSession::new();

        assert!(session.result().is_none());
        assert!(session.history().is_empty());
        assert!(session.selected().is_none());
        assert_eq!(session.form, LoanTerms::default());
    }

    #[test]
    fn calculate_displays_and_records() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);

        assert!(session.calculate().is_some());

        let result = session.result().unwrap();
        assert!(result.monthly_payment > 0.0);
        assert!(result.total_amount > 100_000.0);
        assert_eq!(session.history().len(), 1);
        assert!(session.selected().is_some());
    }

    #[test]
    fn invalid_form_leaves_previous_display_untouched() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        session.calculate();
        let before = session.result().cloned();

        session.form.principal = 0.0;
        assert!(session.calculate().is_none());

        assert_eq!(session.result().cloned(), before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn invalid_form_on_fresh_session_shows_nothing() {
        let mut session = session_with(100_000.0, 0.0, 5, 0);

        assert!(session.calculate().is_none());
        assert!(session.result().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn zero_term_is_not_calculated() {
        let mut session = session_with(100_000.0, 10.0, 0, 0);

        assert!(session.calculate().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn reset_clears_form_display_and_selection_but_keeps_history() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        session.calculate();

        session.reset();

        assert_eq!(session.form, LoanTerms::default());
        assert!(session.result().is_none());
        assert!(session.selected().is_none());
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn load_restores_form_and_result() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        let first = session.calculate().unwrap().id;
        session.form = LoanTerms::from_years_months(50_000.0, 8.0, 2, 6);
        session.calculate();

        assert!(session.load(first));

        assert_eq!(session.form, LoanTerms::from_years_months(100_000.0, 10.0, 5, 0));
        assert!((session.result().unwrap().monthly_payment - 2124.70).abs() < 0.01);
        assert_eq!(session.selected().map(|r| r.id), Some(first));
    }

    #[test]
    fn load_unknown_id_changes_nothing() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        session.calculate();
        let before = session.result().cloned();

        assert!(!session.load(RecordId::new_v4()));
        assert_eq!(session.result().cloned(), before);
    }

    #[test]
    fn deleting_selected_calculation_clears_selection() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        let id = session.calculate().unwrap().id;

        assert!(session.delete(id));

        assert!(session.selected().is_none());
        assert!(session.history().is_empty());
    }

    #[test]
    fn deleting_other_calculation_keeps_selection() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        let older = session.calculate().unwrap().id;
        session.form.principal = 200_000.0;
        let newer = session.calculate().unwrap().id;

        assert!(session.delete(older));

        assert_eq!(session.selected().map(|r| r.id), Some(newer));
    }

    #[test]
    fn schedule_follows_selection() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        assert!(session.amortization_schedule().is_empty());

        session.calculate();
        assert_eq!(session.amortization_schedule().len(), 60);

        session.reset();
        assert!(session.amortization_schedule().is_empty());
    }

    #[test]
    fn twelve_calculations_keep_ten() {
        let mut session = session_with(1_000.0, 10.0, 1, 0);
        for i in 1..=12 {
            session.form.principal = f64::from(i) * 1_000.0;
            session.calculate();
        }

        assert_eq!(session.history().len(), 10);
        assert_eq!(session.history().records()[0].terms.principal, 12_000.0);
    }

    #[test]
    fn term_helpers_read_the_form() {
        let session = session_with(1_000.0, 10.0, 2, 6);

        assert_eq!(session.total_months(), 30);
        assert_eq!(session.term_display(), "2 years 6 months");
    }

    #[test]
    fn report_requires_selection() {
        let session = CalculatorSession::new();

        assert!(matches!(session.report(), Err(ReportError::NothingSelected)));
    }

    #[test]
    fn report_describes_selected_calculation() {
        let mut session = session_with(100_000.0, 10.0, 5, 0);
        session.calculate();

        let report = session.report().unwrap();

        assert!(report.contains("LOAN CALCULATION REPORT"));
        assert!(report.contains("- Loan Amount: ₹1,00,000"));
        assert!(report.contains("- Total Payments: 60 months"));
    }
}
