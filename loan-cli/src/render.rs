//! Plain-text tables for terminal output.

use std::fmt::Write;

use chrono::Local;

use loan_core::calculations::common::format_inr;
use loan_core::{
    AmortizationResult, ApplicationStatus, CalculationRecord, EligibleLender, LoanApplication,
    LoanRequestResponse, LoanTerms, MyApplication, PaymentRow, RecordId, RuleResponse,
};

use crate::utils::two_dp;

/// Shown when the calculator inputs cannot be amortized.
pub const NOT_READY: &str =
    "Enter an amount, a rate and a term greater than zero. The term can be at most 100 years.";

pub fn result_summary(
    terms: &LoanTerms,
    result: &AmortizationResult,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Loan Amount:      {}", format_inr(terms.principal));
    let _ = writeln!(out, "Interest Rate:    {}% per annum", terms.annual_rate_percent);
    let _ = writeln!(
        out,
        "Loan Term:        {} ({} months)",
        terms.term_display(),
        result.number_of_payments
    );
    let _ = writeln!(out, "Monthly Payment:  {}", format_inr(result.monthly_payment));
    let _ = writeln!(out, "Total Interest:   {}", format_inr(result.total_interest));
    let _ = write!(out, "Total Amount:     {}", format_inr(result.total_amount));
    out
}

pub fn schedule(rows: &[PaymentRow]) -> String {
    if rows.is_empty() {
        return "No calculation selected.".to_string();
    }
    let mut out = format!(
        "{:>5}  {:>12}  {:>12}  {:>12}  {:>14}",
        "Month", "Payment", "Principal", "Interest", "Balance"
    );
    for row in rows {
        let _ = write!(
            out,
            "\n{:>5}  {:>12}  {:>12}  {:>12}  {:>14}",
            row.month,
            two_dp(row.payment),
            two_dp(row.principal),
            two_dp(row.interest),
            two_dp(row.balance),
        );
    }
    out
}

/// Numbered, most recent first. The selected record is starred.
pub fn history(
    records: &[CalculationRecord],
    selected: Option<RecordId>,
) -> String {
    if records.is_empty() {
        return "No calculations yet.".to_string();
    }
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let marker = if Some(record.id) == selected { '*' } else { ' ' };
            format!(
                "{marker} {:>2}. {} @ {}% for {} -> {}/month  ({})",
                i + 1,
                format_inr(record.terms.principal),
                record.terms.annual_rate_percent,
                record.terms.term_display(),
                format_inr(record.result.monthly_payment),
                record
                    .calculated_at
                    .with_timezone(&Local)
                    .format("%H:%M:%S"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn loan_requests(requests: &[LoanRequestResponse]) -> String {
    if requests.is_empty() {
        return "No loan requests yet.".to_string();
    }
    let mut out = format!(
        "{:>6}  {:>14}  {:<12}  {:<14}  {:>6}  {:>4}  {:>12}",
        "ID", "Amount", "Purpose", "Employment", "Score", "Age", "Salary"
    );
    for r in requests {
        let _ = write!(
            out,
            "\n{:>6}  {:>14}  {:<12}  {:<14}  {:>6}  {:>4}  {:>12}",
            r.id,
            format_inr(r.loan_amount),
            r.loan_purpose,
            r.employment_status,
            r.credit_score,
            r.age,
            format_inr(r.salary),
        );
    }
    out
}

pub fn lenders(lenders: &[EligibleLender]) -> String {
    if lenders.is_empty() {
        return "No eligible lenders found for this request.".to_string();
    }
    let mut out = format!(
        "{:>6}  {:<28}  {:>7}  {:>14}  {:>14}",
        "Rule", "Lender", "Rate %", "Min Amount", "Max Amount"
    );
    for l in lenders {
        let _ = write!(
            out,
            "\n{:>6}  {:<28}  {:>7}  {:>14}  {:>14}",
            l.rule_id,
            l.name,
            two_dp(l.interest_rate),
            format_inr(l.minimum_loan_amount),
            format_inr(l.maximum_loan_amount),
        );
    }
    out
}

pub fn rules(rules: &[RuleResponse]) -> String {
    if rules.is_empty() {
        return "No rules yet.".to_string();
    }
    let mut out = format!(
        "{:>6}  {:>7}  {:>14}  {:>14}  {:>12}  {:>6}  {:>7}  {:<12}  {:<8}",
        "ID", "Rate %", "Min Amount", "Max Amount", "Min Salary", "Score", "Age", "Employment", "Status"
    );
    for r in rules {
        let _ = write!(
            out,
            "\n{:>6}  {:>7}  {:>14}  {:>14}  {:>12}  {:>6}  {:>7}  {:<12}  {:<8}",
            r.id,
            two_dp(r.interest_rate),
            format_inr(r.minimum_loan_amount),
            format_inr(r.maximum_loan_amount),
            format_inr(r.minimum_salary),
            r.minimum_credit_score,
            format!("{}-{}", r.minimum_age, r.maximum_age),
            r.employment_types,
            r.rule_status,
        );
    }
    out
}

fn status_label(status: &str) -> &'static str {
    ApplicationStatus::classify(status).as_str()
}

pub fn incoming_applications(apps: &[LoanApplication]) -> String {
    if apps.is_empty() {
        return "No applications found.".to_string();
    }
    let mut out = format!(
        "{:>6}  {:<20}  {:>14}  {:<12}  {:>6}  {:>4}  {:<14}  {:<12}  {}",
        "ID", "Borrower", "Amount", "Purpose", "Score", "Age", "Employment", "Status", "Date"
    );
    for a in apps {
        let _ = write!(
            out,
            "\n{:>6}  {:<20}  {:>14}  {:<12}  {:>6}  {:>4}  {:<14}  {:<12}  {}",
            a.loan_application_id,
            a.borrower_name,
            format_inr(a.loan_amount),
            a.loan_purpose,
            a.credit_score,
            a.age,
            a.employment_status,
            status_label(&a.status),
            a.application_date.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn my_applications(apps: &[MyApplication]) -> String {
    if apps.is_empty() {
        return "No applications found.".to_string();
    }
    let mut out = format!(
        "{:>6}  {:<24}  {:>14}  {:>7}  {:<12}  {:<12}  {}",
        "ID", "Lender", "Amount", "Rate %", "Purpose", "Status", "Date"
    );
    for a in apps {
        let _ = write!(
            out,
            "\n{:>6}  {:<24}  {:>14}  {:>7}  {:<12}  {:<12}  {}",
            a.loan_application_id,
            a.lender_company_name,
            format_inr(a.loan_amount),
            two_dp(a.interest_rate),
            a.loan_purpose,
            status_label(&a.status),
            a.application_date.as_deref().unwrap_or("-"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use loan_core::AmortizationEngine;

    use super::*;

    fn reference_terms() -> (LoanTerms, AmortizationResult) {
        let terms = LoanTerms::from_years_months(100_000.0, 10.0, 5, 0);
        let result = AmortizationEngine::new().compute(&terms).ready().unwrap();
        (terms, result)
    }

    #[test]
    fn summary_uses_rupee_grouping() {
        let (terms, result) = reference_terms();

        let text = result_summary(&terms, &result);

        assert!(text.contains("Loan Amount:      ₹1,00,000"));
        assert!(text.contains("Loan Term:        5 years (60 months)"));
        assert!(text.contains("Monthly Payment:  ₹2,125"));
        assert!(text.ends_with("Total Amount:     ₹1,27,482"));
    }

    #[test]
    fn schedule_has_header_and_one_line_per_month() {
        let (_, result) = reference_terms();

        let text = schedule(&result.schedule);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 61);
        assert!(lines[0].contains("Balance"));
        assert!(lines[1].trim_start().starts_with("1  "));
        assert!(lines[60].trim_end().ends_with("0.00"));
    }

    #[test]
    fn unknown_status_prints_as_pending() {
        let apps = vec![MyApplication {
            loan_application_id: 5,
            loan_purpose: "CAR".to_string(),
            borrower_name: "Asha".to_string(),
            status: "ESCALATED".to_string(),
            loan_amount: 80_000.0,
            lender_company_name: "Acme".to_string(),
            interest_rate: 9.5,
            application_date: None,
        }];

        let text = my_applications(&apps);

        assert!(text.lines().nth(1).unwrap().contains("PENDING"));
        assert!(text.contains("9.50"));
    }

    #[test]
    fn empty_lists_print_a_sentence() {
        assert_eq!(lenders(&[]), "No eligible lenders found for this request.");
        assert_eq!(history(&[], None), "No calculations yet.");
    }
}
