//! Downloadable documents: the calculation report and application lists as
//! CSV or printable HTML.
//!
//! ## Application CSV layout
//!
//! One header row followed by one row per application, in list order.
//! Missing values are written as empty cells.
//!
//! | Lender view (incoming) | Borrower view (mine) |
//! |------------------------|----------------------|
//! | Application ID         | Application ID       |
//! | Borrower Name          | Lender               |
//! | Loan Amount            | Loan Amount          |
//! | Purpose                | Interest Rate        |
//! | Status                 | Purpose              |
//! | Credit Score           | Status               |
//! | Age                    | Application Date     |
//! | Employment Status      |                      |
//! | Application Date       |                      |

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::calculations::common::format_inr;
use crate::models::{ApplicationStatus, CalculationRecord, LoanApplication, MyApplication};

/// Errors from the calculation report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("No calculation to download")]
    NothingSelected,
}

/// Errors from application list exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No applications to export")]
    Empty,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Renders the plain-text report of one calculation.
pub fn calculation_report(record: &CalculationRecord) -> String {
    let terms = &record.terms;
    let result = &record.result;
    let generated = record
        .calculated_at
        .with_timezone(&Local)
        .format("%d/%m/%Y, %H:%M:%S");

    format!(
        "LOAN CALCULATION REPORT
Generated on: {generated}

LOAN DETAILS:
- Loan Amount: {amount}
- Interest Rate: {rate}% per annum
- Loan Term: {years} years {months} months
- Total Payments: {payments} months

CALCULATION RESULTS:
- Monthly Payment: {monthly}
- Total Interest: {interest}
- Total Amount: {total}

BREAKDOWN:
- Principal Amount: {amount}
- Interest Amount: {interest}
- Total to Pay: {total}

This calculation is for estimation purposes only.
",
        amount = format_inr(terms.principal),
        rate = terms.annual_rate_percent,
        years = terms.term_years,
        months = terms.term_extra_months,
        payments = result.number_of_payments,
        monthly = format_inr(result.monthly_payment),
        interest = format_inr(result.total_interest),
        total = format_inr(result.total_amount),
    )
}

/// File name for the calculation report downloaded on `date`.
pub fn calculation_report_file_name(date: NaiveDate) -> String {
    format!("loan-calculation-{}.txt", date.format("%Y-%m-%d"))
}

/// A list entry that can be exported.
pub trait ExportRow {
    /// Prefix of the downloaded file name.
    const FILE_STEM: &'static str;
    /// Heading of the printable report.
    const TITLE: &'static str;

    fn headers() -> &'static [&'static str];

    /// Raw cell values, aligned with [`ExportRow::headers`].
    fn cells(&self) -> Vec<String>;

    fn status(&self) -> &str;
}

impl ExportRow for LoanApplication {
    const FILE_STEM: &'static str = "incoming-applications";
    const TITLE: &'static str = "Incoming Loan Applications Report";

    fn headers() -> &'static [&'static str] {
        &[
            "Application ID",
            "Borrower Name",
            "Loan Amount",
            "Purpose",
            "Status",
            "Credit Score",
            "Age",
            "Employment Status",
            "Application Date",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.loan_application_id.to_string(),
            self.borrower_name.clone(),
            self.loan_amount.to_string(),
            self.loan_purpose.clone(),
            self.status.clone(),
            self.credit_score.to_string(),
            self.age.to_string(),
            self.employment_status.clone(),
            self.application_date.clone().unwrap_or_default(),
        ]
    }

    fn status(&self) -> &str {
        &self.status
    }
}

impl ExportRow for MyApplication {
    const FILE_STEM: &'static str = "my-applications";
    const TITLE: &'static str = "My Loan Applications Report";

    fn headers() -> &'static [&'static str] {
        &[
            "Application ID",
            "Lender",
            "Loan Amount",
            "Interest Rate",
            "Purpose",
            "Status",
            "Application Date",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.loan_application_id.to_string(),
            self.lender_company_name.clone(),
            self.loan_amount.to_string(),
            self.interest_rate.to_string(),
            self.loan_purpose.clone(),
            self.status.clone(),
            self.application_date.clone().unwrap_or_default(),
        ]
    }

    fn status(&self) -> &str {
        &self.status
    }
}

/// File name for an export of `R` rows on `date`, e.g.
/// `my-applications-2025-03-01.csv`.
pub fn export_file_name<R: ExportRow>(
    extension: &str,
    date: NaiveDate,
) -> String {
    format!("{}-{}.{extension}", R::FILE_STEM, date.format("%Y-%m-%d"))
}

/// Writes `rows` as CSV.
///
/// # Errors
///
/// * [`ExportError::Empty`] – there is nothing to export.
/// * [`ExportError::Csv`] – the writer failed.
pub fn to_csv<R: ExportRow>(rows: &[R]) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(R::headers())?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    Ok(String::from_utf8(bytes)?)
}

/// Renders `rows` as a standalone, printable HTML table.
///
/// Empty cells show as `N/A`; the status column carries its style class.
///
/// # Errors
///
/// [`ExportError::Empty`] when there is nothing to export.
pub fn to_html<R: ExportRow>(
    rows: &[R],
    generated_on: NaiveDate,
) -> Result<String, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let headers = R::headers();
    let status_col = headers.iter().position(|h| *h == "Status");

    let mut head = String::new();
    for header in headers {
        head.push_str(&format!("<th>{}</th>", escape_html(header)));
    }

    let mut body = String::new();
    for row in rows {
        body.push_str("<tr>");
        for (i, cell) in row.cells().iter().enumerate() {
            let text = if cell.is_empty() { "N/A" } else { cell.as_str() };
            if Some(i) == status_col {
                let class = ApplicationStatus::classify(row.status()).css_class();
                body.push_str(&format!("<td class=\"{class}\">{}</td>", escape_html(text)));
            } else {
                body.push_str(&format!("<td>{}</td>", escape_html(text)));
            }
        }
        body.push_str("</tr>\n");
    }

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  body {{ font-family: Arial, sans-serif; margin: 20px; }}
  h1 {{ color: #333; text-align: center; }}
  table {{ width: 100%; border-collapse: collapse; margin-top: 20px; }}
  th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
  th {{ background-color: #f2f2f2; }}
  .status-approved {{ color: green; font-weight: bold; }}
  .status-rejected {{ color: red; font-weight: bold; }}
  .status-pending {{ color: orange; font-weight: bold; }}
  .status-under-review {{ color: blue; font-weight: bold; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>Generated on: {date}</p>
<table>
<thead><tr>{head}</tr></thead>
<tbody>
{body}</tbody>
</table>
</body>
</html>
"#,
        title = R::TITLE,
        date = generated_on.format("%d/%m/%Y"),
    ))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
