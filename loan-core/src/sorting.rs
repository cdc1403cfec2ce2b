//! Column sorting for application lists.
//!
//! Picking the field already sorted on flips the direction; picking a new
//! field sorts ascending. Amounts, scores, ids and dates compare by value,
//! everything else compares as text.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{LoanApplication, MyApplication};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    ApplicationId,
    BorrowerName,
    LenderName,
    LoanAmount,
    InterestRate,
    Purpose,
    Status,
    CreditScore,
    Age,
    EmploymentStatus,
    ApplicationDate,
}

impl SortField {
    /// Accepts the wire field names (`loanAmount`) as well as
    /// kebab-case (`loan-amount`).
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "id" | "loanapplicationid" | "applicationid" => Some(Self::ApplicationId),
            "borrowername" | "borrower" => Some(Self::BorrowerName),
            "lendercompanyname" | "lender" => Some(Self::LenderName),
            "loanamount" | "amount" => Some(Self::LoanAmount),
            "interestrate" | "rate" => Some(Self::InterestRate),
            "loanpurpose" | "purpose" => Some(Self::Purpose),
            "status" => Some(Self::Status),
            "creditscore" => Some(Self::CreditScore),
            "age" => Some(Self::Age),
            "employmentstatus" => Some(Self::EmploymentStatus),
            "applicationdate" | "date" => Some(Self::ApplicationDate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current sort column of a list view. Starts unsorted and ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    /// Updates the state for a click on `field`.
    pub fn toggle(
        &mut self,
        field: SortField,
    ) {
        if self.field == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Sorts `rows` in place by the current field. Unsorted state is a no-op.
    pub fn apply<R: Sortable>(
        &self,
        rows: &mut [R],
    ) {
        let Some(field) = self.field else {
            return;
        };
        rows.sort_by(|a, b| {
            let ord = a.sort_value(field).compare(&b.sort_value(field));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

/// Value of one column, as used for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Text(String),
    /// Column absent from this row type or left empty by the backend.
    Missing,
}

impl SortValue {
    fn compare(
        &self,
        other: &Self,
    ) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Missing, Self::Missing) => Ordering::Equal,
            // missing values sort first, numbers before text
            (Self::Missing, _) => Ordering::Less,
            (_, Self::Missing) => Ordering::Greater,
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }

    fn date(raw: Option<&str>) -> Self {
        match raw.and_then(parse_timestamp) {
            Some(millis) => Self::Number(millis as f64),
            None => raw.map_or(Self::Missing, |s| Self::Text(s.to_string())),
        }
    }
}

/// A list row that can be sorted by [`SortField`].
pub trait Sortable {
    fn sort_value(
        &self,
        field: SortField,
    ) -> SortValue;
}

impl Sortable for LoanApplication {
    fn sort_value(
        &self,
        field: SortField,
    ) -> SortValue {
        match field {
            SortField::ApplicationId => SortValue::Number(self.loan_application_id as f64),
            SortField::BorrowerName => SortValue::Text(self.borrower_name.clone()),
            SortField::LoanAmount => SortValue::Number(self.loan_amount),
            SortField::Purpose => SortValue::Text(self.loan_purpose.clone()),
            SortField::Status => SortValue::Text(self.status.clone()),
            SortField::CreditScore => SortValue::Number(f64::from(self.credit_score)),
            SortField::Age => SortValue::Number(f64::from(self.age)),
            SortField::EmploymentStatus => SortValue::Text(self.employment_status.clone()),
            SortField::ApplicationDate => SortValue::date(self.application_date.as_deref()),
            SortField::LenderName | SortField::InterestRate => SortValue::Missing,
        }
    }
}

impl Sortable for MyApplication {
    fn sort_value(
        &self,
        field: SortField,
    ) -> SortValue {
        match field {
            SortField::ApplicationId => SortValue::Number(self.loan_application_id as f64),
            SortField::BorrowerName => SortValue::Text(self.borrower_name.clone()),
            SortField::LenderName => SortValue::Text(self.lender_company_name.clone()),
            SortField::LoanAmount => SortValue::Number(self.loan_amount),
            SortField::InterestRate => SortValue::Number(self.interest_rate),
            SortField::Purpose => SortValue::Text(self.loan_purpose.clone()),
            SortField::Status => SortValue::Text(self.status.clone()),
            SortField::ApplicationDate => SortValue::date(self.application_date.as_deref()),
            SortField::CreditScore | SortField::Age | SortField::EmploymentStatus => {
                SortValue::Missing
            }
        }
    }
}

/// Milliseconds since the epoch for RFC 3339, naive ISO date-time or plain
/// date strings.
fn parse_timestamp(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn app(
        id: i64,
        amount: f64,
        score: u32,
        date: Option<&str>,
    ) -> LoanApplication {
        LoanApplication {
            loan_application_id: id,
            loan_purpose: "HOME".to_string(),
            borrower_name: format!("b{id}"),
            status: "PENDING".to_string(),
            loan_amount: amount,
            credit_score: score,
            age: 30,
            employment_status: "SALARIED".to_string(),
            application_date: date.map(str::to_string),
        }
    }

    fn ids(rows: &[LoanApplication]) -> Vec<i64> {
        rows.iter().map(|r| r.loan_application_id).collect()
    }

    // =========================================================================
    // state transitions
    // =========================================================================

    #[test]
    fn starts_unsorted_ascending() {
        let state = SortState::default();

        assert_eq!(state.field, None);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn same_field_toggles_direction() {
        let mut state = SortState::default();
        state.toggle(SortField::LoanAmount);
        state.toggle(SortField::LoanAmount);

        assert_eq!(state.direction, SortDirection::Descending);

        state.toggle(SortField::LoanAmount);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn new_field_resets_to_ascending() {
        let mut state = SortState::default();
        state.toggle(SortField::LoanAmount);
        state.toggle(SortField::LoanAmount);

        state.toggle(SortField::CreditScore);

        assert_eq!(state.field, Some(SortField::CreditScore));
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    // =========================================================================
    // ordering
    // =========================================================================

    #[test]
    fn amounts_sort_numerically() {
        let mut rows = vec![app(1, 9_000.0, 700, None), app(2, 10_000.0, 700, None), app(3, 800.0, 700, None)];
        let mut state = SortState::default();
        state.toggle(SortField::LoanAmount);

        state.apply(&mut rows);
        assert_eq!(ids(&rows), vec![3, 1, 2]);

        state.toggle(SortField::LoanAmount);
        state.apply(&mut rows);
        assert_eq!(ids(&rows), vec![2, 1, 3]);
    }

    #[test]
    fn credit_scores_sort_numerically() {
        let mut rows = vec![app(1, 1.0, 720, None), app(2, 1.0, 650, None), app(3, 1.0, 800, None)];
        let mut state = SortState::default();
        state.toggle(SortField::CreditScore);

        state.apply(&mut rows);

        assert_eq!(ids(&rows), vec![2, 1, 3]);
    }

    #[test]
    fn dates_sort_chronologically() {
        let mut rows = vec![
            app(1, 1.0, 700, Some("2025-02-01T10:00:00")),
            app(2, 1.0, 700, Some("2024-12-31")),
            app(3, 1.0, 700, Some("2025-01-15T08:30:00Z")),
        ];
        let mut state = SortState::default();
        state.toggle(SortField::ApplicationDate);

        state.apply(&mut rows);

        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn unsorted_state_keeps_order() {
        let mut rows = vec![app(2, 1.0, 700, None), app(1, 1.0, 700, None)];

        SortState::default().apply(&mut rows);

        assert_eq!(ids(&rows), vec![2, 1]);
    }

    #[test]
    fn parse_accepts_wire_and_kebab_names() {
        assert_eq!(SortField::parse("loanAmount"), Some(SortField::LoanAmount));
        assert_eq!(SortField::parse("credit-score"), Some(SortField::CreditScore));
        assert_eq!(SortField::parse("applicationDate"), Some(SortField::ApplicationDate));
        assert_eq!(SortField::parse("colour"), None);
    }
}
