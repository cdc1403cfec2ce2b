use serde::{Deserialize, Serialize};

/// Inputs of a loan calculation.
///
/// The term is kept as the years/months split the borrower entered so that a
/// recalled calculation restores the form exactly; [`LoanTerms::term_months`]
/// gives the number of payments.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed, in currency units.
    pub principal: f64,
    /// Nominal interest rate in percent per annum (10.0 means 10%).
    pub annual_rate_percent: f64,
    pub term_years: u32,
    pub term_extra_months: u32,
}

impl LoanTerms {
    /// Builds terms from a total number of monthly payments.
    ///
    /// The months are split into whole years plus a remainder.
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_months: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years: term_months / 12,
            term_extra_months: term_months % 12,
        }
    }

    /// Builds terms from a years/months split as entered on the form.
    pub fn from_years_months(
        principal: f64,
        annual_rate_percent: f64,
        years: u32,
        months: u32,
    ) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_years: years,
            term_extra_months: months,
        }
    }

    /// Number of monthly payments.
    pub fn term_months(&self) -> u32 {
        total_months(self.term_years, self.term_extra_months)
    }

    /// Human readable term, e.g. `"2 years 6 months"`.
    pub fn term_display(&self) -> String {
        term_display(self.term_years, self.term_extra_months)
    }
}

/// Total number of months in a years/months term.
pub fn total_months(
    years: u32,
    months: u32,
) -> u32 {
    years.saturating_mul(12).saturating_add(months)
}

/// Renders a term with singular/plural units, omitting zero parts.
///
/// ```
/// use loan_core::term_display;
///
/// assert_eq!(term_display(2, 6), "2 years 6 months");
/// assert_eq!(term_display(1, 0), "1 year");
/// assert_eq!(term_display(0, 6), "6 months");
/// ```
pub fn term_display(
    years: u32,
    months: u32,
) -> String {
    let mut parts = Vec::with_capacity(2);
    if years > 0 {
        parts.push(format!("{years} year{}", plural(years)));
    }
    if months > 0 {
        parts.push(format!("{months} month{}", plural(months)));
    }
    parts.join(" ")
}

fn plural(n: u32) -> &'static str {
    if n > 1 { "s" } else { "" }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn total_months_combines_years_and_months() {
        assert_eq!(total_months(5, 0), 60);
        assert_eq!(total_months(2, 6), 30);
        assert_eq!(total_months(0, 7), 7);
    }

    #[test]
    fn term_display_years_and_months() {
        assert_eq!(term_display(2, 6), "2 years 6 months");
    }

    #[test]
    fn term_display_single_year() {
        assert_eq!(term_display(1, 0), "1 year");
    }

    #[test]
    fn term_display_months_only() {
        assert_eq!(term_display(0, 6), "6 months");
    }

    #[test]
    fn term_display_singular_month() {
        assert_eq!(term_display(3, 1), "3 years 1 month");
    }

    #[test]
    fn term_display_empty_for_zero_term() {
        assert_eq!(term_display(0, 0), "");
    }

    #[test]
    fn new_splits_months_into_years() {
        let terms = LoanTerms::new(1000.0, 5.0, 30);

        assert_eq!(terms.term_years, 2);
        assert_eq!(terms.term_extra_months, 6);
        assert_eq!(terms.term_months(), 30);
    }

    #[test]
    fn from_years_months_keeps_entered_split() {
        let terms = LoanTerms::from_years_months(1000.0, 5.0, 0, 18);

        assert_eq!(terms.term_years, 0);
        assert_eq!(terms.term_extra_months, 18);
        assert_eq!(terms.term_display(), "18 months");
    }
}
