use serde::{Deserialize, Serialize};

/// Lifecycle state of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Strict, case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "under_review" => Some(Self::UnderReview),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Classifies a free-form status string for display; anything
    /// unrecognised is shown as pending.
    pub fn classify(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Pending)
    }

    /// Style class used by the report renderers.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::UnderReview => "status-under-review",
            Self::Approved => "status-approved",
            Self::Rejected => "status-rejected",
        }
    }
}

/// A lender whose active rule matches a borrower's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleLender {
    pub lender_id: i64,
    pub rule_id: i64,
    pub name: String,
    pub interest_rate: f64,
    pub minimum_loan_amount: f64,
    pub maximum_loan_amount: f64,
}

/// An application as seen by the lender it was sent to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub loan_application_id: i64,
    pub loan_purpose: String,
    pub borrower_name: String,
    pub status: String,
    pub loan_amount: f64,
    pub credit_score: u32,
    pub age: u32,
    pub employment_status: String,
    #[serde(default)]
    pub application_date: Option<String>,
}

/// An application as seen by the borrower who sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyApplication {
    pub loan_application_id: i64,
    pub loan_purpose: String,
    pub borrower_name: String,
    pub status: String,
    pub loan_amount: f64,
    pub lender_company_name: String,
    pub interest_rate: f64,
    #[serde(default)]
    pub application_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn classify_maps_known_statuses() {
        assert_eq!(ApplicationStatus::classify("approved"), ApplicationStatus::Approved);
        assert_eq!(ApplicationStatus::classify("REJECTED"), ApplicationStatus::Rejected);
        assert_eq!(
            ApplicationStatus::classify("Under_Review"),
            ApplicationStatus::UnderReview
        );
    }

    #[test]
    fn classify_falls_back_to_pending() {
        assert_eq!(ApplicationStatus::classify("escalated"), ApplicationStatus::Pending);
        assert_eq!(
            ApplicationStatus::classify("escalated").css_class(),
            "status-pending"
        );
    }

    #[test]
    fn css_classes_match_status() {
        assert_eq!(ApplicationStatus::UnderReview.css_class(), "status-under-review");
        assert_eq!(ApplicationStatus::Approved.css_class(), "status-approved");
    }

    #[test]
    fn loan_application_tolerates_missing_date() {
        let app: LoanApplication = serde_json::from_str(
            r#"{
                "loanApplicationId": 7,
                "loanPurpose": "HOME",
                "borrowerName": "Ravi",
                "status": "PENDING",
                "loanAmount": 250000,
                "creditScore": 720,
                "age": 34,
                "employmentStatus": "SALARIED"
            }"#,
        )
        .unwrap();

        assert_eq!(app.loan_application_id, 7);
        assert_eq!(app.application_date, None);
    }
}
