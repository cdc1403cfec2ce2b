use serde::{Deserialize, Serialize};

/// Lender eligibility thresholds, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRule {
    pub minimum_salary: f64,
    pub minimum_loan_amount: f64,
    pub maximum_loan_amount: f64,
    pub interest_rate: f64,
    pub minimum_credit_score: u32,
    pub minimum_age: u32,
    pub maximum_age: u32,
    pub employment_types: String,
    pub rule_status: String,
}

impl Default for CreateRule {
    fn default() -> Self {
        Self {
            minimum_salary: 0.0,
            minimum_loan_amount: 0.0,
            maximum_loan_amount: 0.0,
            interest_rate: 0.0,
            minimum_credit_score: 0,
            minimum_age: 0,
            maximum_age: 0,
            employment_types: "SALARIED".to_string(),
            rule_status: "ACTIVE".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    pub id: i64,
    pub minimum_salary: f64,
    pub minimum_loan_amount: f64,
    pub maximum_loan_amount: f64,
    pub interest_rate: f64,
    pub minimum_credit_score: u32,
    pub minimum_age: u32,
    pub maximum_age: u32,
    pub employment_types: String,
    pub rule_status: String,
}

impl From<RuleResponse> for CreateRule {
    /// Seeds the edit form from an existing rule.
    fn from(rule: RuleResponse) -> Self {
        Self {
            minimum_salary: rule.minimum_salary,
            minimum_loan_amount: rule.minimum_loan_amount,
            maximum_loan_amount: rule.maximum_loan_amount,
            interest_rate: rule.interest_rate,
            minimum_credit_score: rule.minimum_credit_score,
            minimum_age: rule.minimum_age,
            maximum_age: rule.maximum_age,
            employment_types: rule.employment_types,
            rule_status: rule.rule_status,
        }
    }
}
