use serde::{Deserialize, Serialize};

/// A borrower's loan request as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub loan_amount: f64,
    pub loan_purpose: String,
    pub employment_status: String,
    pub credit_score: u32,
    pub age: u32,
    pub salary: f64,
}

impl Default for CreateLoanRequest {
    fn default() -> Self {
        Self {
            loan_amount: 0.0,
            loan_purpose: String::new(),
            employment_status: "SALARIED".to_string(),
            credit_score: 0,
            age: 0,
            salary: 0.0,
        }
    }
}

/// A stored loan request as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequestResponse {
    pub id: i64,
    pub loan_amount: f64,
    pub loan_purpose: String,
    pub employment_status: String,
    pub credit_score: u32,
    pub age: u32,
    pub salary: f64,
}
