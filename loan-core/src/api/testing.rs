//! Canned [`MarketplaceClient`] for exercising callers without a backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::client::MarketplaceClient;
use super::error::ApiError;
use crate::models::{
    ApplicationStatus, CreateLoanRequest, CreateRule, EligibleLender, LoanApplication,
    LoanRequestResponse, LoginRequest, LoginResponse, MyApplication, RegisterRequest, Role,
    RuleResponse,
};

/// Answers every call from its fields and records what was called.
///
/// When `fail_with` is set every call returns that error. `apply_failures`
/// fails individual rule ids only.
#[derive(Debug, Default)]
pub struct StubClient {
    pub fail_with: Option<ApiError>,
    pub role: Option<Role>,
    pub requests: Vec<LoanRequestResponse>,
    pub rules: Vec<RuleResponse>,
    pub lenders: Vec<EligibleLender>,
    pub incoming: Vec<LoanApplication>,
    pub mine: Vec<MyApplication>,
    pub apply_failures: HashMap<i64, ApiError>,
    calls: Mutex<Vec<String>>,
}

impl StubClient {
    /// Calls received so far, e.g. `"apply 3 7"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(
        &self,
        call: String,
    ) -> Result<(), ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MarketplaceClient for StubClient {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        self.record(format!("login {}", request.user_name))?;
        Ok(LoginResponse {
            token: format!("token-for-{}", request.user_name),
            role: self.role.unwrap_or(Role::Borrower),
        })
    }

    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(), ApiError> {
        self.record(format!("register {} {}", request.user_name, request.role.as_str()))
    }

    async fn create_loan_request(
        &self,
        request: &CreateLoanRequest,
    ) -> Result<LoanRequestResponse, ApiError> {
        self.record(format!("create_loan_request {}", request.loan_amount))?;
        Ok(LoanRequestResponse {
            id: self.requests.len() as i64 + 1,
            loan_amount: request.loan_amount,
            loan_purpose: request.loan_purpose.clone(),
            employment_status: request.employment_status.clone(),
            credit_score: request.credit_score,
            age: request.age,
            salary: request.salary,
        })
    }

    async fn my_loan_requests(&self) -> Result<Vec<LoanRequestResponse>, ApiError> {
        self.record("my_loan_requests".to_string())?;
        Ok(self.requests.clone())
    }

    async fn create_rule(
        &self,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError> {
        self.record(format!("create_rule {}", rule.interest_rate))?;
        Ok(rule_response(self.rules.len() as i64 + 1, rule))
    }

    async fn update_rule(
        &self,
        id: i64,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError> {
        self.record(format!("update_rule {id}"))?;
        Ok(rule_response(id, rule))
    }

    async fn my_rules(&self) -> Result<Vec<RuleResponse>, ApiError> {
        self.record("my_rules".to_string())?;
        Ok(self.rules.clone())
    }

    async fn delete_rule(
        &self,
        id: i64,
    ) -> Result<(), ApiError> {
        self.record(format!("delete_rule {id}"))
    }

    async fn eligible_lenders(
        &self,
        request_id: i64,
        salary: f64,
    ) -> Result<Vec<EligibleLender>, ApiError> {
        self.record(format!("eligible_lenders {request_id} {salary}"))?;
        Ok(self.lenders.clone())
    }

    async fn apply_for_loan(
        &self,
        request_id: i64,
        rule_id: i64,
    ) -> Result<(), ApiError> {
        self.record(format!("apply {request_id} {rule_id}"))?;
        match self.apply_failures.get(&rule_id) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn update_loan_status(
        &self,
        loan_id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        self.record(format!("update_loan_status {loan_id} {}", status.as_str()))
    }

    async fn lender_applications(&self) -> Result<Vec<LoanApplication>, ApiError> {
        self.record("lender_applications".to_string())?;
        Ok(self.incoming.clone())
    }

    async fn borrower_applications(&self) -> Result<Vec<MyApplication>, ApiError> {
        self.record("borrower_applications".to_string())?;
        Ok(self.mine.clone())
    }
}

fn rule_response(
    id: i64,
    rule: &CreateRule,
) -> RuleResponse {
    RuleResponse {
        id,
        minimum_salary: rule.minimum_salary,
        minimum_loan_amount: rule.minimum_loan_amount,
        maximum_loan_amount: rule.maximum_loan_amount,
        interest_rate: rule.interest_rate,
        minimum_credit_score: rule.minimum_credit_score,
        minimum_age: rule.minimum_age,
        maximum_age: rule.maximum_age,
        employment_types: rule.employment_types.clone(),
        rule_status: rule.rule_status.clone(),
    }
}
