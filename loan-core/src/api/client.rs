use async_trait::async_trait;

use super::error::ApiError;
use crate::models::{
    ApplicationStatus, CreateLoanRequest, CreateRule, EligibleLender, LoanApplication,
    LoanRequestResponse, LoginRequest, LoginResponse, MyApplication, RegisterRequest,
    RuleResponse,
};

/// Every call the marketplace backend offers.
///
/// Implementations attach the session's bearer token to each request when
/// there is one.
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    // Accounts
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<LoginResponse, ApiError>;
    async fn register(
        &self,
        request: &RegisterRequest,
    ) -> Result<(), ApiError>;

    // Borrower requests
    async fn create_loan_request(
        &self,
        request: &CreateLoanRequest,
    ) -> Result<LoanRequestResponse, ApiError>;
    async fn my_loan_requests(&self) -> Result<Vec<LoanRequestResponse>, ApiError>;

    // Lender rules
    async fn create_rule(
        &self,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError>;
    async fn update_rule(
        &self,
        id: i64,
        rule: &CreateRule,
    ) -> Result<RuleResponse, ApiError>;
    async fn my_rules(&self) -> Result<Vec<RuleResponse>, ApiError>;
    async fn delete_rule(
        &self,
        id: i64,
    ) -> Result<(), ApiError>;

    // Applications
    async fn eligible_lenders(
        &self,
        request_id: i64,
        salary: f64,
    ) -> Result<Vec<EligibleLender>, ApiError>;
    async fn apply_for_loan(
        &self,
        request_id: i64,
        rule_id: i64,
    ) -> Result<(), ApiError>;
    async fn update_loan_status(
        &self,
        loan_id: i64,
        status: ApplicationStatus,
    ) -> Result<(), ApiError>;
    async fn lender_applications(&self) -> Result<Vec<LoanApplication>, ApiError>;
    async fn borrower_applications(&self) -> Result<Vec<MyApplication>, ApiError>;
}

/// Sends one application per selected rule, in order, without retries.
///
/// Every rule is attempted even after a failure. The returned outcome is that
/// of the last call; `rule_ids` must not be empty.
pub async fn apply_to_lenders(
    client: &dyn MarketplaceClient,
    request_id: i64,
    rule_ids: &[i64],
) -> Result<(), ApiError> {
    let mut last = Ok(());
    for &rule_id in rule_ids {
        last = client.apply_for_loan(request_id, rule_id).await;
        if let Err(e) = &last {
            tracing::warn!(request_id, rule_id, error = %e, "application failed");
        }
    }
    last
}
