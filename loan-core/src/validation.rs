//! Checks run on form input before anything is sent to the backend.
//!
//! Each validator stops at the first failing check. The backend validates
//! again; these checks only catch obvious mistakes early.

use thiserror::Error;

use crate::models::{
    BorrowerDetails, CreateLoanRequest, CreateRule, LenderDetails, LoginRequest, RegisterRequest,
    Role,
};

pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;
pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 65;
pub const MAX_INTEREST_RATE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    // loan request
    #[error("Please enter a valid loan amount")]
    LoanAmount,
    #[error("Please select a loan purpose")]
    LoanPurpose,
    #[error("Please select employment status")]
    EmploymentStatus,
    #[error("Please enter a valid credit score (300-850)")]
    CreditScore,
    #[error("Please enter a valid age (18-65)")]
    Age,
    #[error("Please enter a valid salary")]
    Salary,

    // lender rule
    #[error("Please enter a valid minimum loan amount")]
    MinimumLoanAmount,
    #[error("Maximum loan amount must be greater than minimum amount")]
    MaximumLoanAmount,
    #[error("Please enter a valid interest rate (0-50%)")]
    InterestRate,
    #[error("Please enter a valid minimum credit score (300-850)")]
    MinimumCreditScore,
    #[error("Please enter a valid minimum age (18-65)")]
    MinimumAge,
    #[error("Maximum age must be greater than minimum age and not exceed 65")]
    MaximumAge,
    #[error("Please enter a valid minimum salary")]
    MinimumSalary,

    // accounts
    #[error("Please fill in all fields")]
    MissingLoginFields,
    #[error("Please fill in all required fields")]
    MissingRegistrationFields,
    #[error("Passwords do not match")]
    PasswordMismatch,

    // applying
    #[error("Please select at least one lender")]
    NoLenderSelected,
}

pub fn validate_loan_request(request: &CreateLoanRequest) -> Result<(), ValidationError> {
    if !is_positive(request.loan_amount) {
        return Err(ValidationError::LoanAmount);
    }
    if request.loan_purpose.trim().is_empty() {
        return Err(ValidationError::LoanPurpose);
    }
    if request.employment_status.trim().is_empty() {
        return Err(ValidationError::EmploymentStatus);
    }
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&request.credit_score) {
        return Err(ValidationError::CreditScore);
    }
    if !(MIN_AGE..=MAX_AGE).contains(&request.age) {
        return Err(ValidationError::Age);
    }
    if !is_positive(request.salary) {
        return Err(ValidationError::Salary);
    }
    Ok(())
}

/// Used for both new and edited rules.
pub fn validate_rule(rule: &CreateRule) -> Result<(), ValidationError> {
    if !is_positive(rule.minimum_loan_amount) {
        return Err(ValidationError::MinimumLoanAmount);
    }
    if !(rule.maximum_loan_amount > rule.minimum_loan_amount) {
        return Err(ValidationError::MaximumLoanAmount);
    }
    if !is_positive(rule.interest_rate) || rule.interest_rate > MAX_INTEREST_RATE {
        return Err(ValidationError::InterestRate);
    }
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&rule.minimum_credit_score) {
        return Err(ValidationError::MinimumCreditScore);
    }
    if !(MIN_AGE..=MAX_AGE).contains(&rule.minimum_age) {
        return Err(ValidationError::MinimumAge);
    }
    // equal ages are accepted
    if rule.maximum_age < rule.minimum_age || rule.maximum_age > MAX_AGE {
        return Err(ValidationError::MaximumAge);
    }
    if !is_positive(rule.minimum_salary) {
        return Err(ValidationError::MinimumSalary);
    }
    Ok(())
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.user_name.trim().is_empty() || request.password.is_empty() {
        return Err(ValidationError::MissingLoginFields);
    }
    Ok(())
}

pub fn validate_lender_selection(rule_ids: &[i64]) -> Result<(), ValidationError> {
    if rule_ids.is_empty() {
        return Err(ValidationError::NoLenderSelected);
    }
    Ok(())
}

/// Everything the registration page collects, for both roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub user_name: String,
    pub email: String,
    pub password: String,
    /// Repeated password. `None` skips the comparison.
    pub confirm_password: Option<String>,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    /// Lenders only.
    pub company_name: String,
    /// Lenders only.
    pub license_number: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: None,
            role: Role::Borrower,
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            address: String::new(),
            company_name: String::new(),
            license_number: String::new(),
        }
    }
}

impl RegisterForm {
    /// Validates the form and builds the request body. Only the details
    /// block for the chosen role is attached.
    pub fn into_request(self) -> Result<RegisterRequest, ValidationError> {
        if self.user_name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(ValidationError::MissingRegistrationFields);
        }
        if self
            .confirm_password
            .as_ref()
            .is_some_and(|confirm| *confirm != self.password)
        {
            return Err(ValidationError::PasswordMismatch);
        }

        let (lender, borrower) = match self.role {
            Role::Borrower => (
                None,
                Some(BorrowerDetails {
                    first_name: self.first_name,
                    last_name: self.last_name,
                    phone_number: self.phone_number,
                    address: self.address,
                }),
            ),
            Role::Lender => (
                Some(LenderDetails {
                    first_name: self.first_name,
                    last_name: self.last_name,
                    company_name: self.company_name,
                    license_number: self.license_number,
                    phone_number: self.phone_number,
                    address: self.address,
                }),
                None,
            ),
        };

        Ok(RegisterRequest {
            user_name: self.user_name,
            email: self.email,
            password: self.password,
            role: self.role,
            lender,
            borrower,
        })
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
