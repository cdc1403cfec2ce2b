mod amortization;
mod auth;
mod calculation_record;
mod lender_rule;
mod loan_application;
mod loan_request;
mod loan_terms;

pub use amortization::{AmortizationResult, PaymentRow};
pub use auth::{BorrowerDetails, LenderDetails, LoginRequest, LoginResponse, RegisterRequest, Role};
pub use calculation_record::{CalculationRecord, RecordId};
pub use lender_rule::{CreateRule, RuleResponse};
pub use loan_application::{ApplicationStatus, EligibleLender, LoanApplication, MyApplication};
pub use loan_request::{CreateLoanRequest, LoanRequestResponse};
pub use loan_terms::{LoanTerms, term_display, total_months};
