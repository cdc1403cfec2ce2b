use serde::{Deserialize, Serialize};

/// One month of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    /// 1-based payment number.
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Outstanding balance after this payment, never below zero.
    pub balance: f64,
}

/// Output of a fixed-payment amortization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub total_amount: f64,
    pub number_of_payments: u32,
    pub schedule: Vec<PaymentRow>,
}
