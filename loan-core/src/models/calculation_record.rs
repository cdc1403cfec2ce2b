use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AmortizationResult, LoanTerms};

pub type RecordId = Uuid;

/// A calculation kept in the session history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: RecordId,
    pub terms: LoanTerms,
    pub result: AmortizationResult,
    pub calculated_at: DateTime<Utc>,
}

impl CalculationRecord {
    /// Tags a result with a fresh id and the current time.
    pub fn new(
        terms: LoanTerms,
        result: AmortizationResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            terms,
            result,
            calculated_at: Utc::now(),
        }
    }
}
