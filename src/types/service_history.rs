use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Duration;

/// Completed appointment from a customer's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHistory {
    pub appointment_id: i64,
    pub customer_id: i64,
    pub service_type_id: i64,
    pub date: NaiveDate,
    pub duration: Duration,
}
