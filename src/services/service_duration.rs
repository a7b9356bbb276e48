//! Historical service duration

use crate::types::{Duration, ServiceHistory};

/// Mean duration of past services, ignoring records with no recorded time
pub fn average_service_duration(history: &[ServiceHistory]) -> Option<Duration> {
    let recorded: Vec<Duration> = history
        .iter()
        .map(|h| h.duration)
        .filter(|d| !d.is_zero())
        .collect();

    if recorded.is_empty() {
        return None;
    }

    let total: Duration = recorded.iter().copied().sum();
    Some(Duration::from_seconds(total.total_seconds() / recorded.len() as i64))
}
