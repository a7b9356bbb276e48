//! Pending services: subscriptions due for scheduling

use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use super::{Customer, CustomerPreferences, DateWindow};
use crate::defaults::{MAX_PRIORITY, MIN_PRIORITY};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: i64,
    pub plan_id: i64,
    pub customer_id: i64,
}

/// Service plan of a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i64,
    pub name: String,
    /// Days from the previous service to the start of the ideal window
    pub service_interval_days: i64,
    /// Length of the ideal window in days
    pub service_period_days: i64,
}

/// Reference to an already booked appointment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRef {
    pub id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingService {
    pub subscription: Subscription,
    pub plan: Plan,
    pub customer: Customer,
    pub previous_appointment: AppointmentRef,
    /// Date the service is being considered for
    pub next_service_date: NaiveDate,
    pub next_service_period: DateWindow,
    /// Set when the service is a reschedule of a booked appointment
    pub next_appointment: Option<AppointmentRef>,
    #[serde(default)]
    pub preferences: CustomerPreferences,
}

impl PendingService {
    pub fn new(
        subscription: Subscription,
        plan: Plan,
        customer: Customer,
        previous_appointment: AppointmentRef,
        next_service_date: NaiveDate,
        preferences: CustomerPreferences,
    ) -> Self {
        let period_start = previous_appointment.date + TimeDelta::days(plan.service_interval_days);
        let period_end = period_start + TimeDelta::days(plan.service_period_days);

        Self {
            subscription,
            plan,
            customer,
            previous_appointment,
            next_service_date,
            next_service_period: DateWindow::new(period_start, period_end),
            next_appointment: None,
            preferences,
        }
    }

    pub fn with_next_appointment(mut self, next_appointment: AppointmentRef) -> Self {
        self.next_appointment = Some(next_appointment);
        self
    }

    /// Scheduling priority in `1..=100`.
    ///
    /// Overdue services (on or past the end of the ideal window) get 100,
    /// services not yet inside the window get 1, the rest interpolate linearly.
    pub fn priority(&self) -> u8 {
        let window = self.next_service_period;
        let date = self.next_service_date;

        if date >= window.end {
            return MAX_PRIORITY;
        }
        if date <= window.start {
            return MIN_PRIORITY;
        }

        let elapsed = (date - window.start).num_days() as f64;
        let length = window.length_in_days() as f64;
        let span = f64::from(MAX_PRIORITY - MIN_PRIORITY);

        (f64::from(MIN_PRIORITY) + span * elapsed / length).round() as u8
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority() == MAX_PRIORITY
    }

    pub fn preferred_employee_id(&self) -> Option<i64> {
        self.preferences
            .preferred_employee_id
            .or(self.customer.preferred_tech_id)
    }

    /// Clear the preferred technician on the service and the customer record
    pub fn reset_preferred_employee(&mut self) {
        self.preferences.preferred_employee_id = None;
        self.customer.preferred_tech_id = None;
    }

    pub fn is_rescheduled(&self) -> bool {
        self.next_appointment.is_some()
    }

    pub fn is_rescheduled_to(&self, date: NaiveDate) -> bool {
        self.next_appointment.is_some_and(|a| a.date == date)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::types::Coordinates;

    pub fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    /// Service whose ideal window runs from March 1 to March 21
    pub fn pending_service(subscription_id: i64, next_service_date: NaiveDate) -> PendingService {
        PendingService::new(
            Subscription {
                id: subscription_id,
                plan_id: 2,
                customer_id: subscription_id * 10,
            },
            Plan {
                id: 2,
                name: "Pro".to_string(),
                service_interval_days: 90,
                service_period_days: 20,
            },
            Customer {
                id: subscription_id * 10,
                name: format!("Customer {}", subscription_id),
                location: Coordinates::new(35.2 + subscription_id as f64 * 0.001, -80.8),
                preferred_tech_id: None,
            },
            AppointmentRef {
                id: subscription_id * 100,
                date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            },
            next_service_date,
            CustomerPreferences::default(),
        )
    }
}
