use chrono::{DateTime, NaiveDate, Utc};

use crate::config::Collections;
use crate::rules::{quota, subscription};
use crate::store::{DocumentStore, StoreError};

pub const WEEKLY_BOOKING_LIMIT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingEligibility {
    pub eligible: bool,
    /// Not computed when the subscription gate already failed.
    pub weekly_count: Option<u32>,
}

/// The quota week is the one containing the requested appointment date, not
/// the current week; the subscription is checked against `now`.
pub async fn can_book(
    store: &dyn DocumentStore,
    collections: &Collections,
    user_id: &str,
    appointment_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<BookingEligibility, StoreError> {
    if !subscription::has_active_subscription(store, collections, user_id, now).await? {
        return Ok(BookingEligibility {
            eligible: false,
            weekly_count: None,
        });
    }

    let (week_start, _) = quota::week_window(appointment_date);
    let count = quota::count_confirmed_bookings(store, collections, user_id, week_start).await?;
    Ok(BookingEligibility {
        eligible: count < WEEKLY_BOOKING_LIMIT,
        weekly_count: Some(count),
    })
}
