use chrono::{Datelike, Duration, NaiveDate};

use crate::config::Collections;
use crate::store::{DocumentStore, StoreError};

/// Monday of the week containing `date`, plus the exclusive end seven days on.
pub fn week_window(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(7))
}

/// `week_start` is trusted as given; callers wanting Monday alignment
/// normalize through `week_window` first.
pub async fn count_confirmed_bookings(
    store: &dyn DocumentStore,
    collections: &Collections,
    user_id: &str,
    week_start: NaiveDate,
) -> Result<u32, StoreError> {
    let week_end = week_start + Duration::days(7);
    let bookings = crate::rules::confirmed_bookings(store, collections, user_id).await?;
    let appointments = crate::rules::appointments_by_id(store, collections, &bookings).await?;

    let mut count = 0;
    for booking in &bookings {
        let appointment = appointments
            .get(&booking.appointment_id)
            .ok_or_else(|| crate::rules::missing_appointment(collections, &booking.appointment_id))?;
        if appointment.appointment_date >= week_start && appointment.appointment_date < week_end {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn week_window_is_identity_on_mondays() {
        let (start, end) = week_window(date("2024-06-03"));
        assert_eq!(start, date("2024-06-03"));
        assert_eq!(end, date("2024-06-10"));
    }

    #[test]
    fn week_window_rolls_sunday_back_to_monday() {
        let (start, end) = week_window(date("2024-06-09"));
        assert_eq!(start, date("2024-06-03"));
        assert_eq!(end, date("2024-06-10"));
    }

    #[test]
    fn week_window_covers_midweek_dates() {
        for raw in ["2024-06-04", "2024-06-05", "2024-06-06", "2024-06-07", "2024-06-08"] {
            let (start, end) = week_window(date(raw));
            assert_eq!(start, date("2024-06-03"), "for {raw}");
            assert_eq!(end, date("2024-06-10"), "for {raw}");
        }
    }

    #[test]
    fn week_window_crosses_year_boundaries() {
        // 2025-01-01 is a Wednesday; its week starts in 2024.
        let (start, end) = week_window(date("2025-01-01"));
        assert_eq!(start, date("2024-12-30"));
        assert_eq!(end, date("2025-01-06"));
    }
}
