use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const SETTING_QR_PASSWORD: &str = "qr_code_password";
pub const SETTING_EARLY_MINUTES: &str = "check_in_early_minutes";
pub const SETTING_LATE_MINUTES: &str = "check_in_late_minutes";

#[derive(Debug, Clone, Deserialize)]
pub struct BookingDoc {
    #[serde(rename = "$id")]
    pub id: String,
    pub appointment_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentDoc {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(deserialize_with = "de_calendar_date")]
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionDoc {
    #[serde(default, deserialize_with = "de_optional_instant")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_optional_instant")]
    pub end_date: Option<DateTime<Utc>>,
}

impl SubscriptionDoc {
    /// An absent bound is unbounded in that direction.
    pub fn covers(&self, at: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| start <= at)
            && self.end_date.map_or(true, |end| end >= at)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GymSettingDoc {
    pub setting_value: String,
}

/// Stored dates may be bare days or full ISO instants; only the first ten
/// characters (the day part) are significant.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }
    let day = parse_iso_date(raw)?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc())
}

fn de_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_iso_date(&raw)
        .ok_or_else(|| de::Error::custom(format!("invalid calendar date {raw:?}")))
}

fn de_optional_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => parse_instant(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid instant {value:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_and_timestamped_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(parse_iso_date("2024-06-03"), Some(expected));
        assert_eq!(parse_iso_date("2024-06-03T09:00:00.000+00:00"), Some(expected));
        assert_eq!(parse_iso_date("2024-6-3"), None);
        assert_eq!(parse_iso_date("not a date"), None);
    }

    #[test]
    fn appointment_doc_accepts_instant_valued_dates() {
        let doc: AppointmentDoc = serde_json::from_value(json!({
            "$id": "a1",
            "appointment_date": "2024-06-03T00:00:00.000+00:00",
            "appointment_time": "09:00",
            "title": "Spinning"
        }))
        .unwrap();
        assert_eq!(doc.appointment_date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(doc.description, None);
    }

    #[test]
    fn subscription_window_bounds_are_optional() {
        let unbounded: SubscriptionDoc = serde_json::from_value(json!({})).unwrap();
        assert!(unbounded.covers(Utc::now()));

        let doc: SubscriptionDoc = serde_json::from_value(json!({
            "start_date": "2024-01-01",
            "end_date": "2024-12-31T23:59:59+00:00"
        }))
        .unwrap();
        let inside = "2024-06-15T12:00:00Z".parse().unwrap();
        let before = "2023-12-31T23:59:59Z".parse().unwrap();
        let after = "2025-01-01T00:00:00Z".parse().unwrap();
        assert!(doc.covers(inside));
        assert!(!doc.covers(before));
        assert!(!doc.covers(after));
    }

    #[test]
    fn empty_string_bound_means_unbounded() {
        let doc: SubscriptionDoc = serde_json::from_value(json!({
            "start_date": "",
            "end_date": "2099-01-01"
        }))
        .unwrap();
        assert_eq!(doc.start_date, None);
        assert!(doc.covers("2024-06-15T12:00:00Z".parse().unwrap()));
    }
}
