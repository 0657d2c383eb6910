use chrono::{DateTime, Utc};

use crate::config::Collections;
use crate::models::{
    AppointmentDoc, BookingDoc, GymSettingDoc, SETTING_EARLY_MINUTES, SETTING_LATE_MINUTES,
    SETTING_QR_PASSWORD,
};
use crate::store::{decode_document, DocumentStore, Filter, StoreError};

pub const DEFAULT_EARLY_MINUTES: i64 = 30;
pub const DEFAULT_LATE_MINUTES: i64 = 15;

/// Read fresh from the settings collection on every validation.
#[derive(Debug, Clone)]
pub struct CheckInSettings {
    pub qr_password: Option<String>,
    pub early_minutes: i64,
    pub late_minutes: i64,
}

impl CheckInSettings {
    pub async fn load(
        store: &dyn DocumentStore,
        collections: &Collections,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            qr_password: setting(store, collections, SETTING_QR_PASSWORD).await?,
            early_minutes: numeric_setting(store, collections, SETTING_EARLY_MINUTES, DEFAULT_EARLY_MINUTES).await?,
            late_minutes: numeric_setting(store, collections, SETTING_LATE_MINUTES, DEFAULT_LATE_MINUTES).await?,
        })
    }
}

async fn setting(
    store: &dyn DocumentStore,
    collections: &Collections,
    key: &str,
) -> Result<Option<String>, StoreError> {
    let page = store
        .list_documents(&collections.settings, &[Filter::equal("setting_key", [key])])
        .await?;
    let Some(document) = page.documents.into_iter().next() else {
        return Ok(None);
    };
    let setting: GymSettingDoc = decode_document(&collections.settings, document)?;
    Ok(Some(setting.setting_value))
}

async fn numeric_setting(
    store: &dyn DocumentStore,
    collections: &Collections,
    key: &str,
    default: i64,
) -> Result<i64, StoreError> {
    let value = setting(store, collections, key).await?;
    Ok(value
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInStatus {
    InvalidQr,
    NoBooking,
    Early,
    Late,
    Valid,
}

impl CheckInStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckInStatus::InvalidQr => "invalid_qr",
            CheckInStatus::NoBooking => "no_booking",
            CheckInStatus::Early => "early",
            CheckInStatus::Late => "late",
            CheckInStatus::Valid => "valid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInMatch {
    pub booking_id: String,
    pub appointment_id: String,
    pub appointment_time: String,
    pub appointment_title: Option<String>,
    /// Only disclosed on a successful check-in.
    pub appointment_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub status: CheckInStatus,
    pub message: String,
    pub matched: Option<CheckInMatch>,
}

impl CheckInOutcome {
    fn rejected(status: CheckInStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            matched: None,
        }
    }
}

/// Gates run in strict order: shared QR credential, then a confirmed booking
/// for today, then the time window around the appointment start. Window
/// boundaries themselves are accepted.
pub async fn validate_check_in(
    store: &dyn DocumentStore,
    collections: &Collections,
    user_id: &str,
    qr_password: &str,
    now: DateTime<Utc>,
) -> Result<CheckInOutcome, StoreError> {
    let settings = CheckInSettings::load(store, collections).await?;

    let password_ok = settings
        .qr_password
        .as_deref()
        .map_or(false, |expected| expected == qr_password);
    if !password_ok {
        return Ok(CheckInOutcome::rejected(
            CheckInStatus::InvalidQr,
            "QR Code non valido",
        ));
    }

    let today = now.date_naive();
    let bookings = crate::rules::confirmed_bookings(store, collections, user_id).await?;
    let appointments = crate::rules::appointments_by_id(store, collections, &bookings).await?;

    let mut target: Option<(&BookingDoc, &AppointmentDoc)> = None;
    for booking in &bookings {
        let appointment = appointments
            .get(&booking.appointment_id)
            .ok_or_else(|| crate::rules::missing_appointment(collections, &booking.appointment_id))?;
        if appointment.appointment_date == today {
            target = Some((booking, appointment));
            break;
        }
    }
    let Some((booking, appointment)) = target else {
        return Ok(CheckInOutcome::rejected(
            CheckInStatus::NoBooking,
            "Non hai prenotazioni per oggi",
        ));
    };

    let start = appointment_start(collections, appointment)?;
    let offset_ms = (now - start).num_milliseconds();

    let matched = CheckInMatch {
        booking_id: booking.id.clone(),
        appointment_id: appointment.id.clone(),
        appointment_time: appointment.appointment_time.clone(),
        appointment_title: appointment.title.clone(),
        appointment_description: None,
    };

    if offset_ms < -(settings.early_minutes * 60_000) {
        return Ok(CheckInOutcome {
            status: CheckInStatus::Early,
            message: format!(
                "Sei troppo in anticipo. Puoi timbrare {} minuti prima.",
                settings.early_minutes
            ),
            matched: Some(matched),
        });
    }
    if offset_ms > settings.late_minutes * 60_000 {
        return Ok(CheckInOutcome {
            status: CheckInStatus::Late,
            message: format!(
                "Sei in ritardo. Puoi timbrare fino a {} minuti dopo l'inizio.",
                settings.late_minutes
            ),
            matched: Some(matched),
        });
    }
    Ok(CheckInOutcome {
        status: CheckInStatus::Valid,
        message: "Check-in effettuato con successo!".to_string(),
        matched: Some(CheckInMatch {
            appointment_description: appointment.description.clone(),
            ..matched
        }),
    })
}

fn appointment_start(
    collections: &Collections,
    appointment: &AppointmentDoc,
) -> Result<DateTime<Utc>, StoreError> {
    let mut parts = appointment.appointment_time.splitn(3, ':');
    let hour = parts.next().and_then(|part| part.trim().parse::<u32>().ok());
    let minute = parts.next().and_then(|part| part.trim().parse::<u32>().ok());
    let start = match (hour, minute) {
        (Some(hour), Some(minute)) => appointment.appointment_date.and_hms_opt(hour, minute, 0),
        _ => None,
    };
    start.map(|naive| naive.and_utc()).ok_or_else(|| StoreError::Malformed {
        collection: collections.appointments.clone(),
        message: format!(
            "appointment {} has invalid appointment_time {:?}",
            appointment.id, appointment.appointment_time
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn appointment(time: &str) -> AppointmentDoc {
        AppointmentDoc {
            id: "a1".to_string(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            appointment_time: time.to_string(),
            title: None,
            description: None,
        }
    }

    #[test]
    fn appointment_start_combines_date_and_time() {
        let start = appointment_start(&Collections::default(), &appointment("09:30")).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-06-05T09:30:00+00:00");
    }

    #[test]
    fn appointment_start_ignores_a_seconds_component() {
        let start = appointment_start(&Collections::default(), &appointment("18:00:00")).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-06-05T18:00:00+00:00");
    }

    #[test]
    fn appointment_start_rejects_garbage_times() {
        for raw in ["", "morning", "25:00", "09", "09:xx"] {
            let err = appointment_start(&Collections::default(), &appointment(raw)).unwrap_err();
            assert!(
                matches!(err, StoreError::Malformed { .. }),
                "expected malformed for {raw:?}"
            );
        }
    }
}
