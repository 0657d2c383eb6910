#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use gymgate::config::Collections;
use gymgate::models::{SETTING_EARLY_MINUTES, SETTING_LATE_MINUTES, SETTING_QR_PASSWORD};
use gymgate::store::MemoryStore;

pub fn collections() -> Collections {
    Collections::default()
}

pub fn instant(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

pub fn booking(id: &str, user_id: &str, appointment_id: &str, status: &str) -> Value {
    json!({
        "$id": id,
        "user_id": user_id,
        "appointment_id": appointment_id,
        "status": status,
    })
}

pub fn appointment(id: &str, date: &str, time: &str, title: &str) -> Value {
    json!({
        "$id": id,
        "appointment_date": date,
        "appointment_time": time,
        "title": title,
        "current_participants": 0,
    })
}

pub fn subscription(id: &str, user_id: &str, status: &str) -> Value {
    json!({
        "$id": id,
        "user_id": user_id,
        "status": status,
    })
}

pub fn bounded_subscription(
    id: &str,
    user_id: &str,
    status: &str,
    start: &str,
    end: &str,
) -> Value {
    json!({
        "$id": id,
        "user_id": user_id,
        "status": status,
        "start_date": start,
        "end_date": end,
    })
}

pub fn setting(key: &str, value: &str) -> Value {
    json!({
        "$id": format!("setting-{key}"),
        "setting_key": key,
        "setting_value": value,
    })
}

/// Store preloaded with the QR password and explicit check-in windows.
pub fn checkin_store(password: &str, early: &str, late: &str) -> MemoryStore {
    let store = MemoryStore::new();
    let cols = collections();
    store.insert(&cols.settings, setting(SETTING_QR_PASSWORD, password));
    store.insert(&cols.settings, setting(SETTING_EARLY_MINUTES, early));
    store.insert(&cols.settings, setting(SETTING_LATE_MINUTES, late));
    store
}
