use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::config::Collections;
use crate::models::STATUS_CONFIRMED;
use crate::store::{DocumentStore, Filter, StoreError};

/// Always a full recount, never an increment, so redundant calls converge.
pub async fn recompute_participants(
    store: &dyn DocumentStore,
    collections: &Collections,
    appointment_id: &str,
    now: DateTime<Utc>,
) -> Result<u64, StoreError> {
    let page = store
        .list_documents(
            &collections.bookings,
            &[
                Filter::equal("appointment_id", [appointment_id]),
                Filter::equal("status", [STATUS_CONFIRMED]),
            ],
        )
        .await?;
    let count = page.total;

    store
        .update_document(
            &collections.appointments,
            appointment_id,
            json!({
                "current_participants": count,
                "updated_at": now.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        )
        .await?;

    log::info!("Appointment {appointment_id} now has {count} participants");
    Ok(count)
}
