pub mod checkin;
pub mod eligibility;
pub mod participants;
pub mod quota;
pub mod subscription;

use std::collections::{HashMap, HashSet};

use crate::config::Collections;
use crate::models::{AppointmentDoc, BookingDoc, STATUS_CONFIRMED};
use crate::store::{decode_document, DocumentStore, Filter, StoreError};

pub(crate) async fn confirmed_bookings(
    store: &dyn DocumentStore,
    collections: &Collections,
    user_id: &str,
) -> Result<Vec<BookingDoc>, StoreError> {
    let page = store
        .list_documents(
            &collections.bookings,
            &[
                Filter::equal("user_id", [user_id]),
                Filter::equal("status", [STATUS_CONFIRMED]),
            ],
        )
        .await?;
    page.documents
        .into_iter()
        .map(|document| decode_document(&collections.bookings, document))
        .collect()
}

/// One batched fetch for every appointment the bookings reference. An absent
/// appointment is not an error here; callers fail when they reach a booking
/// pointing at one.
pub(crate) async fn appointments_by_id(
    store: &dyn DocumentStore,
    collections: &Collections,
    bookings: &[BookingDoc],
) -> Result<HashMap<String, AppointmentDoc>, StoreError> {
    let ids: HashSet<&str> = bookings
        .iter()
        .map(|booking| booking.appointment_id.as_str())
        .collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let page = store
        .list_documents(&collections.appointments, &[Filter::equal("$id", ids)])
        .await?;
    let mut appointments = HashMap::with_capacity(page.documents.len());
    for document in page.documents {
        let appointment: AppointmentDoc = decode_document(&collections.appointments, document)?;
        appointments.insert(appointment.id.clone(), appointment);
    }
    Ok(appointments)
}

pub(crate) fn missing_appointment(collections: &Collections, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collections.appointments.clone(),
        id: id.to_string(),
    }
}
