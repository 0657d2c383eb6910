use chrono::{DateTime, Utc};

use crate::config::Collections;
use crate::models::{SubscriptionDoc, STATUS_ACTIVE};
use crate::store::{decode_document, DocumentStore, Filter, StoreError};

/// A user with no matching records is simply `false`, never an error.
pub async fn has_active_subscription(
    store: &dyn DocumentStore,
    collections: &Collections,
    user_id: &str,
    as_of: DateTime<Utc>,
) -> Result<bool, StoreError> {
    let page = store
        .list_documents(
            &collections.subscriptions,
            &[
                Filter::equal("user_id", [user_id]),
                Filter::equal("status", [STATUS_ACTIVE]),
            ],
        )
        .await?;
    for document in page.documents {
        let subscription: SubscriptionDoc = decode_document(&collections.subscriptions, document)?;
        if subscription.covers(as_of) {
            return Ok(true);
        }
    }
    Ok(false)
}
