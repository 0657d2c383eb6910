use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::routes::present;
use crate::rules::participants;
use crate::state::AppState;

#[derive(Deserialize)]
struct UpdateParticipantsRequest {
    #[serde(rename = "appointmentId")]
    appointment_id: Option<String>,
}

#[derive(Serialize)]
struct UpdateParticipantsResponse {
    updated: bool,
    current_participants: u64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/update-current-participants")
            .route(web::post().to(update_current_participants)),
    );
}

async fn update_current_participants(
    state: web::Data<AppState>,
    payload: web::Json<UpdateParticipantsRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let Some(appointment_id) = present(&payload.appointment_id) else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "appointmentId mancante" })));
    };

    let count = participants::recompute_participants(
        state.store.as_ref(),
        &state.collections,
        appointment_id,
        Utc::now(),
    )
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(UpdateParticipantsResponse {
        updated: true,
        current_participants: count,
    }))
}
