use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::routes::present;
use crate::rules::checkin::{self, CheckInOutcome, CheckInStatus};
use crate::state::AppState;

#[derive(Deserialize)]
struct CheckInRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "qrPassword")]
    qr_password: Option<String>,
}

#[derive(Serialize)]
struct CheckInResponse {
    valid: bool,
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appointment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appointment_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appointment_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    appointment_description: Option<String>,
}

impl CheckInResponse {
    fn rejected(status: CheckInStatus, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            status: status.as_str(),
            message: message.into(),
            booking_id: None,
            appointment_id: None,
            appointment_time: None,
            appointment_title: None,
            appointment_description: None,
        }
    }
}

impl From<CheckInOutcome> for CheckInResponse {
    fn from(outcome: CheckInOutcome) -> Self {
        let mut response = CheckInResponse::rejected(outcome.status, outcome.message);
        response.valid = outcome.status == CheckInStatus::Valid;
        if let Some(matched) = outcome.matched {
            response.booking_id = Some(matched.booking_id);
            response.appointment_id = Some(matched.appointment_id);
            response.appointment_time = Some(matched.appointment_time);
            response.appointment_title = matched.appointment_title;
            response.appointment_description = matched.appointment_description;
        }
        response
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/validate-check-in").route(web::post().to(validate_check_in)));
}

async fn validate_check_in(
    state: web::Data<AppState>,
    payload: web::Json<CheckInRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let (Some(user_id), Some(qr_password)) =
        (present(&payload.user_id), present(&payload.qr_password))
    else {
        return Ok(HttpResponse::BadRequest()
            .json(CheckInResponse::rejected(CheckInStatus::InvalidQr, "Parametri mancanti")));
    };

    let outcome = checkin::validate_check_in(
        state.store.as_ref(),
        &state.collections,
        user_id,
        qr_password,
        Utc::now(),
    )
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(CheckInResponse::from(outcome)))
}
