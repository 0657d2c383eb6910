use actix_web::{web, HttpResponse, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::parse_iso_date;
use crate::routes::present;
use crate::rules::{eligibility, quota};
use crate::state::AppState;

#[derive(Deserialize)]
struct CanUserBookRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "appointmentDate")]
    appointment_date: Option<String>,
}

#[derive(Serialize)]
struct CanUserBookResponse {
    #[serde(rename = "canBook")]
    can_book: bool,
    #[serde(rename = "weeklyCount", skip_serializing_if = "Option::is_none")]
    weekly_count: Option<u32>,
}

#[derive(Deserialize)]
struct CountWeeklyRequest {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "weekStart")]
    week_start: Option<String>,
}

#[derive(Serialize)]
struct CountResponse {
    count: u32,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/can-user-book").route(web::post().to(can_user_book)))
        .service(web::resource("/count-weekly-bookings").route(web::post().to(count_weekly_bookings)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn can_user_book(
    state: web::Data<AppState>,
    payload: web::Json<CanUserBookRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let (Some(user_id), Some(raw_date)) =
        (present(&payload.user_id), present(&payload.appointment_date))
    else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "Parametri mancanti" })));
    };
    let Some(appointment_date) = parse_iso_date(raw_date) else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "appointmentDate non valida" })));
    };

    let decision = eligibility::can_book(
        state.store.as_ref(),
        &state.collections,
        user_id,
        appointment_date,
        Utc::now(),
    )
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(CanUserBookResponse {
        can_book: decision.eligible,
        weekly_count: decision.weekly_count,
    }))
}

async fn count_weekly_bookings(
    state: web::Data<AppState>,
    payload: web::Json<CountWeeklyRequest>,
) -> Result<HttpResponse> {
    let payload = payload.into_inner();
    let (Some(user_id), Some(raw_week)) = (present(&payload.user_id), present(&payload.week_start))
    else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "Parametri mancanti" })));
    };
    let Some(week_start) = parse_iso_date(raw_week) else {
        return Ok(HttpResponse::BadRequest().json(json!({ "error": "weekStart non valido" })));
    };

    let count = quota::count_confirmed_bookings(
        state.store.as_ref(),
        &state.collections,
        user_id,
        week_start,
    )
    .await
    .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}
