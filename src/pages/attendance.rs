use actix_web::{get, patch, post, web, Responder};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ledger::LedgerError, model::{AttendancePatch, AttendanceStatus}};

use super::{extractor::Session, parse_month};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_attendance)
        .service(get_stats)
        .service(mark_attendance)
        .service(cycle_attendance)
        .service(update_attendance);
}

#[derive(Debug, Serialize, Deserialize)]
struct MonthQuery {
    worker_id: Uuid,
    month: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MarkPayload {
    worker_id: Uuid,
    date: NaiveDate,
    status: AttendanceStatus,
    /// Defaults to the status' conventional hours
    hours_worked: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CyclePayload {
    worker_id: Uuid,
    date: NaiveDate,
}

#[get("")]
async fn get_attendance(session: Session, query: web::Query<MonthQuery>) -> actix_web::Result<impl Responder> {
    let month = parse_month(&query.month)?;

    let records = session.attendance_by_month(query.worker_id, month)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    Ok(web::Json(records))
}

#[get("/stats")]
async fn get_stats(session: Session, query: web::Query<MonthQuery>) -> actix_web::Result<impl Responder> {
    let month = parse_month(&query.month)?;

    Ok(web::Json(session.monthly_stats(query.worker_id, month)))
}

#[post("")]
async fn mark_attendance(mut session: Session, payload: web::Json<MarkPayload>) -> actix_web::Result<impl Responder> {
    let MarkPayload { worker_id, date, status, hours_worked } = payload.into_inner();
    let hours_worked = hours_worked.unwrap_or_else(|| status.default_hours());

    let record = session.mark_attendance_for(worker_id, date, status, hours_worked).await?;

    Ok(web::Json(record))
}

#[post("/cycle")]
async fn cycle_attendance(mut session: Session, payload: web::Json<CyclePayload>) -> actix_web::Result<impl Responder> {
    let record = session.cycle_attendance(payload.worker_id, payload.date).await?;

    Ok(web::Json(record))
}

#[patch("/{attendance_id}")]
async fn update_attendance(mut session: Session, attendance_id: web::Path<Uuid>, payload: web::Json<AttendancePatch>) -> actix_web::Result<impl Responder> {
    let mut patch = payload.into_inner();

    // Hour corrections are priced at the worker's current wage unless told otherwise
    if patch.hours_worked.is_some() && patch.daily_wage.is_none() {
        let record = session.attendance().get(*attendance_id)
            .ok_or(LedgerError::AttendanceNotFound(*attendance_id))?;

        patch.daily_wage = session.worker(record.worker_id).map(|w| w.daily_wage);
    }

    let record = session.update_attendance(*attendance_id, patch).await?;

    Ok(web::Json(record))
}
