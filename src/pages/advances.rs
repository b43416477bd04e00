use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::NewAdvance;

use super::{extractor::Session, parse_month};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_advances)
        .service(add_advance)
        .service(deduct_advance);
}

#[derive(Debug, Serialize, Deserialize)]
struct AdvanceQuery {
    worker_id: Uuid,
    /// Without a month every advance of the worker is listed
    month: Option<String>,
}

#[get("")]
async fn get_advances(session: Session, query: web::Query<AdvanceQuery>) -> actix_web::Result<impl Responder> {
    let advances = match query.month.as_deref() {
        Some(month) => session.advances_by_month(query.worker_id, parse_month(month)?),
        None => session.advances().worker_advances(query.worker_id),
    };

    Ok(web::Json(advances.into_iter().cloned().collect::<Vec<_>>()))
}

#[post("")]
async fn add_advance(mut session: Session, payload: web::Json<NewAdvance>) -> actix_web::Result<impl Responder> {
    let advance = session.add_advance(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(advance))
}

#[post("/{advance_id}/deduct")]
async fn deduct_advance(mut session: Session, advance_id: web::Path<Uuid>) -> actix_web::Result<impl Responder> {
    let advance = session.mark_deducted(*advance_id).await?;

    Ok(web::Json(advance))
}
