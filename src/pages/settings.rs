use actix_web::{get, patch, web, Responder};

use crate::model::SettingsPatch;

use super::extractor::Session;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_settings)
        .service(update_settings);
}

#[get("")]
async fn get_settings(session: Session) -> impl Responder {
    web::Json(session.settings().clone())
}

#[patch("")]
async fn update_settings(mut session: Session, payload: web::Json<SettingsPatch>) -> actix_web::Result<impl Responder> {
    let settings = session.update_settings(payload.into_inner()).await?;

    Ok(web::Json(settings))
}
