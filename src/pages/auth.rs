use actix_web::{get, post, web, HttpResponse, Responder};
use chrono::Local;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{auth::{hash_password, Authority}, entity::{account, prelude::*}};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(register)
        .service(login)
        .service(whoami);
}

#[derive(Debug, Serialize, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[post("/register")]
async fn register(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<Credentials>) -> actix_web::Result<impl Responder> {
    let username = credentials.username.trim();
    if username.is_empty() || credentials.password.is_empty() {
        return Err(actix_web::error::ErrorBadRequest("username and password are required"));
    }

    let existing = Account::find()
        .filter(account::Column::Username.eq(username))
        .one(db.get_ref()).await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if existing.is_some() {
        warn!(username, "registration with a taken username");
        return Err(actix_web::error::ErrorConflict("username is taken"));
    }

    let model = Account::insert(account::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        username: Set(username.to_string()),
        password: Set(hash_password(username, &credentials.password)),
    }).exec_with_returning(db.get_ref()).await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    info!(account_id = %model.id, "account registered");

    let token = authority.issue_for(&model.into())?;

    Ok(HttpResponse::Created().body(token))
}

#[post("/login")]
async fn login(db: web::Data<DatabaseConnection>, authority: web::Data<Authority>, credentials: web::Json<Credentials>) -> actix_web::Result<impl Responder> {
    let hashed_password = hash_password(&credentials.username, &credentials.password);

    let Some(model) = Account::find()
        .filter(account::Column::Username.eq(&credentials.username))
        .filter(account::Column::Password.eq(hashed_password))
        .one(db.get_ref()).await
        .map_err(actix_web::error::ErrorInternalServerError)?
    else {
        return Err(actix_web::error::ErrorForbidden("invalid credentials"));
    };

    Ok(authority.issue_for(&model.into())?)
}

#[get("")]
async fn whoami(account: crate::auth::Account) -> impl Responder {
    web::Json(account)
}
