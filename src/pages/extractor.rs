use std::ops::{Deref, DerefMut};

use actix_web::{dev, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::{auth::Account, ledger::LedgerError, store::SeaOrmStore, workspace::Workspace};

/// The caller's workspace, loaded from the database for this request
///
/// It lives only as long as the request. A durable write that fails is
/// logged by the failure handler and answered with a 500; nothing stays
/// queued for a later retry, so the client repeats the request instead.
pub(super) struct Session(pub(super) Workspace<SeaOrmStore>);

impl Deref for Session {
    type Target = Workspace<SeaOrmStore>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let account = Account::from_request(&req, &mut dev::Payload::None).await?;

            let Some(db) = req.app_data::<web::Data<DatabaseConnection>>() else {
                return Err(actix_web::error::ErrorInternalServerError("database is not configured"))
            };

            let store = SeaOrmStore::new(db.clone().into_inner(), account.id);
            let account_id = account.id;
            let workspace = Workspace::load(store).await
                .map_err(LedgerError::from)?
                .on_failure(move |write, err| {
                    warn!(%account_id, write = ?write, error = %err, "write dropped with the request");
                });

            Ok(Self(workspace))
        })
    }
}
