use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{NewWorker, WorkerPatch, WorkerStatus};

use super::extractor::Session;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_workers)
        .service(create_worker)
        .service(update_worker)
        .service(set_worker_status)
        .service(delete_worker)
        .service(get_worker_attendance);
}

#[derive(Debug, Serialize, Deserialize)]
struct SetStatus {
    status: WorkerStatus,
}

#[get("")]
async fn list_workers(session: Session) -> impl Responder {
    web::Json(session.workers().to_vec())
}

#[post("")]
async fn create_worker(mut session: Session, payload: web::Json<NewWorker>) -> actix_web::Result<impl Responder> {
    let worker = session.add_worker(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(worker))
}

#[patch("/{worker_id}")]
async fn update_worker(mut session: Session, worker_id: web::Path<Uuid>, payload: web::Json<WorkerPatch>) -> actix_web::Result<impl Responder> {
    let worker = session.update_worker(*worker_id, payload.into_inner()).await?;

    Ok(web::Json(worker))
}

#[put("/{worker_id}/status")]
async fn set_worker_status(mut session: Session, worker_id: web::Path<Uuid>, payload: web::Json<SetStatus>) -> actix_web::Result<impl Responder> {
    let worker = session.set_worker_status(*worker_id, payload.status).await?;

    Ok(web::Json(worker))
}

#[delete("/{worker_id}")]
async fn delete_worker(mut session: Session, worker_id: web::Path<Uuid>) -> actix_web::Result<impl Responder> {
    session.delete_worker(*worker_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[get("/{worker_id}/attendance")]
async fn get_worker_attendance(session: Session, worker_id: web::Path<Uuid>) -> impl Responder {
    let records = session.worker_attendance(*worker_id)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    web::Json(records)
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{Method, StatusCode}, test, App};
    use rust_decimal::Decimal;
    use sea_orm::MockExecResult;

    use crate::{
        auth::Authority,
        entity::worker,
        model::{WorkType, Worker},
        pages::testing::*,
    };

    use super::*;

    #[actix_web::test]
    async fn test_create_worker() {
        let account = account();
        let inserted = worker::Model {
            name: "Suresh Patel".to_string(),
            avatar_initials: "SP".to_string(),
            ..worker_row(&account, 700)
        };

        let db = loaded_db(vec![], vec![], vec![], settings_row(&account))
            .append_query_results([
                vec![ inserted.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/workers").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/workers")
            .method(Method::POST)
            .insert_header(bearer(&account))
            .set_json(NewWorker {
                name: "Suresh Patel".to_string(),
                phone: "9865432109".to_string(),
                work_type: WorkType::Carpenter,
                daily_wage: Decimal::from(700),
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let worker: Worker = test::read_body_json(response).await;
        assert_eq!(worker.name, inserted.name);
        assert_eq!(worker.avatar_initials, "SP");
        assert_eq!(worker.status, WorkerStatus::Active);
    }

    #[actix_web::test]
    async fn test_create_worker_rejects_bad_wage() {
        let account = account();
        let db = loaded_db(vec![], vec![], vec![], settings_row(&account));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/workers").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/workers")
            .method(Method::POST)
            .insert_header(bearer(&account))
            .set_json(NewWorker {
                name: "Anil Verma".to_string(),
                phone: String::new(),
                work_type: WorkType::Helper,
                daily_wage: Decimal::from(-400),
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_delete_worker() {
        let account = account();
        let worker = worker_row(&account, 800);

        let db = loaded_db(vec![ worker.clone() ], vec![], vec![], settings_row(&account))
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 1 },
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/workers").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/workers/{}", worker.id))
            .method(Method::DELETE)
            .insert_header(bearer(&account))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn test_unknown_worker_is_not_found() {
        let account = account();
        let db = loaded_db(vec![], vec![], vec![], settings_row(&account));

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/workers").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/workers/{}/status", Uuid::new_v4()))
            .method(Method::PUT)
            .insert_header(bearer(&account))
            .set_json(SetStatus { status: WorkerStatus::Inactive })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
