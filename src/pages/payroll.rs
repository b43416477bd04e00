use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{extractor::Session, parse_month};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_summary)
        .service(get_all);
}

#[derive(Debug, Serialize, Deserialize)]
struct SummaryQuery {
    worker_id: Uuid,
    month: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct MonthQuery {
    month: String,
}

#[get("")]
async fn get_summary(session: Session, query: web::Query<SummaryQuery>) -> actix_web::Result<impl Responder> {
    let month = parse_month(&query.month)?;

    Ok(web::Json(session.payroll_summary(query.worker_id, month)))
}

#[get("/all")]
async fn get_all(session: Session, query: web::Query<MonthQuery>) -> actix_web::Result<impl Responder> {
    let month = parse_month(&query.month)?;

    Ok(web::Json(session.payroll_for_month(month)))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::{
        auth::Authority,
        entity::sea_orm_active_enums::AttendanceStatus,
        model::PayrollSummary,
        pages::testing::*,
    };

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    #[actix_web::test]
    async fn test_summary_can_go_negative() {
        let account = account();
        let worker = worker_row(&account, 800);

        let db = loaded_db(
            vec![ worker.clone() ],
            vec![
                attendance_row(&worker, date(2), AttendanceStatus::Present, 8, 800),
                attendance_row(&worker, date(3), AttendanceStatus::HalfDay, 4, 400),
            ],
            vec![ advance_row(&worker, date(4), 1500) ],
            settings_row(&account),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/payroll?worker_id={}&month=2025-06", worker.id))
            .insert_header(bearer(&account))
            .to_request();

        let summary: PayrollSummary = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summary.total_days_worked, 2);
        assert_eq!(summary.total_hours_worked, Decimal::from(12));
        assert_eq!(summary.total_earnings, Decimal::from(1200));
        assert_eq!(summary.total_advance, Decimal::from(1500));
        assert_eq!(summary.final_payable, Decimal::from(-300));
    }

    #[actix_web::test]
    async fn test_payroll_for_every_worker() {
        let account = account();
        let first = worker_row(&account, 800);
        let second = worker_row(&account, 600);

        let db = loaded_db(
            vec![ first.clone(), second.clone() ],
            vec![ attendance_row(&first, date(2), AttendanceStatus::Present, 8, 800) ],
            vec![],
            settings_row(&account),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/payroll/all?month=2025-06")
            .insert_header(bearer(&account))
            .to_request();

        let summaries: Vec<PayrollSummary> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].worker_id, first.id);
        assert_eq!(summaries[0].final_payable, Decimal::from(800));
        assert_eq!(summaries[1].total_days_worked, 0);
        assert_eq!(summaries[1].final_payable, Decimal::ZERO);
    }
}
