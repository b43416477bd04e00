use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{consts::MAX_TREND_MONTHS, ledger::LedgerError, utils::YearMonth};

use super::{extractor::Session, parse_month};

const DEFAULT_TREND_MONTHS: usize = 6;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_overview)
        .service(get_trend);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TrendQuery {
    /// Last month of the window, the current month when absent
    month: Option<String>,
    months: Option<usize>,
    worker_id: Option<Uuid>,
}

#[get("/overview")]
async fn get_overview(session: Session) -> impl Responder {
    web::Json(session.overview())
}

#[get("/trend")]
async fn get_trend(session: Session, query: web::Query<TrendQuery>) -> actix_web::Result<impl Responder> {
    let end = match query.month.as_deref() {
        Some(month) => parse_month(month)?,
        None => YearMonth::of(session.today()),
    };
    let months = query.months.unwrap_or(DEFAULT_TREND_MONTHS);
    if !(1..=MAX_TREND_MONTHS).contains(&months) {
        return Err(LedgerError::InvalidMonth(format!("trend covers 1 to {MAX_TREND_MONTHS} months, got {months}")).into());
    }

    Ok(web::Json(session.monthly_trend(query.worker_id, end, months)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::{
        auth::Authority,
        entity::{sea_orm_active_enums::{AttendanceStatus, WorkerStatus}, worker},
        pages::testing::*,
        reports::{MonthTrend, Overview},
    };

    use super::*;

    #[actix_web::test]
    async fn test_overview() {
        let account = account();
        let active = worker_row(&account, 800);
        let inactive = worker::Model { status: WorkerStatus::Inactive, ..worker_row(&account, 500) };
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();

        let db = loaded_db(
            vec![ active.clone(), inactive ],
            vec![ attendance_row(&active, day, AttendanceStatus::Present, 8, 800) ],
            vec![ advance_row(&active, day, 300) ],
            settings_row(&account),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/reports").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/reports/overview")
            .insert_header(bearer(&account))
            .to_request();

        let overview: Overview = test::call_and_read_body_json(&app, req).await;
        assert_eq!(overview.total_workers, 2);
        assert_eq!(overview.active_workers, 1);
        assert_eq!(overview.total_earnings, Decimal::from(800));
        assert_eq!(overview.pending_advances, Decimal::from(300));
    }

    #[actix_web::test]
    async fn test_trend_window() {
        let account = account();
        let worker = worker_row(&account, 800);

        let db = loaded_db(
            vec![ worker.clone() ],
            vec![
                attendance_row(&worker, NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(), AttendanceStatus::Present, 8, 800),
                attendance_row(&worker, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), AttendanceStatus::Absent, 0, 0),
            ],
            vec![],
            settings_row(&account),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/reports").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!("/reports/trend?month=2025-06&months=3&worker_id={}", worker.id))
            .insert_header(bearer(&account))
            .to_request();

        let trend: Vec<MonthTrend> = test::call_and_read_body_json(&app, req).await;
        let months = trend.iter().map(|t| t.month.to_string()).collect::<Vec<_>>();
        assert_eq!(months, ["2025-04", "2025-05", "2025-06"]);
        assert_eq!(trend[1].present, 1);
        assert_eq!(trend[1].earnings, Decimal::from(800));
        assert_eq!(trend[2].absent, 1);
    }

    #[actix_web::test]
    async fn test_trend_window_out_of_range() {
        let account = account();
        let db = load_into(
            loaded_db(vec![], vec![], vec![], settings_row(&account)),
            vec![], vec![], vec![], settings_row(&account),
        );

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(SECRET)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/reports").configure(config))
        ).await;

        for months in ["0", "18446744073709551615"] {
            let req = test::TestRequest::default()
                .uri(&format!("/reports/trend?month=2025-06&months={months}"))
                .insert_header(bearer(&account))
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "months={months}");
        }
    }
}
