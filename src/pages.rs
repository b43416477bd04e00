use actix_web::web;

use crate::{ledger::LedgerError, utils::YearMonth};

mod advances;
mod attendance;
mod auth;
mod extractor;
mod payroll;
mod reports;
mod settings;
mod workers;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/auth")
            .configure(auth::config))
        .service(web::scope("/workers")
            .configure(workers::config))
        .service(web::scope("/attendance")
            .configure(attendance::config))
        .service(web::scope("/advances")
            .configure(advances::config))
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/reports")
            .configure(reports::config))
        .service(web::scope("/settings")
            .configure(settings::config));
}

fn parse_month(month: &str) -> Result<YearMonth, LedgerError> {
    month.parse().map_err(|err: crate::utils::InvalidYearMonth| LedgerError::InvalidMonth(err.to_string()))
}
