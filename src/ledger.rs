use actix_web::{body, http::{header::ContentType, StatusCode}, HttpResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{consts::FULL_DAY_HOURS, store::StoreError};

pub use advance::AdvanceLedger;
pub use attendance::AttendanceLedger;

mod advance;
mod attendance;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("hours worked must be between 0 and {FULL_DAY_HOURS}, got {0}")]
    InvalidHours(Decimal),
    #[error("daily wage must be positive, got {0}")]
    InvalidWage(Decimal),
    #[error("advance amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("note is longer than {0} characters")]
    InvalidNote(usize),
    #[error("worker name must not be blank")]
    InvalidName,
    #[error("{0}")]
    InvalidMonth(String),
    #[error("changing hours worked requires the daily wage")]
    MissingWage,
    #[error("cannot mark attendance for {0}, it is in the future")]
    FutureDate(NaiveDate),
    #[error("worker `{0}` not found")]
    WorkerNotFound(Uuid),
    #[error("attendance record `{0}` not found")]
    AttendanceNotFound(Uuid),
    #[error("advance `{0}` not found")]
    AdvanceNotFound(Uuid),
    #[error("durable write failed: {0}")]
    Store(#[from] StoreError),
}

impl actix_web::error::ResponseError for LedgerError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        if self.status_code().is_client_error() {
            warn!(error = %self, "request rejected");
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::WorkerNotFound(_)
            | LedgerError::AttendanceNotFound(_)
            | LedgerError::AdvanceNotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

pub(crate) fn validate_hours(hours: Decimal) -> Result<(), LedgerError> {
    if hours < Decimal::ZERO || hours > Decimal::from(FULL_DAY_HOURS) {
        return Err(LedgerError::InvalidHours(hours));
    }

    Ok(())
}

pub(crate) fn validate_wage(wage: Decimal) -> Result<(), LedgerError> {
    if wage <= Decimal::ZERO {
        return Err(LedgerError::InvalidWage(wage));
    }

    Ok(())
}
