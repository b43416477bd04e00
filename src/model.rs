//! Domain types shared by the ledgers, the workspace and the HTTP pages
//!
//! These never carry account or audit columns; the store maps them to and
//! from entity rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    consts::{DEFAULT_COMPANY_NAME, FULL_DAY_HOURS, HALF_DAY_HOURS},
    utils::YearMonth,
};

pub use crate::entity::sea_orm_active_enums::{AdvanceStatus, AttendanceStatus, CurrencyCode, WorkType, WorkerStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub work_type: WorkType,
    pub daily_wage: Decimal,
    pub status: WorkerStatus,
    pub joined_at: NaiveDate,
    pub avatar_initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorker {
    pub name: String,
    pub phone: String,
    pub work_type: WorkType,
    pub daily_wage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub work_type: Option<WorkType>,
    pub daily_wage: Option<Decimal>,
    pub status: Option<WorkerStatus>,
}

/// One day's attendance for one worker
///
/// `earned_amount` is a snapshot taken at marking time and does not follow
/// later wage changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub hours_worked: Decimal,
    pub earned_amount: Decimal,
}

impl AttendanceRecord {
    pub fn is_worked(&self) -> bool {
        matches!(self.status, AttendanceStatus::Present | AttendanceStatus::HalfDay)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub hours_worked: Decimal,
    pub daily_wage: Decimal,
}

/// Targeted correction of an attendance record
///
/// Changing `hours_worked` needs the `daily_wage` to recompute the earned
/// amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePatch {
    pub status: Option<AttendanceStatus>,
    pub hours_worked: Option<Decimal>,
    pub daily_wage: Option<Decimal>,
}

impl AttendanceStatus {
    /// Hours conventionally credited for this status
    pub fn default_hours(&self) -> Decimal {
        match self {
            AttendanceStatus::Present => Decimal::from(FULL_DAY_HOURS),
            AttendanceStatus::Absent => Decimal::ZERO,
            AttendanceStatus::HalfDay => Decimal::from(HALF_DAY_HOURS),
        }
    }

    /// Next status in the marking cycle, starting from an unmarked day
    ///
    /// Unmarked -> Present -> Absent -> Half-Day -> Present -> ...
    pub fn cycle(current: Option<AttendanceStatus>) -> AttendanceStatus {
        match current {
            None | Some(AttendanceStatus::HalfDay) => AttendanceStatus::Present,
            Some(AttendanceStatus::Present) => AttendanceStatus::Absent,
            Some(AttendanceStatus::Absent) => AttendanceStatus::HalfDay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePayment {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: String,
    pub status: AdvanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdvance {
    pub worker_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    pub worker_id: Uuid,
    pub month: YearMonth,
    pub total_days_worked: u32,
    pub total_hours_worked: Decimal,
    pub total_earnings: Decimal,
    pub total_advance: Decimal,
    /// Signed; negative when advances exceed earnings
    pub final_payable: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub present: u32,
    pub absent: u32,
    pub half_day: u32,
    pub total_hours: Decimal,
    pub total_earnings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub company_name: String,
    pub contractor_name: String,
    pub contact_number: String,
    pub currency: CurrencyCode,
    pub currency_symbol: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            contractor_name: String::new(),
            contact_number: String::new(),
            currency: CurrencyCode::Inr,
            currency_symbol: CurrencyCode::Inr.symbol().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub company_name: Option<String>,
    pub contractor_name: Option<String>,
    pub contact_number: Option<String>,
    pub currency: Option<CurrencyCode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cycle() {
        let first = AttendanceStatus::cycle(None);
        let second = AttendanceStatus::cycle(Some(first));
        let third = AttendanceStatus::cycle(Some(second));
        let fourth = AttendanceStatus::cycle(Some(third));

        assert_eq!(
            [first, second, third, fourth],
            [AttendanceStatus::Present, AttendanceStatus::Absent, AttendanceStatus::HalfDay, AttendanceStatus::Present],
        );

        assert_eq!(first.default_hours(), Decimal::from(8));
        assert_eq!(second.default_hours(), Decimal::ZERO);
        assert_eq!(third.default_hours(), Decimal::from(4));
    }
}
