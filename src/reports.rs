use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    consts::MAX_TREND_MONTHS,
    ledger::{AdvanceLedger, AttendanceLedger},
    model::{AttendanceStatus, Worker, WorkerStatus},
    utils::{trailing_months, YearMonth},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_workers: u32,
    pub active_workers: u32,
    pub total_earnings: Decimal,
    pub total_advances: Decimal,
    pub pending_advances: Decimal,
    pub pending_advance_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTrend {
    pub month: YearMonth,
    pub present: u32,
    pub absent: u32,
    pub earnings: Decimal,
}

/// Account-wide totals across every record, regardless of month
pub fn overview(workers: &[Worker], attendance: &AttendanceLedger, advances: &AdvanceLedger) -> Overview {
    Overview {
        total_workers: workers.len() as u32,
        active_workers: workers.iter().filter(|w| w.status == WorkerStatus::Active).count() as u32,
        total_earnings: attendance.records().iter().map(|r| r.earned_amount).sum(),
        total_advances: advances.advances().iter().map(|a| a.amount).sum(),
        pending_advances: advances.pending().map(|a| a.amount).sum(),
        pending_advance_count: advances.pending().count() as u32,
    }
}

/// Attendance and earnings per month for the `months` months ending at `end`
///
/// `worker` narrows the trend to one worker; `None` covers the whole crew.
/// The window is capped at [`MAX_TREND_MONTHS`].
pub fn monthly_trend(attendance: &AttendanceLedger, worker: Option<Uuid>, end: YearMonth, months: usize) -> Vec<MonthTrend> {
    trailing_months(end, months.min(MAX_TREND_MONTHS))
        .into_iter()
        .map(|month| {
            let records = attendance.in_month(month)
                .filter(|r| worker.is_none_or(|id| r.worker_id == id))
                .collect::<Vec<_>>();

            MonthTrend {
                month,
                present: records.iter().filter(|r| r.status == AttendanceStatus::Present).count() as u32,
                absent: records.iter().filter(|r| r.status == AttendanceStatus::Absent).count() as u32,
                earnings: records.iter().map(|r| r.earned_amount).sum(),
            }
        })
        .collect()
}
