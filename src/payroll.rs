use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    ledger::{AdvanceLedger, AttendanceLedger},
    model::{AttendanceStatus, MonthlyStats, PayrollSummary},
    utils::YearMonth,
};

/// Net pay for one worker over one month
///
/// Both pending and deducted advances dated in the month count against the
/// payable amount, which is returned unclamped.
pub fn payroll_summary(attendance: &AttendanceLedger, advances: &AdvanceLedger, worker_id: Uuid, month: YearMonth) -> PayrollSummary {
    let records = attendance.query_by_month(worker_id, month);

    let total_days_worked = records.iter().filter(|r| r.is_worked()).count() as u32;
    let total_hours_worked = records.iter().map(|r| r.hours_worked).sum::<Decimal>();
    let total_earnings = records.iter().map(|r| r.earned_amount).sum::<Decimal>();

    let total_advance = advances.query_by_month(worker_id, month)
        .iter()
        .map(|a| a.amount)
        .sum::<Decimal>();

    debug_assert!(total_hours_worked >= Decimal::ZERO && total_earnings >= Decimal::ZERO);
    debug_assert!(total_advance >= Decimal::ZERO);

    PayrollSummary {
        worker_id,
        month,
        total_days_worked,
        total_hours_worked,
        total_earnings,
        total_advance,
        final_payable: total_earnings - total_advance,
    }
}

/// Per-status day counts with hour and earning totals for one worker's month
pub fn monthly_stats(attendance: &AttendanceLedger, worker_id: Uuid, month: YearMonth) -> MonthlyStats {
    attendance.query_by_month(worker_id, month)
        .into_iter()
        .fold(MonthlyStats::default(), |mut stats, record| {
            match record.status {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Absent => stats.absent += 1,
                AttendanceStatus::HalfDay => stats.half_day += 1,
            }
            stats.total_hours += record.hours_worked;
            stats.total_earnings += record.earned_amount;

            stats
        })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::model::{AttendanceMark, NewAdvance};

    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_ledgers(worker: Uuid) -> (AttendanceLedger, AdvanceLedger) {
        let mut attendance = AttendanceLedger::default();
        let today = day(2025, 8, 1);
        let wage = Decimal::from(800);

        for (date, status) in [
            (day(2025, 6, 2), AttendanceStatus::Present),
            (day(2025, 6, 3), AttendanceStatus::Absent),
            (day(2025, 6, 4), AttendanceStatus::HalfDay),
            // Neighbouring months must never leak in
            (day(2025, 5, 31), AttendanceStatus::Present),
            (day(2025, 7, 1), AttendanceStatus::Present),
        ] {
            attendance.mark_attendance(AttendanceMark {
                worker_id: worker,
                date,
                status,
                hours_worked: status.default_hours(),
                daily_wage: wage,
            }, today).unwrap();
        }

        (attendance, AdvanceLedger::default())
    }

    #[test]
    fn test_payroll_summary() {
        let worker = Uuid::new_v4();
        let (attendance, advances) = june_ledgers(worker);
        let june = YearMonth::new(2025, 6).unwrap();

        let summary = payroll_summary(&attendance, &advances, worker, june);

        assert_eq!(summary.total_days_worked, 2);
        assert_eq!(summary.total_hours_worked, Decimal::from(12));
        assert_eq!(summary.total_earnings, Decimal::from(1200));
        assert_eq!(summary.total_advance, Decimal::ZERO);
        assert_eq!(summary.final_payable, Decimal::from(1200));
    }

    #[test]
    fn test_final_payable_is_not_clamped() {
        let worker = Uuid::new_v4();
        let (attendance, mut advances) = june_ledgers(worker);
        let june = YearMonth::new(2025, 6).unwrap();

        let advance = advances.add_advance(NewAdvance {
            worker_id: worker,
            amount: Decimal::from(1500),
            date: day(2025, 6, 10),
            note: String::new(),
        }).unwrap();
        advances.add_advance(NewAdvance {
            worker_id: worker,
            amount: Decimal::from(999),
            date: day(2025, 7, 1),
            note: String::new(),
        }).unwrap();

        let summary = payroll_summary(&attendance, &advances, worker, june);
        assert_eq!(summary.total_advance, Decimal::from(1500));
        assert_eq!(summary.final_payable, Decimal::from(-300));

        // Deducted advances still count
        advances.mark_deducted(advance.id).unwrap();
        let summary = payroll_summary(&attendance, &advances, worker, june);
        assert_eq!(summary.final_payable, Decimal::from(-300));
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let worker = Uuid::new_v4();
        let (attendance, advances) = june_ledgers(worker);
        let march = YearMonth::new(2025, 3).unwrap();

        let summary = payroll_summary(&attendance, &advances, worker, march);

        assert_eq!(summary.total_days_worked, 0);
        assert_eq!(summary.total_hours_worked, Decimal::ZERO);
        assert_eq!(summary.final_payable, Decimal::ZERO);

        assert_eq!(monthly_stats(&attendance, Uuid::new_v4(), march), MonthlyStats::default());
    }

    #[test]
    fn test_monthly_stats() {
        let worker = Uuid::new_v4();
        let (attendance, _) = june_ledgers(worker);

        let stats = monthly_stats(&attendance, worker, YearMonth::new(2025, 6).unwrap());

        assert_eq!(stats, MonthlyStats {
            present: 1,
            absent: 1,
            half_day: 1,
            total_hours: Decimal::from(12),
            total_earnings: Decimal::from(1200),
        });
    }
}
