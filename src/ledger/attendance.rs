use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::{
    model::{AttendanceMark, AttendancePatch, AttendanceRecord, AttendanceStatus},
    utils::YearMonth,
    wage::calculate_earnings,
};

use super::{validate_hours, validate_wage, LedgerError};

/// Attendance records of one account, at most one per `(worker_id, date)`
///
/// Newest insertions sit at the front, matching the date-descending order the
/// store lists them in.
#[derive(Debug, Clone, Default)]
pub struct AttendanceLedger {
    records: Vec<AttendanceRecord>,
}

impl AttendanceLedger {
    /// Builds a ledger from stored rows; a repeated natural key keeps its first row
    pub fn new(records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        let mut ledger = Self::default();

        for record in records {
            if ledger.position(record.worker_id, record.date).is_none() {
                ledger.records.push(record);
            }
        }

        ledger
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find(&self, worker_id: Uuid, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.position(worker_id, date).map(|idx| &self.records[idx])
    }

    fn position(&self, worker_id: Uuid, date: NaiveDate) -> Option<usize> {
        self.records.iter().position(|r| r.worker_id == worker_id && r.date == date)
    }

    /// Upserts the record for `(worker_id, date)` and returns it
    ///
    /// An existing entry keeps its identity; a new one gets a local id until
    /// the store reconciles it.
    pub fn mark_attendance(&mut self, mark: AttendanceMark, today: NaiveDate) -> Result<AttendanceRecord, LedgerError> {
        if mark.date > today {
            return Err(LedgerError::FutureDate(mark.date));
        }
        validate_hours(mark.hours_worked)?;
        validate_wage(mark.daily_wage)?;

        let earned_amount = calculate_earnings(mark.daily_wage, mark.hours_worked);

        let record = match self.position(mark.worker_id, mark.date) {
            Some(idx) => {
                let existing = &mut self.records[idx];
                existing.status = mark.status;
                existing.hours_worked = mark.hours_worked;
                existing.earned_amount = earned_amount;

                existing.clone()
            },
            None => {
                let record = AttendanceRecord {
                    id: Uuid::new_v4(),
                    worker_id: mark.worker_id,
                    date: mark.date,
                    status: mark.status,
                    hours_worked: mark.hours_worked,
                    earned_amount,
                };
                self.records.insert(0, record.clone());

                record
            },
        };

        debug!(worker_id = %record.worker_id, date = %record.date, status = ?record.status, "attendance marked locally");

        Ok(record)
    }

    /// Advances the status of `(worker_id, date)` one step around the cycle
    pub fn cycle_status(&mut self, worker_id: Uuid, date: NaiveDate, daily_wage: Decimal, today: NaiveDate) -> Result<AttendanceRecord, LedgerError> {
        if date > today {
            return Err(LedgerError::FutureDate(date));
        }

        let current = self.find(worker_id, date).map(|r| r.status);
        let status = AttendanceStatus::cycle(current);

        self.mark_attendance(AttendanceMark {
            worker_id,
            date,
            status,
            hours_worked: status.default_hours(),
            daily_wage,
        }, today)
    }

    /// Applies a correction to the record with identity `id`
    pub fn update_attendance(&mut self, id: Uuid, patch: &AttendancePatch) -> Result<AttendanceRecord, LedgerError> {
        if let Some(hours) = patch.hours_worked {
            validate_hours(hours)?;
        }
        if let Some(wage) = patch.daily_wage {
            validate_wage(wage)?;
        }

        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Err(LedgerError::AttendanceNotFound(id));
        };

        match (patch.hours_worked, patch.daily_wage) {
            (Some(_), None) => return Err(LedgerError::MissingWage),
            (hours, Some(wage)) => {
                let hours = hours.unwrap_or(record.hours_worked);
                record.hours_worked = hours;
                record.earned_amount = calculate_earnings(wage, hours);
            },
            (None, None) => {},
        }

        if let Some(status) = patch.status {
            record.status = status;
        }

        Ok(record.clone())
    }

    /// Replaces the local entry for the persisted row's natural key
    pub fn reconcile(&mut self, persisted: AttendanceRecord) {
        match self.position(persisted.worker_id, persisted.date) {
            Some(idx) => self.records[idx] = persisted,
            None => self.records.insert(0, persisted),
        }
    }

    pub fn worker_attendance(&self, worker_id: Uuid) -> Vec<&AttendanceRecord> {
        self.records.iter()
            .filter(|r| r.worker_id == worker_id)
            .collect()
    }

    pub fn query_by_month(&self, worker_id: Uuid, month: YearMonth) -> Vec<&AttendanceRecord> {
        self.records.iter()
            .filter(|r| r.worker_id == worker_id && month.contains(r.date))
            .collect()
    }

    pub fn in_month(&self, month: YearMonth) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter().filter(move |r| month.contains(r.date))
    }
}
