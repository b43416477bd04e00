use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    consts::MAX_NOTE_LEN,
    model::{AdvancePayment, AdvanceStatus, NewAdvance},
    utils::YearMonth,
};

use super::LedgerError;

#[derive(Debug, Clone, Default)]
pub struct AdvanceLedger {
    advances: Vec<AdvancePayment>,
}

impl AdvanceLedger {
    pub fn new(advances: impl IntoIterator<Item = AdvancePayment>) -> Self {
        Self { advances: advances.into_iter().collect() }
    }

    pub fn advances(&self) -> &[AdvancePayment] {
        &self.advances
    }

    pub fn get(&self, id: Uuid) -> Option<&AdvancePayment> {
        self.advances.iter().find(|a| a.id == id)
    }

    /// Records a new pending advance under a local id
    pub fn add_advance(&mut self, advance: NewAdvance) -> Result<AdvancePayment, LedgerError> {
        if advance.amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(advance.amount));
        }
        if advance.note.chars().count() > MAX_NOTE_LEN {
            return Err(LedgerError::InvalidNote(MAX_NOTE_LEN));
        }

        let payment = AdvancePayment {
            id: Uuid::new_v4(),
            worker_id: advance.worker_id,
            amount: advance.amount,
            date: advance.date,
            note: advance.note.trim().to_string(),
            status: AdvanceStatus::Pending,
        };
        self.advances.insert(0, payment.clone());

        Ok(payment)
    }

    /// Moves an advance to `Deducted`
    ///
    /// Returns `false` when it already was, so callers can skip the write.
    pub fn mark_deducted(&mut self, id: Uuid) -> Result<bool, LedgerError> {
        let Some(advance) = self.advances.iter_mut().find(|a| a.id == id) else {
            return Err(LedgerError::AdvanceNotFound(id));
        };

        if advance.status == AdvanceStatus::Deducted {
            return Ok(false);
        }

        advance.status = AdvanceStatus::Deducted;
        Ok(true)
    }

    /// Swaps the entry stored under `local_id` for the persisted row
    pub fn reconcile(&mut self, local_id: Uuid, persisted: AdvancePayment) {
        match self.advances.iter_mut().find(|a| a.id == local_id) {
            Some(advance) => *advance = persisted,
            None => self.advances.insert(0, persisted),
        }
    }

    pub fn worker_advances(&self, worker_id: Uuid) -> Vec<&AdvancePayment> {
        self.advances.iter()
            .filter(|a| a.worker_id == worker_id)
            .collect()
    }

    pub fn query_by_month(&self, worker_id: Uuid, month: YearMonth) -> Vec<&AdvancePayment> {
        self.advances.iter()
            .filter(|a| a.worker_id == worker_id && month.contains(a.date))
            .collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &AdvancePayment> {
        self.advances.iter().filter(|a| a.status == AdvanceStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn advance(worker_id: Uuid, amount: i64, date: NaiveDate) -> NewAdvance {
        NewAdvance {
            worker_id,
            amount: Decimal::from(amount),
            date,
            note: "site materials".to_string(),
        }
    }

    #[test]
    fn test_add_advance_starts_pending() {
        let mut ledger = AdvanceLedger::default();
        let worker = Uuid::new_v4();

        let payment = ledger.add_advance(advance(worker, 500, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap())).unwrap();

        assert_eq!(payment.status, AdvanceStatus::Pending);
        assert_eq!(payment.amount, Decimal::from(500));
        assert_eq!(ledger.get(payment.id), Some(&payment));
    }

    #[test]
    fn test_add_advance_rejects_bad_input() {
        let mut ledger = AdvanceLedger::default();
        let worker = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();

        assert!(matches!(ledger.add_advance(advance(worker, 0, date)), Err(LedgerError::InvalidAmount(_))));
        assert!(matches!(ledger.add_advance(advance(worker, -50, date)), Err(LedgerError::InvalidAmount(_))));

        let long_note = NewAdvance { note: "x".repeat(MAX_NOTE_LEN + 1), ..advance(worker, 100, date) };
        assert!(matches!(ledger.add_advance(long_note), Err(LedgerError::InvalidNote(_))));

        assert!(ledger.advances().is_empty());
    }

    #[test]
    fn test_mark_deducted_is_idempotent() {
        let mut ledger = AdvanceLedger::default();
        let payment = ledger.add_advance(advance(Uuid::new_v4(), 500, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap())).unwrap();

        assert!(ledger.mark_deducted(payment.id).unwrap());
        assert_eq!(ledger.get(payment.id).unwrap().status, AdvanceStatus::Deducted);

        assert!(!ledger.mark_deducted(payment.id).unwrap());
        assert_eq!(ledger.get(payment.id).unwrap().status, AdvanceStatus::Deducted);

        assert!(matches!(ledger.mark_deducted(Uuid::new_v4()), Err(LedgerError::AdvanceNotFound(_))));
    }

    #[test]
    fn test_query_by_month() {
        let mut ledger = AdvanceLedger::default();
        let worker = Uuid::new_v4();

        ledger.add_advance(advance(worker, 100, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap())).unwrap();
        ledger.add_advance(advance(worker, 200, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())).unwrap();
        ledger.add_advance(advance(worker, 300, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())).unwrap();
        ledger.add_advance(advance(Uuid::new_v4(), 400, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())).unwrap();

        let june = ledger.query_by_month(worker, YearMonth::new(2025, 6).unwrap());

        assert_eq!(june.len(), 1);
        assert_eq!(june[0].amount, Decimal::from(200));
        assert_eq!(ledger.worker_advances(worker).len(), 3);
    }
}
