use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    ledger::{validate_wage, AdvanceLedger, AttendanceLedger, LedgerError},
    model::{
        AdvancePayment, AdvanceStatus, AppSettings, AttendanceMark, AttendancePatch, AttendanceRecord,
        AttendanceStatus, MonthlyStats, NewAdvance, NewWorker, PayrollSummary, SettingsPatch, Worker,
        WorkerPatch, WorkerStatus,
    },
    payroll,
    reports::{self, MonthTrend, Overview},
    store::{RecordStore, StoreError},
    utils::{initials, YearMonth},
};

/// A durable write issued after the local state was already changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    InsertWorker(Worker),
    UpdateWorker(Worker),
    DeleteWorker(Uuid),
    UpsertAttendance(AttendanceRecord),
    UpdateAttendance(AttendanceRecord),
    InsertAdvance(AdvancePayment),
    DeductAdvance(Uuid),
    Settings(AppSettings),
}

impl PendingWrite {
    /// Whether this write leaves an older queued `other` with nothing to do
    fn supersedes(&self, other: &PendingWrite) -> bool {
        match (self, other) {
            (
                PendingWrite::UpsertAttendance(new) | PendingWrite::UpdateAttendance(new),
                PendingWrite::UpsertAttendance(old) | PendingWrite::UpdateAttendance(old),
            ) => new.worker_id == old.worker_id && new.date == old.date,
            (PendingWrite::UpdateWorker(new), PendingWrite::UpdateWorker(old)) => new.id == old.id,
            (PendingWrite::Settings(_), PendingWrite::Settings(_)) => true,
            _ => false,
        }
    }
}

pub type FailureHandler = Box<dyn Fn(&PendingWrite, &StoreError) + Send + Sync>;

/// Everything one account sees, kept in memory and written through to `S`
///
/// Mutations update local state first and then write durably. A failed write
/// stays queued for [`Workspace::retry_pending`], is reported to the failure
/// handler and comes back as [`LedgerError::Store`]. A newer write to the same
/// record, worker or settings replaces whatever was queued for it.
pub struct Workspace<S> {
    store: S,
    workers: Vec<Worker>,
    attendance: AttendanceLedger,
    advances: AdvanceLedger,
    settings: AppSettings,
    clock: fn() -> NaiveDate,
    on_failure: FailureHandler,
    pending: Vec<PendingWrite>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl<S: RecordStore> Workspace<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            workers: Vec::new(),
            attendance: AttendanceLedger::default(),
            advances: AdvanceLedger::default(),
            settings: AppSettings::default(),
            clock: local_today,
            on_failure: Box::new(|_, _| {}),
            pending: Vec::new(),
        }
    }

    /// Pulls every collection of the account from `store`
    ///
    /// An account without a settings row gets one holding the defaults.
    pub async fn load(store: S) -> Result<Self, StoreError> {
        let workers = store.list_workers().await?;
        let attendance = store.list_attendance().await?;
        let advances = store.list_advances().await?;
        let settings = match store.get_settings().await? {
            Some(settings) => settings,
            None => store.upsert_settings(&AppSettings::default()).await?,
        };

        Ok(Self {
            workers,
            attendance: AttendanceLedger::new(attendance),
            advances: AdvanceLedger::new(advances),
            settings,
            ..Self::new(store)
        })
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn on_failure(mut self, handler: impl Fn(&PendingWrite, &StoreError) + Send + Sync + 'static) -> Self {
        self.on_failure = Box::new(handler);
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pending(&self) -> &[PendingWrite] {
        &self.pending
    }

    async fn dispatch(&mut self, write: &PendingWrite) -> Result<(), StoreError> {
        match write {
            PendingWrite::InsertWorker(worker) => {
                let persisted = self.store.insert_worker(worker).await?;
                self.reconcile_worker(persisted);
            },
            PendingWrite::UpdateWorker(worker) => {
                let persisted = self.store.update_worker(worker).await?;
                self.reconcile_worker(persisted);
            },
            PendingWrite::DeleteWorker(id) => {
                self.store.delete_worker(*id).await?;
            },
            PendingWrite::UpsertAttendance(record) => {
                let persisted = self.store.upsert_attendance(record).await?;
                self.attendance.reconcile(persisted);
            },
            PendingWrite::UpdateAttendance(record) => {
                let persisted = self.store.update_attendance(record).await?;
                self.attendance.reconcile(persisted);
            },
            PendingWrite::InsertAdvance(advance) => {
                let persisted = self.store.insert_advance(advance).await?;
                self.advances.reconcile(advance.id, persisted);
            },
            PendingWrite::DeductAdvance(id) => {
                let persisted = self.store.update_advance_status(*id, AdvanceStatus::Deducted).await?;
                self.advances.reconcile(*id, persisted);
            },
            PendingWrite::Settings(settings) => {
                self.settings = self.store.upsert_settings(settings).await?;
            },
        }

        Ok(())
    }

    async fn persist(&mut self, write: PendingWrite) -> Result<(), LedgerError> {
        // The row may not exist yet while its insert is queued, so the full record goes out as an upsert
        let write = match write {
            PendingWrite::UpdateAttendance(record) if self.pending.iter().any(|old| matches!(old, PendingWrite::UpsertAttendance(queued) if queued.worker_id == record.worker_id && queued.date == record.date)) => {
                PendingWrite::UpsertAttendance(record)
            },
            write => write,
        };

        let queued = self.pending.len();
        self.pending.retain(|old| !write.supersedes(old));
        if self.pending.len() < queued {
            debug!(write = ?write, dropped = queued - self.pending.len(), "superseded queued writes");
        }

        match self.dispatch(&write).await {
            Ok(()) => {
                info!(write = ?write, "durable write applied");
                Ok(())
            },
            Err(err) => {
                error!(write = ?write, error = %err, "durable write failed, queued for retry");
                (self.on_failure)(&write, &err);
                self.pending.push(write);

                Err(err.into())
            },
        }
    }

    /// Replays queued writes in order, stopping at the first that fails again
    pub async fn retry_pending(&mut self) -> Result<(), LedgerError> {
        let mut queue = std::mem::take(&mut self.pending).into_iter();

        while let Some(write) = queue.next() {
            if let Err(err) = self.dispatch(&write).await {
                warn!(write = ?write, error = %err, "retry failed");
                self.pending.push(write);
                self.pending.extend(queue);

                return Err(err.into());
            }
        }

        Ok(())
    }

    fn reconcile_worker(&mut self, persisted: Worker) {
        match self.workers.iter_mut().find(|w| w.id == persisted.id) {
            Some(worker) => *worker = persisted,
            None => self.workers.insert(0, persisted),
        }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn active_workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter().filter(|w| w.status == WorkerStatus::Active)
    }

    pub fn worker(&self, id: Uuid) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == id)
    }

    fn worker_mut(&mut self, id: Uuid) -> Result<&mut Worker, LedgerError> {
        self.workers.iter_mut()
            .find(|w| w.id == id)
            .ok_or(LedgerError::WorkerNotFound(id))
    }

    pub async fn add_worker(&mut self, new: NewWorker) -> Result<Worker, LedgerError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidName);
        }
        validate_wage(new.daily_wage)?;

        let worker = Worker {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: new.phone.trim().to_string(),
            work_type: new.work_type,
            daily_wage: new.daily_wage,
            status: WorkerStatus::Active,
            joined_at: self.today(),
            avatar_initials: initials(name),
        };
        self.workers.insert(0, worker.clone());

        self.persist(PendingWrite::InsertWorker(worker.clone())).await?;

        Ok(self.worker(worker.id).cloned().unwrap_or(worker))
    }

    pub async fn update_worker(&mut self, id: Uuid, patch: WorkerPatch) -> Result<Worker, LedgerError> {
        let name = match patch.name.as_deref().map(str::trim) {
            Some("") => return Err(LedgerError::InvalidName),
            name => name.map(str::to_string),
        };
        if let Some(wage) = patch.daily_wage {
            validate_wage(wage)?;
        }

        let worker = self.worker_mut(id)?;
        if let Some(name) = name {
            worker.avatar_initials = initials(&name);
            worker.name = name;
        }
        if let Some(phone) = patch.phone {
            worker.phone = phone.trim().to_string();
        }
        if let Some(work_type) = patch.work_type {
            worker.work_type = work_type;
        }
        if let Some(wage) = patch.daily_wage {
            worker.daily_wage = wage;
        }
        if let Some(status) = patch.status {
            worker.status = status;
        }
        let worker = worker.clone();

        self.persist(PendingWrite::UpdateWorker(worker.clone())).await?;

        Ok(self.worker(id).cloned().unwrap_or(worker))
    }

    pub async fn set_worker_status(&mut self, id: Uuid, status: WorkerStatus) -> Result<Worker, LedgerError> {
        let worker = self.worker_mut(id)?;
        if worker.status == status {
            return Ok(worker.clone());
        }

        worker.status = status;
        let worker = worker.clone();

        self.persist(PendingWrite::UpdateWorker(worker.clone())).await?;

        Ok(self.worker(id).cloned().unwrap_or(worker))
    }

    /// Removes the worker; their attendance and advances stay behind untouched
    pub async fn delete_worker(&mut self, id: Uuid) -> Result<(), LedgerError> {
        let Some(idx) = self.workers.iter().position(|w| w.id == id) else {
            return Err(LedgerError::WorkerNotFound(id));
        };
        self.workers.remove(idx);

        self.persist(PendingWrite::DeleteWorker(id)).await
    }

    /// Marks attendance with an explicit wage, snapshotting the earned amount
    pub async fn mark_attendance(&mut self, mark: AttendanceMark) -> Result<AttendanceRecord, LedgerError> {
        if self.worker(mark.worker_id).is_none() {
            return Err(LedgerError::WorkerNotFound(mark.worker_id));
        }

        let today = self.today();
        let record = self.attendance.mark_attendance(mark, today)?;

        self.persist(PendingWrite::UpsertAttendance(record.clone())).await?;

        Ok(self.attendance.find(record.worker_id, record.date).cloned().unwrap_or(record))
    }

    /// Marks attendance at the worker's current daily wage
    pub async fn mark_attendance_for(&mut self, worker_id: Uuid, date: NaiveDate, status: AttendanceStatus, hours_worked: Decimal) -> Result<AttendanceRecord, LedgerError> {
        let daily_wage = self.worker(worker_id)
            .ok_or(LedgerError::WorkerNotFound(worker_id))?
            .daily_wage;

        self.mark_attendance(AttendanceMark { worker_id, date, status, hours_worked, daily_wage }).await
    }

    /// Moves `(worker_id, date)` to its next status at the worker's current wage
    pub async fn cycle_attendance(&mut self, worker_id: Uuid, date: NaiveDate) -> Result<AttendanceRecord, LedgerError> {
        let daily_wage = self.worker(worker_id)
            .ok_or(LedgerError::WorkerNotFound(worker_id))?
            .daily_wage;

        let today = self.today();
        let record = self.attendance.cycle_status(worker_id, date, daily_wage, today)?;

        self.persist(PendingWrite::UpsertAttendance(record.clone())).await?;

        Ok(self.attendance.find(worker_id, date).cloned().unwrap_or(record))
    }

    pub async fn update_attendance(&mut self, id: Uuid, patch: AttendancePatch) -> Result<AttendanceRecord, LedgerError> {
        let record = self.attendance.update_attendance(id, &patch)?;

        self.persist(PendingWrite::UpdateAttendance(record.clone())).await?;

        Ok(self.attendance.find(record.worker_id, record.date).cloned().unwrap_or(record))
    }

    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    pub fn worker_attendance(&self, worker_id: Uuid) -> Vec<&AttendanceRecord> {
        self.attendance.worker_attendance(worker_id)
    }

    pub fn attendance_by_month(&self, worker_id: Uuid, month: YearMonth) -> Vec<&AttendanceRecord> {
        self.attendance.query_by_month(worker_id, month)
    }

    pub async fn add_advance(&mut self, advance: NewAdvance) -> Result<AdvancePayment, LedgerError> {
        if self.worker(advance.worker_id).is_none() {
            return Err(LedgerError::WorkerNotFound(advance.worker_id));
        }

        let payment = self.advances.add_advance(advance)?;

        self.persist(PendingWrite::InsertAdvance(payment.clone())).await?;

        Ok(self.advances.get(payment.id).cloned().unwrap_or(payment))
    }

    /// Settles an advance; a second call on the same id writes nothing
    pub async fn mark_deducted(&mut self, id: Uuid) -> Result<AdvancePayment, LedgerError> {
        if self.advances.mark_deducted(id)? {
            self.persist(PendingWrite::DeductAdvance(id)).await?;
        }

        self.advances.get(id)
            .cloned()
            .ok_or(LedgerError::AdvanceNotFound(id))
    }

    pub fn advances(&self) -> &AdvanceLedger {
        &self.advances
    }

    pub fn advances_by_month(&self, worker_id: Uuid, month: YearMonth) -> Vec<&AdvancePayment> {
        self.advances.query_by_month(worker_id, month)
    }

    pub fn payroll_summary(&self, worker_id: Uuid, month: YearMonth) -> PayrollSummary {
        payroll::payroll_summary(&self.attendance, &self.advances, worker_id, month)
    }

    /// One summary per worker, in the workspace's worker order
    pub fn payroll_for_month(&self, month: YearMonth) -> Vec<PayrollSummary> {
        self.workers.iter()
            .map(|w| self.payroll_summary(w.id, month))
            .collect()
    }

    pub fn monthly_stats(&self, worker_id: Uuid, month: YearMonth) -> MonthlyStats {
        payroll::monthly_stats(&self.attendance, worker_id, month)
    }

    pub fn overview(&self) -> Overview {
        reports::overview(&self.workers, &self.attendance, &self.advances)
    }

    pub fn monthly_trend(&self, worker: Option<Uuid>, end: YearMonth, months: usize) -> Vec<MonthTrend> {
        reports::monthly_trend(&self.attendance, worker, end, months)
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub async fn update_settings(&mut self, patch: SettingsPatch) -> Result<AppSettings, LedgerError> {
        if let Some(company_name) = patch.company_name {
            self.settings.company_name = company_name;
        }
        if let Some(contractor_name) = patch.contractor_name {
            self.settings.contractor_name = contractor_name;
        }
        if let Some(contact_number) = patch.contact_number {
            self.settings.contact_number = contact_number;
        }
        if let Some(currency) = patch.currency {
            self.settings.currency = currency;
            self.settings.currency_symbol = currency.symbol().to_string();
        }

        self.persist(PendingWrite::Settings(self.settings.clone())).await?;

        Ok(self.settings.clone())
    }
}
