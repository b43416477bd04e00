//! Durable record store behind the ledgers
//!
//! [`RecordStore`] is scoped to one account. [`SeaOrmStore`] implements it on
//! top of the database, and the `From` impls at the bottom translate rows to
//! domain types so nothing above this module touches entity models.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use sea_orm::{
    sea_query::OnConflict,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    entity::{advance, attendance, settings, worker},
    model::{AdvancePayment, AdvanceStatus, AppSettings, AttendanceRecord, Worker},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[source] DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated | DbErr::RecordNotInserted => StoreError::NotFound,
            err => StoreError::Database(err),
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Newest first
    async fn list_workers(&self) -> Result<Vec<Worker>, StoreError>;
    async fn insert_worker(&self, worker: &Worker) -> Result<Worker, StoreError>;
    async fn update_worker(&self, worker: &Worker) -> Result<Worker, StoreError>;
    async fn delete_worker(&self, id: Uuid) -> Result<(), StoreError>;

    /// Ordered by date, latest first
    async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError>;
    /// Insert, or replace the row already holding `(worker_id, date)`
    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError>;
    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    /// Ordered by date, latest first
    async fn list_advances(&self) -> Result<Vec<AdvancePayment>, StoreError>;
    async fn insert_advance(&self, advance: &AdvancePayment) -> Result<AdvancePayment, StoreError>;
    async fn update_advance_status(&self, id: Uuid, status: AdvanceStatus) -> Result<AdvancePayment, StoreError>;

    async fn get_settings(&self) -> Result<Option<AppSettings>, StoreError>;
    async fn upsert_settings(&self, settings: &AppSettings) -> Result<AppSettings, StoreError>;
}

/// Database-backed store; every query is filtered by `account_id`
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: Arc<DatabaseConnection>,
    account_id: Uuid,
}

impl SeaOrmStore {
    pub fn new(db: Arc<DatabaseConnection>, account_id: Uuid) -> Self {
        Self { db, account_id }
    }
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    async fn list_workers(&self) -> Result<Vec<Worker>, StoreError> {
        let rows = worker::Entity::find()
            .filter(worker::Column::AccountId.eq(self.account_id))
            .order_by_desc(worker::Column::CreatedAt)
            .all(self.db.as_ref()).await?;

        Ok(rows.into_iter().map(Worker::from).collect())
    }

    async fn insert_worker(&self, w: &Worker) -> Result<Worker, StoreError> {
        let now = Local::now().fixed_offset();

        let row = worker::Entity::insert(worker::ActiveModel {
            id: Set(w.id),
            created_at: Set(now),
            updated_at: Set(now),
            account_id: Set(self.account_id),
            name: Set(w.name.clone()),
            phone: Set(w.phone.clone()),
            work_type: Set(w.work_type),
            daily_wage: Set(w.daily_wage),
            status: Set(w.status),
            joined_at: Set(w.joined_at),
            avatar_initials: Set(w.avatar_initials.clone()),
        }).exec_with_returning(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn update_worker(&self, w: &Worker) -> Result<Worker, StoreError> {
        let row = worker::Entity::update(worker::ActiveModel {
            id: Unchanged(w.id),
            updated_at: Set(Local::now().fixed_offset()),
            name: Set(w.name.clone()),
            phone: Set(w.phone.clone()),
            work_type: Set(w.work_type),
            daily_wage: Set(w.daily_wage),
            status: Set(w.status),
            avatar_initials: Set(w.avatar_initials.clone()),
            ..Default::default()
        })
            .filter(worker::Column::AccountId.eq(self.account_id))
            .exec(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn delete_worker(&self, id: Uuid) -> Result<(), StoreError> {
        let res = worker::Entity::delete_many()
            .filter(worker::Column::Id.eq(id))
            .filter(worker::Column::AccountId.eq(self.account_id))
            .exec(self.db.as_ref()).await?;

        if res.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = attendance::Entity::find()
            .filter(attendance::Column::AccountId.eq(self.account_id))
            .order_by_desc(attendance::Column::Date)
            .all(self.db.as_ref()).await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn upsert_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let now = Local::now().fixed_offset();

        let row = attendance::Entity::insert(attendance::ActiveModel {
            id: Set(record.id),
            created_at: Set(now),
            updated_at: Set(now),
            account_id: Set(self.account_id),
            worker_id: Set(record.worker_id),
            date: Set(record.date),
            status: Set(record.status),
            hours_worked: Set(record.hours_worked),
            earned_amount: Set(record.earned_amount),
        })
            .on_conflict(OnConflict::columns([attendance::Column::WorkerId, attendance::Column::Date])
                .update_columns([
                    attendance::Column::UpdatedAt,
                    attendance::Column::Status,
                    attendance::Column::HoursWorked,
                    attendance::Column::EarnedAmount,
                ])
                // A row of another account holding the key is left alone and nothing comes back
                .action_and_where(attendance::Column::AccountId.eq(self.account_id))
                .to_owned())
            .exec_with_returning(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let row = attendance::Entity::update(attendance::ActiveModel {
            id: Unchanged(record.id),
            updated_at: Set(Local::now().fixed_offset()),
            status: Set(record.status),
            hours_worked: Set(record.hours_worked),
            earned_amount: Set(record.earned_amount),
            ..Default::default()
        })
            .filter(attendance::Column::AccountId.eq(self.account_id))
            .exec(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn list_advances(&self) -> Result<Vec<AdvancePayment>, StoreError> {
        let rows = advance::Entity::find()
            .filter(advance::Column::AccountId.eq(self.account_id))
            .order_by_desc(advance::Column::Date)
            .all(self.db.as_ref()).await?;

        Ok(rows.into_iter().map(AdvancePayment::from).collect())
    }

    async fn insert_advance(&self, a: &AdvancePayment) -> Result<AdvancePayment, StoreError> {
        let now = Local::now().fixed_offset();

        let row = advance::Entity::insert(advance::ActiveModel {
            id: Set(a.id),
            created_at: Set(now),
            updated_at: Set(now),
            account_id: Set(self.account_id),
            worker_id: Set(a.worker_id),
            amount: Set(a.amount),
            date: Set(a.date),
            note: Set(a.note.clone()),
            status: Set(a.status),
        }).exec_with_returning(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn update_advance_status(&self, id: Uuid, status: AdvanceStatus) -> Result<AdvancePayment, StoreError> {
        let row = advance::Entity::update(advance::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Local::now().fixed_offset()),
            status: Set(status),
            ..Default::default()
        })
            .filter(advance::Column::AccountId.eq(self.account_id))
            .exec(self.db.as_ref()).await?;

        Ok(row.into())
    }

    async fn get_settings(&self) -> Result<Option<AppSettings>, StoreError> {
        let row = settings::Entity::find()
            .filter(settings::Column::AccountId.eq(self.account_id))
            .one(self.db.as_ref()).await?;

        Ok(row.map(AppSettings::from))
    }

    async fn upsert_settings(&self, s: &AppSettings) -> Result<AppSettings, StoreError> {
        let now = Local::now().fixed_offset();

        let row = settings::Entity::insert(settings::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(now),
            updated_at: Set(now),
            account_id: Set(self.account_id),
            company_name: Set(s.company_name.clone()),
            contractor_name: Set(s.contractor_name.clone()),
            contact_number: Set(s.contact_number.clone()),
            currency: Set(s.currency),
            currency_symbol: Set(s.currency_symbol.clone()),
        })
            .on_conflict(OnConflict::column(settings::Column::AccountId)
                .update_columns([
                    settings::Column::UpdatedAt,
                    settings::Column::CompanyName,
                    settings::Column::ContractorName,
                    settings::Column::ContactNumber,
                    settings::Column::Currency,
                    settings::Column::CurrencySymbol,
                ])
                .to_owned())
            .exec_with_returning(self.db.as_ref()).await?;

        Ok(row.into())
    }
}

impl From<worker::Model> for Worker {
    fn from(row: worker::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            phone: row.phone,
            work_type: row.work_type,
            daily_wage: row.daily_wage,
            status: row.status,
            joined_at: row.joined_at,
            avatar_initials: row.avatar_initials,
        }
    }
}

impl From<attendance::Model> for AttendanceRecord {
    fn from(row: attendance::Model) -> Self {
        Self {
            id: row.id,
            worker_id: row.worker_id,
            date: row.date,
            status: row.status,
            hours_worked: row.hours_worked,
            earned_amount: row.earned_amount,
        }
    }
}

impl From<advance::Model> for AdvancePayment {
    fn from(row: advance::Model) -> Self {
        Self {
            id: row.id,
            worker_id: row.worker_id,
            amount: row.amount,
            date: row.date,
            note: row.note,
            status: row.status,
        }
    }
}

impl From<settings::Model> for AppSettings {
    fn from(row: settings::Model) -> Self {
        let defaults = AppSettings::default();

        Self {
            company_name: if row.company_name.is_empty() { defaults.company_name } else { row.company_name },
            contractor_name: row.contractor_name,
            contact_number: row.contact_number,
            currency: row.currency,
            currency_symbol: if row.currency_symbol.is_empty() { row.currency.symbol().to_string() } else { row.currency_symbol },
        }
    }
}
