use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_account_table_fk, util::{default_account_table_statement, default_table_statement}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager.create_type(schema.create_enum_from_active_enum::<WorkType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<WorkerStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<AttendanceStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<AdvanceStatus>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<CurrencyCode>()).await?;

        manager
            .create_table(default_table_statement()
                .table(Account::Table)
                .col(ColumnDef::new(Account::Username)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Account::Password)
                    .binary()
                    .not_null()) // Sha256 of `password:username`
                .take()
            ).await?;

        manager
            .create_table(default_account_table_statement()
                .table(Worker::Table)
                .col(ColumnDef::new(Worker::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Worker::Phone)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Worker::WorkType)
                    .custom(WorkType::name())
                    .not_null())
                .col(ColumnDef::new(Worker::DailyWage)
                    .decimal()
                    .not_null())
                .col(ColumnDef::new(Worker::Status)
                    .custom(WorkerStatus::name())
                    .not_null())
                .col(ColumnDef::new(Worker::JoinedAt)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Worker::AvatarInitials)
                    .text()
                    .not_null())
                .take()
            ).await?;
        setup_account_table_fk!(manager, Worker::Table);

        // `worker_id` carries no foreign key: removing a worker leaves their history in place
        manager
            .create_table(default_account_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::WorkerId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Attendance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::Status)
                    .custom(AttendanceStatus::name())
                    .not_null())
                .col(ColumnDef::new(Attendance::HoursWorked)
                    .decimal()
                    .not_null())
                .col(ColumnDef::new(Attendance::EarnedAmount)
                    .decimal()
                    .not_null())
                .take()
            ).await?;
        setup_account_table_fk!(manager, Attendance::Table);

        manager
            .create_index(Index::create()
                .name("idx_attendance_worker_date")
                .table(Attendance::Table)
                .col(Attendance::WorkerId)
                .col(Attendance::Date)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_account_table_statement()
                .table(Advance::Table)
                .col(ColumnDef::new(Advance::WorkerId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Advance::Amount)
                    .decimal()
                    .not_null())
                .col(ColumnDef::new(Advance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Advance::Note)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Advance::Status)
                    .custom(AdvanceStatus::name())
                    .not_null())
                .take()
            ).await?;
        setup_account_table_fk!(manager, Advance::Table);

        manager
            .create_table(default_table_statement()
                .table(Settings::Table)
                .col(ColumnDef::new(Settings::AccountId)
                    .uuid()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(Settings::CompanyName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Settings::ContractorName)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Settings::ContactNumber)
                    .text()
                    .not_null()
                    .default(""))
                .col(ColumnDef::new(Settings::Currency)
                    .custom(CurrencyCode::name())
                    .not_null())
                .col(ColumnDef::new(Settings::CurrencySymbol)
                    .text()
                    .not_null())
                .take()
            ).await?;
        setup_account_table_fk!(manager, Settings::Table);

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(TableDropStatement::new().table(Settings::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Advance::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Attendance::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Worker::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Account::Table).take()).await?;

        for name in [CurrencyCode::name(), AdvanceStatus::name(), AttendanceStatus::name(), WorkerStatus::name(), WorkType::name()] {
            manager
                .drop_type(TypeDropStatement::new()
                    .name(name)
                    .to_owned()
                ).await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Account {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
pub(crate) enum Worker {
    Table,
    Name,
    Phone,
    WorkType,
    DailyWage,
    Status,
    JoinedAt,
    AvatarInitials,
}

#[derive(Iden)]
enum Attendance {
    Table,
    WorkerId,
    Date,
    Status,
    HoursWorked,
    EarnedAmount,
}

#[derive(Iden)]
enum Advance {
    Table,
    WorkerId,
    Amount,
    Date,
    Note,
    Status,
}

#[derive(Iden)]
enum Settings {
    Table,
    AccountId,
    CompanyName,
    ContractorName,
    ContactNumber,
    Currency,
    CurrencySymbol,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "work_type")]
enum WorkType {
    #[sea_orm(string_value = "Mason")]
    Mason,
    #[sea_orm(string_value = "Carpenter")]
    Carpenter,
    #[sea_orm(string_value = "Electrician")]
    Electrician,
    #[sea_orm(string_value = "Plumber")]
    Plumber,
    #[sea_orm(string_value = "Helper")]
    Helper,
    #[sea_orm(string_value = "Painter")]
    Painter,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "worker_status")]
enum WorkerStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
enum AttendanceStatus {
    #[sea_orm(string_value = "Present")]
    Present,
    #[sea_orm(string_value = "Absent")]
    Absent,
    #[sea_orm(string_value = "Half-Day")]
    HalfDay,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "advance_status")]
enum AdvanceStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Deducted")]
    Deducted,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
enum CurrencyCode {
    #[sea_orm(string_value = "INR")]
    Inr,
    #[sea_orm(string_value = "USD")]
    Usd,
    #[sea_orm(string_value = "AED")]
    Aed,
    #[sea_orm(string_value = "SAR")]
    Sar,
}
