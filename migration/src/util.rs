use sea_orm_migration::prelude::*;

pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// A table whose rows belong to one account
///
/// Must run `setup_account_table_fk` macro on the table afterwards
///
/// # Example
///
/// ```rs
/// manager
///     .create_table(default_account_table_statement()
///         .table(Advance::Table)
///         .col(ColumnDef::new(Advance::Amount)
///             .decimal()
///             .not_null())
///         .take()
///     ).await?;
/// setup_account_table_fk!(manager, Advance::Table);
/// ```
pub(crate) fn default_account_table_statement() -> TableCreateStatement {
    default_table_statement()
        .col(ColumnDef::new(DefaultAccountColumn::AccountId)
            .uuid()
            .not_null())
        .take()
}

#[macro_export]
macro_rules! setup_account_table_fk {
    ($m:expr,$t:expr) => {{
        use crate::util::*;
        use crate::m20250701_090000_init::Account;

        $m.create_foreign_key(ForeignKeyCreateStatement::new()
                .from($t, DefaultAccountColumn::AccountId)
                .to(Account::Table, DefaultColumn::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .on_update(ForeignKeyAction::Cascade)
                .take()
        ).await?;
    }};
}

#[derive(DeriveIden)]
pub(crate) enum DefaultAccountColumn {
    AccountId,
}
