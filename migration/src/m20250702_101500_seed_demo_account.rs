use sea_orm_migration::prelude::*;
use sha2::Digest as _;

use crate::m20250701_090000_init::{Account, Worker};

const DEMO_ACCOUNT_ID: u128 = 0xd3;

const DEMO_CREW: [(&str, &str, &str); 6] = [
    ("Rajesh Kumar", "RK", "Mason"),
    ("Suresh Patel", "SP", "Carpenter"),
    ("Mohammed Irfan", "MI", "Electrician"),
    ("Anil Verma", "AV", "Plumber"),
    ("Deepak Singh", "DS", "Helper"),
    ("Ravi Shankar", "RS", "Painter"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let time = Expr::val("2025-07-02T10:15:00.000Z").cast_as("timestamptz");
        let account_id = Expr::val(format!("{DEMO_ACCOUNT_ID:032x}")).cast_as("uuid");

        // Login is demo / demo
        let hashed_password = &sha2::Sha256::digest("demo:demo")[..];

        manager
            .exec_stmt(Query::insert()
                .into_table(Account::Table)
                .columns(["id", "created_at", "updated_at", "username", "password"])
                .values_panic([account_id.clone(), time.clone(), time.clone(), "demo".into(), hashed_password.into()])
                .to_owned()
        ).await?;

        for (i, (name, initials, work_type)) in DEMO_CREW.into_iter().enumerate() {
            let uuid = format!("{:032x}", DEMO_ACCOUNT_ID * 0x100 + i as u128);
            // Whole rupees in steps of 50
            let daily_wage = rand::random_range(10..=24) * 50;

            manager
                .exec_stmt(Query::insert()
                    .into_table(Worker::Table)
                    .columns(["id", "created_at", "updated_at", "account_id", "name", "phone", "work_type", "daily_wage", "status", "joined_at", "avatar_initials"])
                    .values_panic([
                        Expr::val(uuid).cast_as("uuid"),
                        time.clone(),
                        time.clone(),
                        account_id.clone(),
                        name.into(),
                        format!("98765{:05}", i).into(),
                        Expr::val(work_type).cast_as("work_type"),
                        Expr::val(daily_wage).cast_as("numeric"),
                        Expr::val("Active").cast_as("worker_status"),
                        Expr::val("2025-07-01").cast_as("date"),
                        initials.into(),
                    ])
                    .to_owned()
            ).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Cascades to the crew and anything recorded against the account
        manager
            .exec_stmt(Query::delete()
                .from_table(Account::Table)
                .and_where(Expr::col("id").eq(Expr::val(format!("{DEMO_ACCOUNT_ID:032x}")).cast_as("uuid")))
                .to_owned()
        ).await?;

        Ok(())
    }
}
