pub use sea_orm_migration::prelude::*;

mod util;
mod m20250701_090000_init;
mod m20250702_101500_seed_demo_account;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_090000_init::Migration),
            Box::new(m20250702_101500_seed_demo_account::Migration),
        ]
    }
}
