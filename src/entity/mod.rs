pub mod prelude;

pub mod account;
pub mod advance;
pub mod attendance;
pub mod sea_orm_active_enums;
pub mod settings;
pub mod worker;
