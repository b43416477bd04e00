pub mod auth;
pub mod config;
pub mod consts;
pub mod entity;
pub mod ledger;
pub mod model;
pub mod pages;
pub mod payroll;
pub mod reports;
pub mod store;
pub mod utils;
pub mod wage;
pub mod workspace;
