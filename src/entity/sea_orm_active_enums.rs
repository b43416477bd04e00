use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "work_type")]
pub enum WorkType {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "worker_status")]
pub enum WorkerStatus {
    #[sea_orm(string_value = "Active")]
    Active,
    #[sea_orm(string_value = "Inactive")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "Present")]
    Present,
    #[sea_orm(string_value = "Absent")]
    Absent,
    #[sea_orm(string_value = "Half-Day")]
    #[serde(rename = "Half-Day")]
    HalfDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "advance_status")]
pub enum AdvanceStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Deducted")]
    Deducted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "currency_code")]
pub enum CurrencyCode {
    #[sea_orm(string_value = "INR")]
    #[serde(rename = "INR")]
    Inr,
    #[sea_orm(string_value = "USD")]
    #[serde(rename = "USD")]
    Usd,
    #[sea_orm(string_value = "AED")]
    #[serde(rename = "AED")]
    Aed,
    #[sea_orm(string_value = "SAR")]
    #[serde(rename = "SAR")]
    Sar,
}

impl CurrencyCode {
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "₹",
            CurrencyCode::Usd => "$",
            CurrencyCode::Aed => "د.إ",
            CurrencyCode::Sar => "﷼",
        }
    }
}
