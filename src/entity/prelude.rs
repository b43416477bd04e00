pub use super::account::Entity as Account;
pub use super::advance::Entity as Advance;
pub use super::attendance::Entity as Attendance;
pub use super::settings::Entity as Settings;
pub use super::worker::Entity as Worker;
