pub mod change;
pub mod dashboard;
pub mod enums;
pub mod incident;
pub mod user;
