pub mod changes;
pub mod dashboard;
pub mod incidents;
pub mod system;
pub mod users;
