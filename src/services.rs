pub mod auth;
pub mod change_service;
pub mod dashboard_service;
pub mod incident_service;
pub mod user_service;
