pub mod auth;
pub mod bugs;
pub mod health;
pub mod uploads;
