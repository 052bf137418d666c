pub mod account_eraser;
pub mod admin_service;
pub mod auth;
