pub mod auth;
pub mod catalog;
pub mod crm;
pub mod fleet;
pub mod operations;
pub mod team;
pub mod tenancy;
