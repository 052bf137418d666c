pub mod cascade;
pub mod scoped_repo;
pub mod scoped_search;

pub mod catalog_repo;
pub mod crm_repo;
pub mod fleet_repo;
pub mod operations_repo;
pub mod team_repo;
pub mod tenancy_repo;
pub mod user_repo;

pub use catalog_repo::{CatalogServiceRepository, ProductRepository};
pub use crm_repo::{CustomerRepository, EventRepository, FollowUpRepository};
pub use fleet_repo::{ExpenseRepository, VehicleRepository, VehicleUsageRepository};
pub use operations_repo::{ContractRepository, QuoteRepository, ServiceOrderRepository};
pub use team_repo::TechnicianRepository;
pub use tenancy_repo::AccountRepository;
pub use user_repo::UserRepository;

#[cfg(test)]
mod scenario_tests;
