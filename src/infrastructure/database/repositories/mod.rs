pub mod account_repository;
pub mod admin_repository;

pub use account_repository::SeaOrmAccountRepository;
pub use admin_repository::SeaOrmAdminRepository;
