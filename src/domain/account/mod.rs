mod model;
mod repository;

pub use model::{Account, Gender, NewAccount};
pub use repository::AccountRepository;
