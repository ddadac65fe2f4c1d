mod model;
mod repository;

pub use model::{Admin, AdminLevel, NewAdmin};
pub use repository::AdminRepository;
