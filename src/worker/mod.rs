pub mod handlers;
pub mod models;

pub use handlers::*;
pub use models::*;
