pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

pub use handlers::{protected_routes, public_routes};
