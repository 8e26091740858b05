pub mod claims;
pub mod gate;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Role;
pub use gate::{RequireAdmin, RequireEitherRole, RequireUser};
pub use jwt::JwtKeys;
