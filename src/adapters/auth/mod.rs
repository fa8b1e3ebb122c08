//! Authentication adapters implementing the `SessionValidator` port.
//!
//! - `jwt` - HS256 bearer tokens signed with the configured secret
//! - `mock` - Fixed token table for tests

mod jwt;
mod mock;

pub use jwt::JwtSessionValidator;
pub use mock::MockSessionValidator;
