pub mod jwt;
pub mod password;
pub mod rate_limit;

pub use jwt::*;
pub use password::*;
pub use rate_limit::*;
