pub mod connection;
pub mod redis;

pub use connection::{create_pool, run_migrations, DbPool};
pub use redis::create_redis;
