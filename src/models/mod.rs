pub mod address;
pub mod admin;
pub mod cart;
pub mod common;
pub mod order;
pub mod payment;
pub mod product;
pub mod review;
pub mod user;

pub use address::*;
pub use admin::*;
pub use cart::*;
pub use common::*;
pub use order::*;
pub use payment::*;
pub use product::*;
pub use review::*;
pub use user::*;
