pub mod admin;
pub mod common;
pub mod contact;
pub mod order;
pub mod pagination;

pub use admin::*;
pub use common::*;
pub use contact::*;
pub use order::*;
pub use pagination::*;
