pub mod code_generator;
pub mod format;
pub mod jwt;
pub mod password;
pub mod qr;
pub mod upload;
pub mod validation;

pub use code_generator::{generate_order_id, generate_qr_token};
pub use format::*;
pub use jwt::*;
pub use password::*;
pub use validation::*;
