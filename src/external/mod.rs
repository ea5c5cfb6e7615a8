pub mod mailer;
pub mod storage;

pub use mailer::*;
pub use storage::*;
