pub mod admin_users;
pub mod contact_messages;
pub mod orders;

pub use admin_users as admin_user_entity;
pub use contact_messages as contact_message_entity;
pub use contact_messages::MessageStatus;
pub use orders as order_entity;
pub use orders::OrderStatus;
