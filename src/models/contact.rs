use crate::entities::{MessageStatus, contact_message_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactMessageResponse {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl From<contact_message_entity::Model> for ContactMessageResponse {
    fn from(m: contact_message_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            phone: m.phone,
            email: m.email,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactMessageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<MessageStatus>,
}

/// 留言列表，附带未读数量
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactInboxResponse {
    #[schema(value_type = Object)]
    pub messages: super::PaginatedResponse<ContactMessageResponse>,
    pub total_messages: u64,
    pub unread_messages: u64,
}
