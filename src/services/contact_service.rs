use crate::entities::{MessageStatus, contact_message_entity as contact_messages};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::require_field;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct ContactService {
    pool: DatabaseConnection,
}

impl ContactService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 保存联系表单留言，状态为未读
    pub async fn submit(&self, request: ContactRequest) -> AppResult<ContactMessageResponse> {
        let name = require_field("name", request.name.as_deref())?;
        let phone = require_field("phone", request.phone.as_deref())?;
        let email = require_field("email", request.email.as_deref())?;
        let message = require_field("message", request.message.as_deref())?;

        let saved = contact_messages::ActiveModel {
            name: Set(name),
            phone: Set(phone),
            email: Set(email),
            message: Set(message),
            status: Set(MessageStatus::Unread),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Contact message received: id={}", saved.id);
        Ok(saved.into())
    }

    pub async fn list(&self, query: &ContactMessageQuery) -> AppResult<ContactInboxResponse> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = contact_messages::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(contact_messages::Column::Status.eq(status));
        }
        let total = select.clone().count(&self.pool).await?;
        let models = select
            .order_by_desc(contact_messages::Column::CreatedAt)
            .order_by_desc(contact_messages::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        let items = models.into_iter().map(ContactMessageResponse::from).collect();

        let total_messages = contact_messages::Entity::find().count(&self.pool).await?;
        let unread_messages = contact_messages::Entity::find()
            .filter(contact_messages::Column::Status.eq(MessageStatus::Unread))
            .count(&self.pool)
            .await?;

        Ok(ContactInboxResponse {
            messages: PaginatedResponse::new(items, &params, total),
            total_messages,
            unread_messages,
        })
    }

    pub async fn mark_read(&self, id: i64) -> AppResult<ContactMessageResponse> {
        let message = contact_messages::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Contact message {id} not found")))?;

        if message.status == MessageStatus::Read {
            return Ok(message.into());
        }

        let mut model = message.into_active_model();
        model.status = Set(MessageStatus::Read);
        Ok(model.update(&self.pool).await?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    fn request(name: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            phone: Some("03009998877".to_string()),
            email: Some("guest@example.com".to_string()),
            message: Some("Is parking available?".to_string()),
        }
    }

    fn all() -> ContactMessageQuery {
        ContactMessageQuery {
            page: None,
            per_page: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_submit_creates_one_unread_row() {
        let service = ContactService::new(test_pool().await);
        let saved = service.submit(request("Ayesha")).await.unwrap();
        assert_eq!(saved.status, MessageStatus::Unread);

        let inbox = service.list(&all()).await.unwrap();
        assert_eq!(inbox.total_messages, 1);
        assert_eq!(inbox.unread_messages, 1);
        assert_eq!(inbox.messages.data[0].name, "Ayesha");
    }

    #[tokio::test]
    async fn test_submit_keeps_free_form_email() {
        let service = ContactService::new(test_pool().await);
        let mut loose = request("Ayesha");
        loose.email = Some("ayesha at gmail".to_string());
        let saved = service.submit(loose).await.unwrap();
        assert_eq!(saved.email, "ayesha at gmail");
        assert_eq!(service.list(&all()).await.unwrap().total_messages, 1);
    }

    #[tokio::test]
    async fn test_submit_requires_all_fields() {
        let service = ContactService::new(test_pool().await);
        let mut missing = request("Ayesha");
        missing.message = Some("  ".to_string());
        assert!(matches!(
            service.submit(missing).await,
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(service.list(&all()).await.unwrap().total_messages, 0);
    }

    #[tokio::test]
    async fn test_mark_read_and_filter() {
        let service = ContactService::new(test_pool().await);
        let first = service.submit(request("Ayesha")).await.unwrap();
        service.submit(request("Hamza")).await.unwrap();

        let read = service.mark_read(first.id).await.unwrap();
        assert_eq!(read.status, MessageStatus::Read);
        // 重复标记保持已读
        assert_eq!(
            service.mark_read(first.id).await.unwrap().status,
            MessageStatus::Read
        );

        let unread = service
            .list(&ContactMessageQuery {
                page: None,
                per_page: None,
                status: Some(MessageStatus::Unread),
            })
            .await
            .unwrap();
        assert_eq!(unread.messages.total, 1);
        assert_eq!(unread.messages.data[0].name, "Hamza");
        assert_eq!(unread.total_messages, 2);
        assert_eq!(unread.unread_messages, 1);

        assert!(matches!(
            service.mark_read(999).await,
            Err(AppError::NotFound(_))
        ));
    }
}
