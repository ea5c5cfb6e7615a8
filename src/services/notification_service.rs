use crate::config::EventConfig;
use crate::entities::order_entity;
use crate::error::AppResult;
use crate::external::{FileAttachment, FileStore, InlineImage, Mailer, OutgoingEmail};
use crate::templates::{
    CID_PAYMENT_SCREENSHOT, CID_QR_CODE, CID_TICKET_TEMPLATE, RenderedEmail, render_cancellation,
    render_final_ticket, render_order_received,
};
use crate::utils::upload::content_type_for;
use chrono::Local;
use std::sync::Arc;

/// 订单相关邮件：渲染模板、挂载图片、交给 Mailer 发送
///
/// 图片文件缺失时记录日志并跳过，不影响邮件发送。
#[derive(Clone)]
pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
    store: FileStore,
    event: EventConfig,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>, store: FileStore, event: EventConfig) -> Self {
        Self {
            mailer,
            store,
            event,
        }
    }

    /// 下单成功邮件，付款截图内嵌
    pub async fn send_order_received(&self, order: &order_entity::Model) -> AppResult<()> {
        let mut inline_images = Vec::new();
        if let Some(filename) = order.payment_ss_filename.as_deref() {
            // pdf 无法内嵌显示
            if content_type_for(filename).starts_with("image/") {
                match self.store.read_upload(filename).await? {
                    Some(bytes) => inline_images.push(InlineImage {
                        content_id: CID_PAYMENT_SCREENSHOT.to_string(),
                        filename: filename.to_string(),
                        content_type: content_type_for(filename).to_string(),
                        bytes,
                    }),
                    None => log::warn!(
                        "Payment screenshot {} missing for order {}",
                        filename,
                        order.order_id
                    ),
                }
            }
        }

        let rendered = render_order_received(order, &self.event, !inline_images.is_empty());
        self.deliver(order, rendered, inline_images, Vec::new()).await
    }

    /// 电子票邮件：票面模板与二维码内嵌，二维码另作为附件便于下载
    pub async fn send_final_ticket(&self, order: &order_entity::Model) -> AppResult<()> {
        let mut inline_images = Vec::new();
        let mut attachments = Vec::new();

        match self.store.read_ticket_template().await? {
            Some(bytes) => inline_images.push(InlineImage {
                content_id: CID_TICKET_TEMPLATE.to_string(),
                filename: "ticket_template.png".to_string(),
                content_type: "image/png".to_string(),
                bytes,
            }),
            None => log::warn!("Ticket template image not found, sending ticket without it"),
        }

        let qr_bytes = match order.qr_code_filename.as_deref() {
            Some(filename) => self.store.read_qr(filename).await?,
            None => None,
        };
        match qr_bytes {
            Some(bytes) => {
                attachments.push(FileAttachment {
                    filename: format!("ticket_qr_{}.png", order.order_id),
                    content_type: "image/png".to_string(),
                    bytes: bytes.clone(),
                });
                inline_images.push(InlineImage {
                    content_id: CID_QR_CODE.to_string(),
                    filename: format!("qr_{}.png", order.order_id),
                    content_type: "image/png".to_string(),
                    bytes,
                });
            }
            None => log::warn!("QR code image missing for order {}", order.order_id),
        }

        let rendered = render_final_ticket(order, &self.event);
        self.deliver(order, rendered, inline_images, attachments)
            .await
    }

    pub async fn send_cancellation(&self, order: &order_entity::Model) -> AppResult<()> {
        let rendered = render_cancellation(order, &self.event, Local::now().date_naive());
        self.deliver(order, rendered, Vec::new(), Vec::new()).await
    }

    async fn deliver(
        &self,
        order: &order_entity::Model,
        rendered: RenderedEmail,
        inline_images: Vec<InlineImage>,
        attachments: Vec<FileAttachment>,
    ) -> AppResult<()> {
        let email = OutgoingEmail {
            to: order.email.clone(),
            subject: rendered.subject,
            html: rendered.html,
            inline_images,
            attachments,
        };
        self.mailer.send(&email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderStatus;
    use crate::external::mailer::testing::RecordingMailer;
    use crate::external::storage::test_dirs::temp_store;

    fn order(payment_ss: Option<&str>, qr: Option<&str>) -> order_entity::Model {
        let now = chrono::Utc::now();
        order_entity::Model {
            id: 7,
            order_id: "OUW1700000000000ABCDE".to_string(),
            full_name: "Ali Raza".to_string(),
            phone: "03111234567".to_string(),
            email: "ali@example.com".to_string(),
            dob: "1995-01-01".to_string(),
            address: "DHA, Karachi".to_string(),
            requirements: None,
            event_participation: "no".to_string(),
            activities: "[]".to_string(),
            activity_description: None,
            ticket_type: "vip".to_string(),
            quantity: 1,
            price_per_ticket: 5000.0,
            total_amount: 5000.0,
            payment_method: "bank".to_string(),
            payment_ss_filename: payment_ss.map(str::to_string),
            transaction_id: None,
            status: OrderStatus::Confirmed,
            qr_token: Some("token".to_string()),
            qr_code_filename: qr.map(str::to_string),
            is_verified: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_order_received_embeds_screenshot() {
        let store = temp_store();
        store.save_upload("20250101_000000_r.png", b"img").await.unwrap();
        let mailer = RecordingMailer::default();
        let service =
            NotificationService::new(Arc::new(mailer.clone()), store, EventConfig::default());

        service
            .send_order_received(&order(Some("20250101_000000_r.png"), None))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ali@example.com");
        assert_eq!(sent[0].inline_images.len(), 1);
        assert_eq!(sent[0].inline_images[0].content_id, CID_PAYMENT_SCREENSHOT);
        assert!(sent[0].html.contains("cid:payment_screenshot"));
    }

    #[tokio::test]
    async fn test_order_received_skips_missing_screenshot() {
        let mailer = RecordingMailer::default();
        let service =
            NotificationService::new(Arc::new(mailer.clone()), temp_store(), EventConfig::default());

        service
            .send_order_received(&order(Some("gone.png"), None))
            .await
            .unwrap();

        let sent = mailer.sent();
        assert!(sent[0].inline_images.is_empty());
        assert!(!sent[0].html.contains("cid:payment_screenshot"));
    }

    #[tokio::test]
    async fn test_final_ticket_attaches_qr() {
        let store = temp_store();
        store.save_qr("qr_OUW1.png", b"qr").await.unwrap();
        let mailer = RecordingMailer::default();
        let service =
            NotificationService::new(Arc::new(mailer.clone()), store, EventConfig::default());

        service
            .send_final_ticket(&order(None, Some("qr_OUW1.png")))
            .await
            .unwrap();

        let sent = mailer.sent();
        // 未放置票面模板，只有二维码
        assert_eq!(sent[0].inline_images.len(), 1);
        assert_eq!(sent[0].inline_images[0].content_id, CID_QR_CODE);
        assert_eq!(
            sent[0].attachments[0].filename,
            "ticket_qr_OUW1700000000000ABCDE.png"
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_is_returned() {
        let service = NotificationService::new(
            Arc::new(RecordingMailer::failing()),
            temp_store(),
            EventConfig::default(),
        );
        assert!(service.send_cancellation(&order(None, None)).await.is_err());
    }
}
