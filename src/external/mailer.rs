use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// 通过 Content-ID 在 HTML 中引用的内嵌图片
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub content_id: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// 普通附件（可下载）
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub inline_images: Vec<InlineImage>,
    pub attachments: Vec<FileAttachment>,
}

/// 邮件发送抽象，生产环境使用 SMTP，测试中替换为记录实现
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()>;
}

#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let builder = if config.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else if config.host == "localhost" || config.host == "127.0.0.1" {
            // 本地调试 SMTP（如 mailpit）不走 TLS
            Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay {}: {e}", config.host)))?;

        let mut builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let message = build_message(&self.from, email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::DeliveryError(format!("SMTP send to {} failed: {e}", email.to)))?;
        log::info!("Email sent: to={}, subject={}", email.to, email.subject);
        Ok(())
    }
}

fn parse_content_type(raw: &str) -> AppResult<ContentType> {
    ContentType::parse(raw)
        .map_err(|e| AppError::DeliveryError(format!("Invalid content type {raw}: {e}")))
}

/// 组装 MIME：related(html + 内嵌图片)，有附件时外层再包 mixed
pub fn build_message(from: &str, email: &OutgoingEmail) -> AppResult<Message> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| AppError::DeliveryError(format!("Invalid sender address {from}: {e}")))?;
    let to: Mailbox = email
        .to
        .parse()
        .map_err(|e| AppError::DeliveryError(format!("Invalid recipient {}: {e}", email.to)))?;

    let mut related = MultiPart::related().singlepart(SinglePart::html(email.html.clone()));
    for image in &email.inline_images {
        related = related.singlepart(
            Attachment::new_inline(image.content_id.clone())
                .body(image.bytes.clone(), parse_content_type(&image.content_type)?),
        );
    }

    let body = if email.attachments.is_empty() {
        related
    } else {
        let mut mixed = MultiPart::mixed().multipart(related);
        for file in &email.attachments {
            mixed = mixed.singlepart(
                Attachment::new(file.filename.clone())
                    .body(file.bytes.clone(), parse_content_type(&file.content_type)?),
            );
        }
        mixed
    };

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .multipart(body)
        .map_err(|e| AppError::DeliveryError(format!("Failed to build email: {e}")))
}
