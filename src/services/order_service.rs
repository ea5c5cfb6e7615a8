use super::NotificationService;
use crate::entities::{
    MessageStatus, OrderStatus, contact_message_entity as contact_messages,
    order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::external::FileStore;
use crate::models::*;
use crate::utils::qr::{build_scan_url, extract_token, render_png};
use crate::utils::upload::stored_upload_name;
use crate::utils::{generate_order_id, generate_qr_token, optional_field, require_field, validate_email};
use chrono::{Local, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// 金额比对容差（前端以浮点计算总价）
const AMOUNT_TOLERANCE: f64 = 0.01;

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    store: FileStore,
    notifier: NotificationService,
    qr_base_url: String,
    max_upload_bytes: usize,
}

/// 校验后的票务信息
struct ValidatedTicket {
    ticket_type: String,
    quantity: i32,
    price_per_ticket: f64,
    total: f64,
}

impl OrderService {
    pub fn new(
        pool: DatabaseConnection,
        store: FileStore,
        notifier: NotificationService,
        qr_base_url: String,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            pool,
            store,
            notifier,
            qr_base_url,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// 提交订单
    ///
    /// 校验表单、保存付款截图、生成二维码并落库，随后发送下单确认邮件。
    /// 邮件失败只记录日志，结果通过 `email_sent` 返回。
    pub async fn submit_order(&self, form: OrderSubmission) -> AppResult<SubmitOrderResponse> {
        let full_name = require_field("fullName", form.full_name.as_deref())?;
        let phone = require_field("phone", form.phone.as_deref())?;
        let email = require_field("email", form.email.as_deref())?;
        let dob = require_field("dob", form.dob.as_deref())?;
        let address = require_field("address", form.address.as_deref())?;
        let event_participation =
            require_field("eventParticipation", form.event_participation.as_deref())?;
        let payment_method = require_field("paymentMethod", form.payment_method.as_deref())?;
        let ticket_raw = require_field("ticketInfo", form.ticket_info.as_deref())?;
        validate_email(&email)?;

        let ticket = validate_ticket(&ticket_raw)?;
        let activities = normalize_activities(form.activities.as_deref())?;

        let order_id = generate_order_id();
        let qr_token = generate_qr_token();

        // 浏览器未选择文件时也会提交一个空文件名的 part
        let screenshot = form
            .payment_screenshot
            .filter(|f| !f.filename.trim().is_empty());
        let screenshot = match screenshot {
            Some(file) => {
                if file.bytes.len() > self.max_upload_bytes {
                    return Err(AppError::ValidationError(format!(
                        "Payment screenshot exceeds {} bytes",
                        self.max_upload_bytes
                    )));
                }
                let stored = stored_upload_name(&file.filename, &order_id)?;
                Some((stored, file.bytes))
            }
            None => None,
        };
        let payment_ss_filename = screenshot.as_ref().map(|(name, _)| name.clone());

        let png = render_png(&build_scan_url(&self.qr_base_url, &qr_token))?;
        let qr_code_filename = format!(
            "qr_{}_{}.png",
            order_id,
            Local::now().format("%Y%m%d_%H%M%S")
        );

        if let Some((stored, bytes)) = &screenshot {
            self.store.save_upload(stored, bytes).await?;
        }
        if let Err(e) = self.store.save_qr(&qr_code_filename, &png).await {
            self.discard_files(payment_ss_filename.as_deref(), None).await;
            return Err(e);
        }

        let now = Utc::now();
        let inserted = orders::ActiveModel {
            order_id: Set(order_id.clone()),
            full_name: Set(full_name),
            phone: Set(phone),
            email: Set(email),
            dob: Set(dob),
            address: Set(address),
            requirements: Set(optional_field(form.requirements.as_deref())),
            event_participation: Set(event_participation),
            activities: Set(activities),
            activity_description: Set(optional_field(form.activity_description.as_deref())),
            ticket_type: Set(ticket.ticket_type),
            quantity: Set(ticket.quantity),
            price_per_ticket: Set(ticket.price_per_ticket),
            total_amount: Set(ticket.total),
            payment_method: Set(payment_method),
            payment_ss_filename: Set(payment_ss_filename.clone()),
            transaction_id: Set(optional_field(form.transaction_id.as_deref())),
            status: Set(OrderStatus::Pending),
            qr_token: Set(Some(qr_token)),
            qr_code_filename: Set(Some(qr_code_filename.clone())),
            is_verified: Set(false),
            verified_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;
        let order = match inserted {
            Ok(order) => order,
            Err(e) => {
                log::error!("Failed to insert order {order_id}: {e}");
                self.discard_files(payment_ss_filename.as_deref(), Some(&qr_code_filename))
                    .await;
                return Err(e.into());
            }
        };

        log::info!(
            "Order created: order_id={}, tickets={}, total={}",
            order.order_id,
            order.quantity,
            order.total_amount
        );

        let email_sent = match self.notifier.send_order_received(&order).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to send order confirmation for {}: {}",
                    order.order_id,
                    e
                );
                false
            }
        };

        Ok(SubmitOrderResponse {
            order_id: order.order_id,
            email_sent,
        })
    }

    /// 确认订单并发送电子票（已确认的订单可重复确认以重发）
    pub async fn confirm_order(&self, order_id: &str) -> AppResult<OrderStatusChangeResponse> {
        let order = self.transition(order_id, OrderStatus::Confirmed).await?;

        let email_sent = match self.notifier.send_final_ticket(&order).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to send final ticket for {}: {}", order.order_id, e);
                false
            }
        };

        Ok(OrderStatusChangeResponse {
            order: order.into(),
            email_sent: Some(email_sent),
        })
    }

    pub async fn cancel_order(&self, order_id: &str) -> AppResult<OrderStatusChangeResponse> {
        let order = self.transition(order_id, OrderStatus::Cancelled).await?;

        let email_sent = match self.notifier.send_cancellation(&order).await {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to send cancellation email for {}: {}",
                    order.order_id,
                    e
                );
                false
            }
        };

        Ok(OrderStatusChangeResponse {
            order: order.into(),
            email_sent: Some(email_sent),
        })
    }

    /// 后台通用状态修改，不发送邮件
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> AppResult<OrderStatusChangeResponse> {
        let order = self.transition(order_id, status).await?;
        Ok(OrderStatusChangeResponse {
            order: order.into(),
            email_sent: None,
        })
    }

    /// 入场核销
    pub async fn mark_verified(&self, order_id: &str) -> AppResult<OrderResponse> {
        let order = self.transition(order_id, OrderStatus::Verified).await?;
        Ok(order.into())
    }

    /// 扫码查询：只返回尚未核销的订单，不修改任何数据
    pub async fn verify_qr(&self, qr_data: &str) -> AppResult<VerifyQrResponse> {
        let token = extract_token(qr_data);
        if token.is_empty() {
            return Err(AppError::ValidationError("QR data is required".to_string()));
        }

        let order = orders::Entity::find()
            .filter(orders::Column::QrToken.eq(token))
            .filter(orders::Column::IsVerified.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                log::warn!("QR lookup failed for token {token}");
                AppError::NotFound("Ticket not found or already verified".to_string())
            })?;

        Ok(VerifyQrResponse {
            order: order.into(),
            qr_data: qr_data.to_string(),
        })
    }

    pub async fn get_order(&self, order_id: &str) -> AppResult<OrderResponse> {
        Ok(self.find_order(order_id).await?.into())
    }

    /// 订单列表，按创建时间倒序
    pub async fn list_orders(
        &self,
        query: &OrderQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut select = orders::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(orders::Column::Status.eq(status));
        }
        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            select = select.filter(
                Condition::any()
                    .add(orders::Column::OrderId.contains(search))
                    .add(orders::Column::FullName.contains(search))
                    .add(orders::Column::Email.contains(search))
                    .add(orders::Column::Phone.contains(search)),
            );
        }

        let total = select.clone().count(&self.pool).await?;
        let models = select
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        let items: Vec<OrderResponse> = models.into_iter().map(OrderResponse::from).collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 后台首页统计
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        let count_status = |status: OrderStatus| {
            orders::Entity::find()
                .filter(orders::Column::Status.eq(status))
                .count(&self.pool)
        };

        let total_orders = orders::Entity::find().count(&self.pool).await?;
        let pending_orders = count_status(OrderStatus::Pending).await?;
        let confirmed_orders = count_status(OrderStatus::Confirmed).await?;
        let verified_orders = count_status(OrderStatus::Verified).await?;
        let cancelled_orders = count_status(OrderStatus::Cancelled).await?;

        #[derive(Debug, sea_orm::FromQueryResult)]
        struct SalesRow {
            revenue: Option<f64>,
            tickets: Option<i64>,
        }
        let sales = orders::Entity::find()
            .filter(
                orders::Column::Status.is_in([OrderStatus::Confirmed, OrderStatus::Verified]),
            )
            .select_only()
            .column_as(Expr::col(orders::Column::TotalAmount).sum(), "revenue")
            .column_as(Expr::col(orders::Column::Quantity).sum(), "tickets")
            .into_model::<SalesRow>()
            .one(&self.pool)
            .await?;
        let (total_revenue, total_tickets_sold) = sales
            .map(|r| (r.revenue.unwrap_or(0.0), r.tickets.unwrap_or(0)))
            .unwrap_or((0.0, 0));

        let total_contact_messages = contact_messages::Entity::find().count(&self.pool).await?;
        let unread_contact_messages = contact_messages::Entity::find()
            .filter(contact_messages::Column::Status.eq(MessageStatus::Unread))
            .count(&self.pool)
            .await?;

        Ok(DashboardStats {
            total_orders,
            pending_orders,
            confirmed_orders,
            verified_orders,
            cancelled_orders,
            total_revenue,
            total_tickets_sold,
            total_contact_messages,
            unread_contact_messages,
        })
    }

    /// 清空订单表（二维码与截图文件保留在磁盘上）
    pub async fn clear_orders(&self) -> AppResult<ClearOrdersResponse> {
        let result = orders::Entity::delete_many().exec(&self.pool).await?;
        log::warn!("All orders cleared: {} rows deleted", result.rows_affected);
        Ok(ClearOrdersResponse {
            deleted: result.rows_affected,
        })
    }

    async fn find_order(&self, order_id: &str) -> AppResult<orders::Model> {
        orders::Entity::find()
            .filter(orders::Column::OrderId.eq(order_id))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found")))
    }

    /// 下单失败时清理已写入的文件
    async fn discard_files(&self, upload: Option<&str>, qr: Option<&str>) {
        if let Some(name) = upload {
            if let Err(e) = self.store.remove_upload(name).await {
                log::warn!("Failed to remove orphaned upload {name}: {e}");
            }
        }
        if let Some(name) = qr {
            if let Err(e) = self.store.remove_qr(name).await {
                log::warn!("Failed to remove orphaned QR code {name}: {e}");
            }
        }
    }

    /// 按状态流转表修改状态；非法流转直接返回，数据库不变
    ///
    /// UPDATE 以读到的旧状态为条件，并发请求中只有一个能生效。
    async fn transition(&self, order_id: &str, next: OrderStatus) -> AppResult<orders::Model> {
        let current = self.find_order(order_id).await?;
        let previous = current.status;
        previous.transition(next).inspect_err(|e| {
            log::warn!("Rejected status change for {order_id}: {e}");
        })?;

        let now = Utc::now();
        let mut update = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(next))
            .col_expr(orders::Column::UpdatedAt, Expr::value(now))
            .filter(orders::Column::OrderId.eq(order_id))
            .filter(orders::Column::Status.eq(previous));
        if next == OrderStatus::Verified {
            update = update
                .col_expr(orders::Column::IsVerified, Expr::value(true))
                .col_expr(orders::Column::VerifiedAt, Expr::value(Some(now)));
        }
        let result = update.exec(&self.pool).await?;

        if result.rows_affected == 0 {
            let latest = self.find_order(order_id).await?;
            log::warn!(
                "Concurrent status change for {order_id}: expected {previous}, found {}",
                latest.status
            );
            return Err(AppError::InvalidTransition {
                from: latest.status,
                to: next,
            });
        }

        log::info!("Order {order_id} status changed: {previous} -> {next}");
        self.find_order(order_id).await
    }
}

fn validate_ticket(raw: &str) -> AppResult<ValidatedTicket> {
    let info: TicketInfo = serde_json::from_str(raw)
        .map_err(|e| AppError::ValidationError(format!("Invalid ticketInfo: {e}")))?;

    let ticket_type = info.ticket_type.trim().to_string();
    if ticket_type.is_empty() {
        return Err(AppError::ValidationError("Ticket type is required".to_string()));
    }
    if info.quantity < 1 {
        return Err(AppError::ValidationError(
            "Ticket quantity must be at least 1".to_string(),
        ));
    }
    if !info.price_per_ticket.is_finite()
        || !info.total.is_finite()
        || info.price_per_ticket < 0.0
        || info.total < 0.0
    {
        return Err(AppError::ValidationError(
            "Ticket amounts must be non-negative".to_string(),
        ));
    }
    let expected = info.price_per_ticket * f64::from(info.quantity);
    if (expected - info.total).abs() > AMOUNT_TOLERANCE {
        return Err(AppError::ValidationError(format!(
            "Total amount {} does not match {} x {}",
            info.total, info.quantity, info.price_per_ticket
        )));
    }

    Ok(ValidatedTicket {
        ticket_type,
        quantity: info.quantity,
        price_per_ticket: info.price_per_ticket,
        total: info.total,
    })
}

/// activities 必须是字符串数组，统一以 JSON 存储
fn normalize_activities(raw: Option<&str>) -> AppResult<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok("[]".to_string());
    };
    let list: Vec<String> = serde_json::from_str(raw).map_err(|_| {
        AppError::ValidationError("activities must be a JSON array of strings".to_string())
    })?;
    Ok(serde_json::to_string(&list)?)
}
