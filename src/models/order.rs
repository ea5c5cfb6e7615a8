use crate::entities::{OrderStatus, order_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// 前端提交的票务信息（multipart 中的 `ticketInfo` JSON 字段）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketInfo {
    #[serde(rename = "type")]
    #[schema(example = "early bird")]
    pub ticket_type: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = 1500.0)]
    pub price_per_ticket: f64,
    #[schema(example = 3000.0)]
    pub total: f64,
}

/// 上传的付款截图
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// multipart 表单解析结果，字段未经校验
#[derive(Debug, Clone, Default)]
pub struct OrderSubmission {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub requirements: Option<String>,
    pub event_participation: Option<String>,
    pub activities: Option<String>,
    pub activity_description: Option<String>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub ticket_info: Option<String>,
    pub payment_screenshot: Option<UploadedFile>,
}

impl OrderSubmission {
    /// 按表单字段名写入文本值，未知字段忽略
    pub fn set_text_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "fullName" => &mut self.full_name,
            "phone" => &mut self.phone,
            "email" => &mut self.email,
            "dob" => &mut self.dob,
            "address" => &mut self.address,
            "requirements" => &mut self.requirements,
            "eventParticipation" => &mut self.event_participation,
            "activities" => &mut self.activities,
            "activityDescription" => &mut self.activity_description,
            "paymentMethod" => &mut self.payment_method,
            "transactionId" => &mut self.transaction_id,
            "ticketInfo" => &mut self.ticket_info,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmitOrderResponse {
    #[schema(example = "OUW1734700000000AB12C")]
    pub order_id: String,
    pub email_sent: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i64,
    pub order_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub dob: String,
    pub address: String,
    pub requirements: Option<String>,
    pub event_participation: String,
    pub activities: Vec<String>,
    pub activity_description: Option<String>,
    pub ticket_type: String,
    pub quantity: i32,
    pub price_per_ticket: f64,
    pub total_amount: f64,
    pub payment_method: String,
    pub payment_ss_filename: Option<String>,
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
    pub qr_code_filename: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<order_entity::Model> for OrderResponse {
    fn from(m: order_entity::Model) -> Self {
        Self {
            activities: parse_activities(&m.activities),
            id: m.id,
            order_id: m.order_id,
            full_name: m.full_name,
            phone: m.phone,
            email: m.email,
            dob: m.dob,
            address: m.address,
            requirements: m.requirements,
            event_participation: m.event_participation,
            activity_description: m.activity_description,
            ticket_type: m.ticket_type,
            quantity: m.quantity,
            price_per_ticket: m.price_per_ticket,
            total_amount: m.total_amount,
            payment_method: m.payment_method,
            payment_ss_filename: m.payment_ss_filename,
            transaction_id: m.transaction_id,
            status: m.status,
            qr_code_filename: m.qr_code_filename,
            is_verified: m.is_verified,
            verified_at: m.verified_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 数据库中 activities 为 JSON 数组字符串，历史脏数据按空数组处理
pub fn parse_activities(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// 扫码核销时返回给管理员确认的订单摘要
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifiedOrderSummary {
    pub id: i64,
    pub order_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub ticket_type: String,
    pub quantity: i32,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<order_entity::Model> for VerifiedOrderSummary {
    fn from(m: order_entity::Model) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            full_name: m.full_name,
            phone: m.phone,
            email: m.email,
            ticket_type: m.ticket_type,
            quantity: m.quantity,
            total_amount: m.total_amount,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    /// 页码，从 1 开始
    pub page: Option<u64>,
    /// 每页数量，最大 100
    pub per_page: Option<u64>,
    pub status: Option<OrderStatus>,
    /// 匹配订单号、姓名、邮箱、电话
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderIdRequest {
    #[schema(example = "OUW1734700000000AB12C")]
    pub order_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub order_id: String,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyQrRequest {
    /// 扫码得到的原始内容（完整链接或令牌）
    pub qr_data: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyQrResponse {
    pub order: VerifiedOrderSummary,
    pub qr_data: String,
}

/// 状态变更结果；confirm / cancel 会附带邮件发送结果
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusChangeResponse {
    pub order: OrderResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_sent: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearOrdersResponse {
    pub deleted: u64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub confirmed_orders: u64,
    pub verified_orders: u64,
    pub cancelled_orders: u64,
    /// confirmed + verified 订单金额合计
    pub total_revenue: f64,
    /// confirmed + verified 订单票数合计
    pub total_tickets_sold: i64,
    pub total_contact_messages: u64,
    pub unread_contact_messages: u64,
}
