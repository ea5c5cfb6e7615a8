use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use uuid::Uuid;

pub const ORDER_ID_PREFIX: &str = "OUW";

/// 生成订单号：OUW + 毫秒时间戳 + 5 位随机大写字母数字
///
/// 同一毫秒内的并发提交靠随机后缀区分，数据库唯一索引兜底。
pub fn generate_order_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(5)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("{}{}{}", ORDER_ID_PREFIX, Utc::now().timestamp_millis(), suffix)
}

/// 生成一次性核销令牌（写入二维码）
pub fn generate_qr_token() -> String {
    Uuid::new_v4().simple().to_string()
}
