use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub username: String,
}

/// 已认证的管理员上下文，由鉴权中间件写入请求扩展
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminContext {
    pub admin_id: i64,
    pub username: String,
}
