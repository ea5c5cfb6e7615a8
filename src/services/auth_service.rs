use crate::config::AdminConfig;
use crate::entities::admin_user_entity as admin_users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// 管理员登录，签发 admin 类型的 JWT
    pub async fn login(&self, request: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let username = request.username.trim();
        if username.is_empty() || request.password.is_empty() {
            return Err(AppError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }

        let admin = admin_users::Entity::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(&self.pool)
            .await?;

        // 用户不存在与密码错误返回同样的信息
        let admin = match admin {
            Some(admin) if verify_password(&request.password, &admin.password_hash)? => admin,
            _ => {
                log::warn!("Failed admin login attempt for username={username}");
                return Err(AppError::AuthError("Invalid username or password".to_string()));
            }
        };

        let access_token = self
            .jwt_service
            .generate_admin_token(admin.id, &admin.username)?;
        log::info!("Admin logged in: {}", admin.username);

        Ok(AdminLoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.get_expires_in(),
            username: admin.username,
        })
    }

    /// 校验令牌并还原管理员上下文
    pub fn authenticate(&self, token: &str) -> AppResult<AdminContext> {
        let claims = self.jwt_service.verify_admin_token(token)?;
        let admin_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))?;
        Ok(AdminContext {
            admin_id,
            username: claims.username,
        })
    }

    /// 管理员表为空时写入默认账号，返回是否新建
    pub async fn ensure_default_admin(&self, config: &AdminConfig) -> AppResult<bool> {
        let existing = admin_users::Entity::find().count(&self.pool).await?;
        if existing > 0 {
            return Ok(false);
        }

        admin_users::ActiveModel {
            username: Set(config.default_username.clone()),
            password_hash: Set(hash_password(&config.default_password)?),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::warn!(
            "Created default admin account '{}', change its password",
            config.default_username
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;

    async fn service() -> AuthService {
        let service = AuthService::new(test_pool().await, JwtService::new("test-secret", 3600));
        service
            .ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap();
        service
    }

    fn login_request(username: &str, password: &str) -> AdminLoginRequest {
        AdminLoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_default_admin_seeded_once() {
        let service = service().await;
        assert!(!service
            .ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap());
        assert_eq!(
            admin_users::Entity::find().count(&service.pool).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_login_and_authenticate() {
        let service = service().await;
        let response = service
            .login(login_request("admin", "admin123"))
            .await
            .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);

        let context = service.authenticate(&response.access_token).unwrap();
        assert_eq!(context.username, "admin");
        assert!(context.admin_id > 0);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let service = service().await;
        assert!(matches!(
            service.login(login_request("admin", "wrong")).await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            service.login(login_request("nobody", "admin123")).await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            service.login(login_request(" ", "")).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage() {
        let service = service().await;
        assert!(service.authenticate("not-a-jwt").is_err());
    }
}
