use crate::error::AppError;
use crate::models::AdminContext;
use crate::services::{ADMIN_TOKEN_COOKIE, AuthService};
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

// 公开路径配置
struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            // 完全匹配的公开路径
            exact_paths: vec![
                "/swagger-ui",
                "/api-docs/openapi.json",
                "/api/v1/orders",
                "/api/v1/contact",
                "/api/v1/admin/login",
                "/api/v1/admin/logout",
            ],
            // 前缀匹配的公开路径
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        if self.exact_paths.contains(&path) {
            return true;
        }

        self.prefix_paths
            .iter()
            .any(|&prefix| path.starts_with(prefix))
    }
}

/// 优先读取 `Authorization: Bearer`，其次读取登录时写入的 cookie
fn extract_token(req: &ServiceRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    bearer.or_else(|| {
        req.cookie(ADMIN_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

pub struct AuthMiddleware {
    auth_service: AuthService,
}

impl AuthMiddleware {
    pub fn new(auth_service: AuthService) -> Self {
        Self { auth_service }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            auth_service: self.auth_service.clone(),
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    auth_service: AuthService,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS 预检与公开路径直接放行
        if req.method() == Method::OPTIONS || self.public_paths.is_public_path(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(fut);
        }

        let Some(token) = extract_token(&req) else {
            let error = AppError::AuthError("Missing admin token".to_string());
            return Box::pin(async move { Err(error.into()) });
        };

        match self.auth_service.authenticate(&token) {
            Ok(context) => {
                req.extensions_mut().insert(context);
                let fut = self.service.call(req);
                Box::pin(fut)
            }
            Err(e) => {
                log::warn!("Rejected admin token on {}: {}", req.path(), e);
                let error = AppError::AuthError("Invalid or expired admin token".to_string());
                Box::pin(async move { Err(error.into()) })
            }
        }
    }
}

/// 处理函数直接声明 `AdminContext` 参数即可获取当前管理员
impl FromRequest for AdminContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = req.extensions().get::<AdminContext>().cloned();
        ready(context.ok_or_else(|| {
            AppError::AuthError("Admin authentication required".to_string()).into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdminConfig;
    use crate::database::test_pool;
    use crate::utils::JwtService;
    use actix_web::cookie::Cookie;
    use actix_web::{App, HttpResponse, http::StatusCode, web};

    async fn whoami(admin: AdminContext) -> HttpResponse {
        HttpResponse::Ok().body(admin.username)
    }

    async fn auth_service() -> AuthService {
        let service = AuthService::new(test_pool().await, JwtService::new("mw-secret", 600));
        service
            .ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap();
        service
    }

    #[test]
    fn test_public_paths() {
        let paths = PublicPaths::new();
        assert!(paths.is_public_path("/api/v1/orders"));
        assert!(paths.is_public_path("/api/v1/admin/login"));
        assert!(paths.is_public_path("/swagger-ui/index.html"));
        assert!(!paths.is_public_path("/api/v1/admin/orders"));
        assert!(!paths.is_public_path("/api/v1/admin/dashboard"));
    }

    #[actix_web::test]
    async fn test_admin_routes_require_token() {
        let auth = auth_service().await;
        let token = auth
            .login(crate::models::AdminLoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap()
            .access_token;

        let app = actix_web::test::init_service(
            App::new()
                .wrap(AuthMiddleware::new(auth))
                .route("/api/v1/admin/whoami", web::get().to(whoami))
                .route(
                    "/api/v1/contact",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/contact")
            .to_request();
        let resp = actix_web::test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/admin/whoami")
            .to_request();
        let err = actix_web::test::try_call_service(&app, req)
            .await
            .unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );

        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/admin/whoami")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"admin"));

        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/admin/whoami")
            .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token.clone()))
            .to_request();
        let body = actix_web::test::call_and_read_body(&app, req).await;
        assert_eq!(body, web::Bytes::from_static(b"admin"));

        let req = actix_web::test::TestRequest::get()
            .uri("/api/v1/admin/whoami")
            .insert_header(("Authorization", "Bearer forged"))
            .to_request();
        assert!(actix_web::test::try_call_service(&app, req).await.is_err());
    }
}
