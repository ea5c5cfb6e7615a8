use crate::models::*;
use crate::services::{ADMIN_TOKEN_COOKIE, AuthService};
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

fn token_cookie(value: String) -> Cookie<'static> {
    Cookie::build(ADMIN_TOKEN_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin-auth",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login succeeded; token also set as HttpOnly cookie", body = AdminLoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => {
            let mut cookie = token_cookie(response.access_token.clone());
            cookie.set_max_age(Duration::seconds(response.expires_in));
            Ok(HttpResponse::Ok().cookie(cookie).json(json!({
                "success": true,
                "data": response
            })))
        }
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "admin-auth",
    responses(
        (status = 200, description = "Cookie cleared")
    )
)]
pub async fn logout() -> Result<HttpResponse> {
    let mut cookie = token_cookie(String::new());
    cookie.make_removal();
    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "success": true,
        "message": "Logged out"
    })))
}

/// 登录/登出挂在 `/admin` scope 下
pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout));
}
