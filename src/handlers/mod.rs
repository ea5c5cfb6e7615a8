pub mod admin;
pub mod auth;
pub mod contact;
pub mod order;

pub use admin::admin_config;
pub use auth::auth_config;
pub use contact::contact_config;
pub use order::order_config;

use crate::error::AppError;
use actix_web::web;

/// `/api/v1` 下的全部路由
///
/// JSON 与查询参数解析失败同样以统一错误信封返回。
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(format!("Invalid JSON body: {err}")).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::ValidationError(format!("Invalid query string: {err}")).into()
            }))
            .configure(order_config)
            .configure(contact_config)
            .configure(admin_config),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, EventConfig};
    use crate::database::test_pool;
    use crate::external::mailer::testing::RecordingMailer;
    use crate::external::storage::test_dirs::temp_store;
    use crate::middlewares::AuthMiddleware;
    use crate::services::*;
    use crate::utils::JwtService;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    const BOUNDARY: &str = "----ouwtestboundary";

    struct Services {
        auth: AuthService,
        orders: OrderService,
        contact: ContactService,
        mailer: RecordingMailer,
    }

    async fn services() -> Services {
        let pool = test_pool().await;
        let store = temp_store();
        let mailer = RecordingMailer::default();
        let notifier =
            NotificationService::new(Arc::new(mailer.clone()), store.clone(), EventConfig::default());
        let auth = AuthService::new(pool.clone(), JwtService::new("handler-secret", 600));
        auth.ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap();
        Services {
            auth,
            orders: OrderService::new(
                pool.clone(),
                store,
                notifier,
                "http://tickets.local".to_string(),
                1024 * 1024,
            ),
            contact: ContactService::new(pool),
            mailer,
        }
    }

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"paymentSS\"; filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn order_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("fullName", "Sana Malik"),
            ("phone", "03001112233"),
            ("email", "sana@example.com"),
            ("dob", "1999-09-09"),
            ("address", "Model Town, Lahore"),
            ("eventParticipation", "no"),
            ("activities", "[]"),
            ("paymentMethod", "bank"),
            ("transactionId", "TX-1"),
            (
                "ticketInfo",
                r#"{"type":"standard","quantity":1,"pricePerTicket":1500,"total":1500}"#,
            ),
        ]
    }

    macro_rules! app {
        ($s:expr) => {
            test::init_service(
                App::new()
                    .wrap(AuthMiddleware::new($s.auth.clone()))
                    .app_data(web::Data::new($s.auth.clone()))
                    .app_data(web::Data::new($s.orders.clone()))
                    .app_data(web::Data::new($s.contact.clone()))
                    .configure(api_config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_order_flow_over_http() {
        let s = services().await;
        let app = app!(s);

        // 下单（公开接口）
        let req = test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(
                &order_fields(),
                Some(("receipt.png", &b"\x89PNG fake"[..])),
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email_sent"], true);
        let order_id = body["data"]["order_id"].as_str().unwrap().to_string();

        // 登录拿到 cookie
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/login")
            .set_json(json!({"username": "admin", "password": "admin123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == ADMIN_TOKEN_COOKIE)
            .unwrap()
            .into_owned();
        assert!(cookie.http_only().unwrap_or(false));

        // 确认订单
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/confirm-order")
            .cookie(cookie.clone())
            .set_json(json!({"order_id": order_id}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["order"]["status"], "confirmed");
        assert_eq!(body["data"]["email_sent"], true);
        assert_eq!(s.mailer.sent().len(), 2);

        // 非法流转返回 409
        let req = test::TestRequest::post()
            .uri("/api/v1/admin/orders/status")
            .cookie(cookie.clone())
            .set_json(json!({"order_id": order_id, "status": "pending"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_STATUS_TRANSITION");

        // 订单详情与统计
        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/admin/orders/{order_id}"))
            .cookie(cookie.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["full_name"], "Sana Malik");

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/dashboard")
            .cookie(cookie.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["stats"]["confirmed_orders"], 1);
        assert_eq!(body["data"]["stats"]["total_revenue"], 1500.0);

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/orders?status=confirmed&per_page=5")
            .cookie(cookie.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["page_size"], 5);

        // 清空
        let req = test::TestRequest::delete()
            .uri("/api/v1/admin/orders")
            .cookie(cookie)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["deleted"], 1);
    }

    #[actix_web::test]
    async fn test_order_form_validation_over_http() {
        let s = services().await;
        let app = app!(s);

        let mut fields = order_fields();
        fields.retain(|(name, _)| *name != "email");
        let req = test::TestRequest::post()
            .uri("/api/v1/orders")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(&fields, None))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_contact_and_inbox() {
        let s = services().await;
        let app = app!(s);

        let req = test::TestRequest::post()
            .uri("/api/v1/contact")
            .set_json(json!({
                "name": "Hamza",
                "phone": "03005556677",
                "email": "hamza@example.com",
                "message": "Do you allow kids?"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "unread");
        let id = body["data"]["id"].as_i64().unwrap();

        // 未登录不能查看收件箱
        let req = test::TestRequest::get()
            .uri("/api/v1/admin/contact-messages")
            .to_request();
        assert!(test::try_call_service(&app, req).await.is_err());

        let token = s
            .auth
            .login(crate::models::AdminLoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap()
            .access_token;
        let bearer = ("Authorization", format!("Bearer {token}"));

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/admin/contact-messages/{id}/read"))
            .insert_header(bearer.clone())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["status"], "read");

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/contact-messages")
            .insert_header(bearer)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["total_messages"], 1);
        assert_eq!(body["data"]["unread_messages"], 0);
    }

    #[actix_web::test]
    async fn test_malformed_json_uses_error_envelope() {
        let s = services().await;
        let app = app!(s);
        let token = s
            .auth
            .login(crate::models::AdminLoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap()
            .access_token;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/orders/status")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(json!({"order_id": "OUW1", "status": "shipped"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let req = test::TestRequest::post()
            .uri("/api/v1/contact")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let req = test::TestRequest::get()
            .uri("/api/v1/admin/orders?status=shipped")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_logout_clears_cookie() {
        let s = services().await;
        let app = app!(s);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/logout")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == ADMIN_TOKEN_COOKIE)
            .unwrap();
        assert_eq!(cookie.value(), "");
    }
}
