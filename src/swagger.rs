use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{MessageStatus, OrderStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("admin_token"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::order::submit_order,
        handlers::contact::submit_contact,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::admin::dashboard,
        handlers::admin::list_orders,
        handlers::admin::clear_orders,
        handlers::admin::get_order,
        handlers::admin::update_order_status,
        handlers::admin::verify_qr,
        handlers::admin::mark_verified,
        handlers::admin::confirm_order,
        handlers::admin::cancel_order,
        handlers::admin::list_contact_messages,
        handlers::admin::mark_contact_read,
    ),
    components(
        schemas(
            OrderStatus,
            MessageStatus,
            TicketInfo,
            SubmitOrderResponse,
            OrderResponse,
            VerifiedOrderSummary,
            OrderQuery,
            OrderIdRequest,
            UpdateOrderStatusRequest,
            VerifyQrRequest,
            VerifyQrResponse,
            OrderStatusChangeResponse,
            ClearOrdersResponse,
            DashboardStats,
            ContactRequest,
            ContactMessageResponse,
            ContactMessageQuery,
            ContactInboxResponse,
            AdminLoginRequest,
            AdminLoginResponse,
            AdminContext,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "order", description = "Ticket order intake"),
        (name = "contact", description = "Contact form"),
        (name = "admin-auth", description = "Admin login / logout"),
        (name = "admin", description = "Order management, QR verification and inbox"),
    ),
    info(
        title = "Once Upon a Wedding Tickets API",
        version = "1.0.0",
        description = "Ticket sales and QR verification REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
