use crate::models::*;
use crate::services::{ContactService, OrderService};
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn dashboard(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
) -> Result<HttpResponse> {
    match order_service.dashboard_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": {
                "admin": admin,
                "stats": stats
            }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/orders",
    tag = "admin",
    params(OrderQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated orders, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    order_service: web::Data<OrderService>,
    _admin: AdminContext,
    query: web::Query<OrderQuery>,
) -> Result<HttpResponse> {
    match order_service.list_orders(&query).await {
        Ok(orders) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": orders
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/orders",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All orders deleted", body = ClearOrdersResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn clear_orders(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
) -> Result<HttpResponse> {
    log::warn!("Admin {} requested clearing all orders", admin.username);
    match order_service.clear_orders().await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result,
            "message": "All orders cleared"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/orders/{order_id}",
    tag = "admin",
    params(("order_id" = String, Path, description = "Order number")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order detail", body = OrderResponse),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    order_service: web::Data<OrderService>,
    _admin: AdminContext,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match order_service.get_order(&path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/orders/status",
    tag = "admin",
    request_body = UpdateOrderStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status updated", body = OrderStatusChangeResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn update_order_status(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
    request: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    log::info!(
        "Admin {} sets order {} to {}",
        admin.username,
        request.order_id,
        request.status
    );
    match order_service
        .update_status(&request.order_id, request.status)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/verify-qr",
    tag = "admin",
    request_body = VerifyQrRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket found and not yet verified", body = VerifyQrResponse),
        (status = 404, description = "Ticket not found or already verified")
    )
)]
pub async fn verify_qr(
    order_service: web::Data<OrderService>,
    _admin: AdminContext,
    request: web::Json<VerifyQrRequest>,
) -> Result<HttpResponse> {
    match order_service.verify_qr(&request.qr_data).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/mark-verified",
    tag = "admin",
    request_body = OrderIdRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Ticket marked as verified", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not confirmed or already verified")
    )
)]
pub async fn mark_verified(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
    request: web::Json<OrderIdRequest>,
) -> Result<HttpResponse> {
    log::info!("Admin {} verifies order {}", admin.username, request.order_id);
    match order_service.mark_verified(&request.order_id).await {
        Ok(order) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": order,
            "message": "Ticket verified"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/confirm-order",
    tag = "admin",
    request_body = OrderIdRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order confirmed; final ticket email attempted", body = OrderStatusChangeResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn confirm_order(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
    request: web::Json<OrderIdRequest>,
) -> Result<HttpResponse> {
    log::info!("Admin {} confirms order {}", admin.username, request.order_id);
    match order_service.confirm_order(&request.order_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/cancel-order",
    tag = "admin",
    request_body = OrderIdRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Order cancelled; cancellation email attempted", body = OrderStatusChangeResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn cancel_order(
    order_service: web::Data<OrderService>,
    admin: AdminContext,
    request: web::Json<OrderIdRequest>,
) -> Result<HttpResponse> {
    log::info!("Admin {} cancels order {}", admin.username, request.order_id);
    match order_service.cancel_order(&request.order_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": result
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/contact-messages",
    tag = "admin",
    params(ContactMessageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Contact inbox", body = ContactInboxResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_contact_messages(
    contact_service: web::Data<ContactService>,
    _admin: AdminContext,
    query: web::Query<ContactMessageQuery>,
) -> Result<HttpResponse> {
    match contact_service.list(&query).await {
        Ok(inbox) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": inbox
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/contact-messages/{id}/read",
    tag = "admin",
    params(("id" = i64, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message marked as read", body = ContactMessageResponse),
        (status = 404, description = "Message not found")
    )
)]
pub async fn mark_contact_read(
    contact_service: web::Data<ContactService>,
    _admin: AdminContext,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match contact_service.mark_read(path.into_inner()).await {
        Ok(message) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": message
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .configure(super::auth::auth_config)
            .route("/dashboard", web::get().to(dashboard))
            .route("/orders", web::get().to(list_orders))
            .route("/orders", web::delete().to(clear_orders))
            .route("/orders/status", web::post().to(update_order_status))
            .route("/orders/{order_id}", web::get().to(get_order))
            .route("/verify-qr", web::post().to(verify_qr))
            .route("/mark-verified", web::post().to(mark_verified))
            .route("/confirm-order", web::post().to(confirm_order))
            .route("/cancel-order", web::post().to(cancel_order))
            .route("/contact-messages", web::get().to(list_contact_messages))
            .route(
                "/contact-messages/{id}/read",
                web::post().to(mark_contact_read),
            ),
    );
}
