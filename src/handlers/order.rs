use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::OrderService;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, Result, web};
use futures_util::StreamExt;
use serde_json::json;

/// 单个文本字段上限
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// 读取下单表单；文件字段超过上限时立即中止读取
async fn read_order_form(mut payload: Multipart, max_file_bytes: usize) -> AppResult<OrderSubmission> {
    let mut form = OrderSubmission::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {e}")))?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => continue,
        };

        let limit = if filename.is_some() {
            max_file_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };
        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {e}")))?;
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::ValidationError(format!(
                    "Field {name} exceeds {limit} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match (name.as_str(), filename) {
            ("paymentSS", Some(filename)) => {
                form.payment_screenshot = Some(UploadedFile { filename, bytes });
            }
            (_, Some(_)) => log::debug!("Ignoring unexpected file field {name}"),
            (_, None) => {
                let value = String::from_utf8(bytes).map_err(|_| {
                    AppError::ValidationError(format!("Field {name} is not valid UTF-8"))
                })?;
                if !form.set_text_field(&name, value) {
                    log::debug!("Ignoring unknown form field {name}");
                }
            }
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "order",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "fullName, phone, email, dob, address, requirements, eventParticipation, activities, activityDescription, paymentMethod, transactionId, ticketInfo (JSON) and optional paymentSS file"
    ),
    responses(
        (status = 200, description = "Order submitted", body = SubmitOrderResponse),
        (status = 400, description = "Invalid form data"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn submit_order(
    order_service: web::Data<OrderService>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let form = match read_order_form(payload, order_service.max_upload_bytes()).await {
        Ok(form) => form,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.submit_order(form).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response,
            "message": "Order submitted successfully"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/orders", web::post().to(submit_order));
}
