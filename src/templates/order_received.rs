use super::{CID_PAYMENT_SCREENSHOT, RenderedEmail, detail_row, layout};
use crate::config::EventConfig;
use crate::entities::order_entity;
use crate::models::parse_activities;
use crate::utils::{escape_html, format_amount, title_case};

const STYLE: &str = r#".header { background: linear-gradient(135deg, #fa3131 0%, #ff6b6b 100%); color: white; padding: 20px; text-align: center; border-radius: 10px 10px 0 0; }
        .order-details { background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0; }
        .payment-screenshot { margin: 20px 0; text-align: center; }
        .payment-screenshot img { max-width: 100%; height: auto; border: 2px solid #dee2e6; border-radius: 8px; }"#;

/// 下单确认邮件（付款截图内嵌；二维码在管理员确认后随电子票发送）
pub fn render_order_received(
    order: &order_entity::Model,
    event: &EventConfig,
    with_screenshot: bool,
) -> RenderedEmail {
    let mut details = String::new();
    details.push_str(&format!(
        "<p><strong>Order ID:</strong> <span class=\"highlight\">{}</span></p>\n",
        escape_html(&order.order_id)
    ));
    details.push_str(&detail_row("Customer Name", &escape_html(&order.full_name)));
    details.push_str(&detail_row("Email", &escape_html(&order.email)));
    details.push_str(&detail_row("Phone", &escape_html(&order.phone)));
    details.push_str(&detail_row("Date of Birth", &escape_html(&order.dob)));
    details.push_str(&detail_row(
        "Event Participation",
        &escape_html(&title_case(&order.event_participation)),
    ));

    let activities = parse_activities(&order.activities);
    if !activities.is_empty() {
        details.push_str(&detail_row(
            "Selected Activities",
            &escape_html(&title_case(&activities.join(", "))),
        ));
    }
    if let Some(description) = order.activity_description.as_deref().filter(|d| !d.is_empty()) {
        details.push_str(&detail_row("Activity Description", &escape_html(description)));
    }

    details.push_str(&detail_row(
        "Ticket Type",
        &escape_html(&title_case(&order.ticket_type)),
    ));
    details.push_str(&detail_row("Quantity", &order.quantity.to_string()));
    details.push_str(&detail_row(
        "Price per Ticket",
        &format!("Rs. {}", format_amount(order.price_per_ticket)),
    ));
    details.push_str(&format!(
        "<p><strong>Total Amount:</strong> <span class=\"highlight\">Rs. {}</span></p>\n",
        format_amount(order.total_amount)
    ));
    details.push_str(&detail_row(
        "Payment Method",
        &escape_html(&title_case(&order.payment_method)),
    ));
    details.push_str(&detail_row(
        "Order Date",
        &order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ));

    let screenshot = if with_screenshot {
        format!(
            "<div class=\"payment-screenshot\"><h4>📸 Payment Screenshot</h4><img src=\"cid:{CID_PAYMENT_SCREENSHOT}\" alt=\"Payment Screenshot\" /></div>"
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"        <div class="header">
            <h1>🎉 Order Confirmation</h1>
            <p>Thank you for your purchase!</p>
        </div>
        <h2>Order Details</h2>
        <div class="order-details">
{details}        </div>
        {screenshot}
        <h3>Next Steps</h3>
        <p>Your order has been received and is being processed. You will receive another email once your order is confirmed by our team.</p>
        <p>If you have any questions, please contact us at <strong>{contact}</strong></p>
        <div class="footer">
            <p>Thank you for choosing {event_name}! 🎭</p>
            <p>This is an automated email. Please do not reply to this email.</p>
        </div>
"#,
        contact = escape_html(&event.contact_email),
        event_name = escape_html(&event.name),
    );

    RenderedEmail {
        subject: format!("Order Confirmation - {}", order.order_id),
        html: layout(STYLE, &body),
    }
}
