use super::{RenderedEmail, detail_row, layout};
use crate::config::EventConfig;
use crate::entities::order_entity;
use crate::utils::{escape_html, format_amount, title_case};
use chrono::NaiveDate;

const STYLE: &str = r#".header { text-align: center; margin-bottom: 30px; }
        .logo { font-size: 24px; font-weight: bold; color: #fa3131; }
        .cancellation-notice { background: linear-gradient(135deg, #ff6b6b 0%, #ee5a52 100%); padding: 30px; border-radius: 15px; margin: 20px 0; text-align: center; color: white; }
        .order-details { background: #f8f9fa; padding: 20px; border-radius: 10px; margin: 20px 0; }
        .order-details strong { color: #fa3131; }
        .notice { background: #fff3cd; padding: 20px; border-radius: 10px; margin: 20px 0; border-left: 4px solid #ffc107; color: #856404; }"#;

pub fn render_cancellation(
    order: &order_entity::Model,
    event: &EventConfig,
    cancelled_on: NaiveDate,
) -> RenderedEmail {
    let mut details = String::new();
    details.push_str(&detail_row("Order ID", &escape_html(&order.order_id)));
    details.push_str(&detail_row("Customer Name", &escape_html(&order.full_name)));
    details.push_str(&detail_row("Email", &escape_html(&order.email)));
    details.push_str(&detail_row("Phone", &escape_html(&order.phone)));
    details.push_str(&detail_row(
        "Ticket Type",
        &escape_html(&title_case(&order.ticket_type)),
    ));
    details.push_str(&detail_row(
        "Quantity",
        &format!("{} ticket(s)", order.quantity),
    ));
    details.push_str(&detail_row(
        "Total Amount",
        &format!("Rs. {}", format_amount(order.total_amount)),
    ));
    details.push_str(&detail_row(
        "Order Date",
        &order.created_at.format("%Y-%m-%d").to_string(),
    ));
    details.push_str(&detail_row(
        "Cancellation Date",
        &cancelled_on.format("%Y-%m-%d").to_string(),
    ));

    let body = format!(
        r#"        <div class="header">
            <div class="logo">🎭 {event_name}</div>
            <h2>Order Cancellation Notice</h2>
        </div>
        <div class="cancellation-notice">
            <h2 style="margin: 0; font-size: 28px;">❌ Order Cancelled</h2>
            <p style="margin: 10px 0 0 0; font-size: 18px;">We're sorry to inform you that your order has been cancelled.</p>
        </div>
        <div class="order-details">
            <h3>📋 Cancelled Order Details</h3>
{details}        </div>
        <div class="notice">
            <h3 style="margin-top: 0;">⚠️ Important Information</h3>
            <p style="margin-bottom: 0;">
                • Your ticket is no longer valid for the event<br>
                • QR code has been deactivated<br>
                • Contact us if you have any questions about a refund
            </p>
        </div>
        <div class="footer">
            <p>🎭 Thank you for your understanding!</p>
            <p>For any queries regarding this cancellation, please contact us at <strong>{contact}</strong></p>
        </div>
"#,
        event_name = escape_html(&event.name),
        contact = escape_html(&event.contact_email),
    );

    RenderedEmail {
        subject: format!("❌ Order Cancelled - {}", order.order_id),
        html: layout(STYLE, &body),
    }
}
