use super::{CID_QR_CODE, CID_TICKET_TEMPLATE, RenderedEmail, layout};
use crate::config::EventConfig;
use crate::entities::order_entity;
use crate::utils::{escape_html, title_case};

const STYLE: &str = r#".header { text-align: center; margin-bottom: 30px; }
        .logo { font-size: 24px; font-weight: bold; color: #fa3131; }
        .ticket-container { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); padding: 30px; border-radius: 15px; margin: 20px 0; position: relative; overflow: hidden; }
        .ticket-template { width: 100%; max-width: 500px; margin: 0 auto; position: relative; }
        .ticket-info { position: absolute; top: 20px; left: 20px; right: 20px; color: white; z-index: 10; }
        .ticket-title { font-size: 24px; font-weight: bold; margin-bottom: 10px; text-shadow: 2px 2px 4px rgba(0,0,0,0.5); }
        .ticket-details { font-size: 16px; line-height: 1.6; }
        .qr-section { text-align: center; margin: 20px 0; padding: 20px; background-color: #e8f4fd; border-radius: 10px; }
        .qr-code { max-width: 200px; margin: 10px auto; }
        .event-details { background: #f8f9fa; padding: 20px; border-radius: 10px; margin: 20px 0; }"#;

/// 电子票邮件：票面模板 + 二维码（cid 引用）
pub fn render_final_ticket(order: &order_entity::Model, event: &EventConfig) -> RenderedEmail {
    let event_name = escape_html(&event.name);
    let date = escape_html(&event.date);
    let time = escape_html(&event.time);
    let location = escape_html(&event.location);

    let body = format!(
        r#"        <div class="header">
            <div class="logo">🎉 {event_name}</div>
            <h2>Your Final Ticket is Ready!</h2>
        </div>
        <div class="ticket-container">
            <div class="ticket-template">
                <img src="cid:{CID_TICKET_TEMPLATE}" alt="Ticket Template" style="width: 100%; height: auto; border-radius: 15px;">
                <div class="ticket-info">
                    <div class="ticket-title">🎫 {full_name}</div>
                    <div class="ticket-details">
                        <strong>Order ID:</strong> {order_id}<br>
                        <strong>Ticket Type:</strong> {ticket_type}<br>
                        <strong>Quantity:</strong> {quantity} ticket(s)<br>
                        <strong>Event:</strong> {event_name}<br>
                        <strong>Date:</strong> {date}<br>
                        <strong>Time:</strong> {time}<br>
                        <strong>Location:</strong> {location}
                    </div>
                </div>
            </div>
        </div>
        <div class="qr-section">
            <h3>🔐 Your Digital QR Code</h3>
            <div class="qr-code">
                <img src="cid:{CID_QR_CODE}" alt="QR Code" style="width: 100%; height: auto; border: 2px solid #dee2e6; border-radius: 8px;">
            </div>
            <div style="color: #666; font-size: 14px; margin-top: 10px;">
                <strong>Important:</strong> Present this QR code at the event entrance for verification. It can be scanned only once.
            </div>
        </div>
        <div class="event-details">
            <h3>📋 Event Details</h3>
            <p><strong>Event:</strong> {event_name}</p>
            <p><strong>Date:</strong> {date}</p>
            <p><strong>Time:</strong> {time}</p>
            <p><strong>Location:</strong> {location}</p>
            <p><strong>Dress Code:</strong> {dress_code}</p>
        </div>
        <div class="footer">
            <p>🎭 Thank you for choosing {event_name}!</p>
            <p>For any queries, please contact us at <strong>{contact}</strong></p>
            <p><em>This is your official ticket. Please keep it safe!</em></p>
        </div>
"#,
        full_name = escape_html(&order.full_name),
        order_id = escape_html(&order.order_id),
        ticket_type = escape_html(&title_case(&order.ticket_type)),
        quantity = order.quantity,
        dress_code = escape_html(&event.dress_code),
        contact = escape_html(&event.contact_email),
    );

    RenderedEmail {
        subject: format!("🎫 Your Final Ticket - {}", order.order_id),
        html: layout(STYLE, &body),
    }
}
