//! HTML 邮件模板
//!
//! 模板只做字符串插值，所有用户输入在插值前做 HTML 转义；
//! 图片通过 `cid:` 引用，由 NotificationService 以内嵌附件形式挂载。

mod cancellation;
mod final_ticket;
mod order_received;

pub use cancellation::render_cancellation;
pub use final_ticket::render_final_ticket;
pub use order_received::render_order_received;

pub const CID_PAYMENT_SCREENSHOT: &str = "payment_screenshot";
pub const CID_TICKET_TEMPLATE: &str = "ticket_template";
pub const CID_QR_CODE: &str = "qr_code";

#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

fn layout(style: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; background-color: #f4f4f4; }}
        .container {{ max-width: 600px; margin: 0 auto; background-color: white; padding: 30px; border-radius: 10px; box-shadow: 0 0 10px rgba(0,0,0,0.1); }}
        .highlight {{ color: #fa3131; font-weight: bold; }}
        .footer {{ text-align: center; margin-top: 30px; color: #666; font-size: 14px; }}
        {style}
    </style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#
    )
}

/// `<p><strong>label:</strong> value</p>`，value 需已转义
fn detail_row(label: &str, value: &str) -> String {
    format!("<p><strong>{label}:</strong> {value}</p>\n")
}
