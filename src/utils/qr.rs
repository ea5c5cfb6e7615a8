use crate::error::{AppError, AppResult};
use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

const MODULE_PIXELS: u32 = 10;

/// 二维码内容：后台扫码地址，携带核销令牌
pub fn build_scan_url(base_url: &str, token: &str) -> String {
    format!("{}/admin/dashboard?scan={}", base_url.trim_end_matches('/'), token)
}

/// 从扫码结果中提取令牌，兼容完整链接与裸令牌两种输入
pub fn extract_token(scanned: &str) -> &str {
    let scanned = scanned.trim();
    match scanned.find("scan=") {
        Some(pos) => {
            let rest = &scanned[pos + "scan=".len()..];
            rest.split(['&', '#']).next().unwrap_or(rest).trim()
        }
        None => scanned,
    }
}

/// 渲染 PNG 二维码（黑码白底，带静区）
pub fn render_png(data: &str) -> AppResult<Vec<u8>> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::L)
        .map_err(|e| AppError::InternalError(format!("QR encoding failed: {e}")))?;

    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_PIXELS, MODULE_PIXELS)
        .quiet_zone(true)
        .build();

    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| AppError::InternalError(format!("QR PNG encoding failed: {e}")))?;

    Ok(buf.into_inner())
}
