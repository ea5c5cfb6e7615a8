use crate::error::{AppError, AppResult};
use chrono::Local;

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "pdf"];

/// 文件扩展名是否在白名单内（大小写不敏感）
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// 清理上传文件名：去掉路径、只保留 ASCII 字母数字与 `._-`，空白替换为下划线
pub fn secure_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// 校验并生成落盘文件名：`YYYYmmdd_HHMMSS_` 前缀 + 订单号 + 清理后的原文件名
///
/// 订单号保证同一秒内上传的同名文件不会互相覆盖。
pub fn stored_upload_name(original: &str, order_id: &str) -> AppResult<String> {
    if !allowed_file(original) {
        return Err(AppError::ValidationError(format!(
            "File type not allowed, expected one of: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    let cleaned = secure_filename(original);
    if !allowed_file(&cleaned) {
        return Err(AppError::ValidationError("Invalid file name".to_string()));
    }
    Ok(format!(
        "{}_{}_{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        order_id,
        cleaned
    ))
}

/// 根据扩展名推断 MIME，用于邮件内嵌附件
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("receipt.PNG"));
        assert!(allowed_file("scan.final.pdf"));
        assert!(!allowed_file("payload.exe"));
        assert!(!allowed_file("noextension"));
        assert!(!allowed_file("png"));
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\my receipt.jpg"), "my_receipt.jpg");
        assert_eq!(secure_filename("ödd näme.png"), "dd_nme.png");
    }

    #[test]
    fn test_stored_upload_name() {
        let name = stored_upload_name("bank transfer.jpeg", "OUW1A").unwrap();
        assert!(name.ends_with("_OUW1A_bank_transfer.jpeg"));
        // 20250101_120000_ 前缀
        assert_eq!(name.as_bytes()[8], b'_');
        assert_eq!(name.as_bytes()[15], b'_');

        assert!(matches!(
            stored_upload_name("shell.php", "OUW1A"),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_stored_upload_name_differs_per_order() {
        let a = stored_upload_name("receipt.png", "OUW1AAAAA").unwrap();
        let b = stored_upload_name("receipt.png", "OUW1BBBBB").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.JPG"), "image/jpeg");
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a"), "application/octet-stream");
    }
}
