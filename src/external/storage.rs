use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 本地文件存储：付款截图、二维码图片、电子票模板
#[derive(Clone, Debug)]
pub struct FileStore {
    upload_dir: PathBuf,
    qr_dir: PathBuf,
    ticket_template_path: PathBuf,
}

impl FileStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            qr_dir: PathBuf::from(&config.qr_dir),
            ticket_template_path: PathBuf::from(&config.ticket_template_path),
        }
    }

    pub async fn ensure_dirs(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        tokio::fs::create_dir_all(&self.qr_dir).await?;
        Ok(())
    }

    pub async fn save_upload(&self, filename: &str, bytes: &[u8]) -> AppResult<()> {
        write_file(&self.upload_dir, filename, bytes).await
    }

    pub async fn save_qr(&self, filename: &str, bytes: &[u8]) -> AppResult<()> {
        write_file(&self.qr_dir, filename, bytes).await
    }

    /// 删除上传文件，文件不存在视为成功
    pub async fn remove_upload(&self, filename: &str) -> AppResult<()> {
        remove_optional(&join_checked(&self.upload_dir, filename)?).await
    }

    pub async fn remove_qr(&self, filename: &str) -> AppResult<()> {
        remove_optional(&join_checked(&self.qr_dir, filename)?).await
    }

    /// 文件不存在时返回 None
    pub async fn read_upload(&self, filename: &str) -> AppResult<Option<Vec<u8>>> {
        read_optional(&join_checked(&self.upload_dir, filename)?).await
    }

    pub async fn read_qr(&self, filename: &str) -> AppResult<Option<Vec<u8>>> {
        read_optional(&join_checked(&self.qr_dir, filename)?).await
    }

    pub async fn read_ticket_template(&self) -> AppResult<Option<Vec<u8>>> {
        read_optional(&self.ticket_template_path).await
    }
}

/// 只允许单级文件名，拒绝路径穿越
fn join_checked(dir: &Path, filename: &str) -> AppResult<PathBuf> {
    let valid = !filename.is_empty()
        && Path::new(filename).file_name().and_then(|n| n.to_str()) == Some(filename)
        && filename != "..";
    if !valid {
        return Err(AppError::ValidationError(format!(
            "Invalid stored file name: {filename}"
        )));
    }
    Ok(dir.join(filename))
}

async fn write_file(dir: &Path, filename: &str, bytes: &[u8]) -> AppResult<()> {
    let path = join_checked(dir, filename)?;
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, bytes).await?;
    log::debug!("Stored file {}", path.display());
    Ok(())
}

async fn read_optional(path: &Path) -> AppResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_optional(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}


#[cfg(test)]
mod tests {
    use super::test_dirs::temp_store;
    use super::*;

    #[tokio::test]
    async fn test_save_and_read_back() {
        let store = temp_store();
        store.save_upload("receipt.png", b"png-bytes").await.unwrap();
        store.save_qr("qr_OUW1.png", b"qr-bytes").await.unwrap();

        assert_eq!(
            store.read_upload("receipt.png").await.unwrap().as_deref(),
            Some(&b"png-bytes"[..])
        );
        assert_eq!(
            store.read_qr("qr_OUW1.png").await.unwrap().as_deref(),
            Some(&b"qr-bytes"[..])
        );
    }

    #[tokio::test]
    async fn test_missing_files_are_none() {
        let store = temp_store();
        assert!(store.read_upload("nope.png").await.unwrap().is_none());
        assert!(store.read_ticket_template().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_files() {
        let store = temp_store();
        store.save_upload("receipt.png", b"png-bytes").await.unwrap();
        store.remove_upload("receipt.png").await.unwrap();
        assert!(store.read_upload("receipt.png").await.unwrap().is_none());
        // 重复删除不报错
        store.remove_upload("receipt.png").await.unwrap();
        store.remove_qr("qr_missing.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let store = temp_store();
        assert!(store.save_upload("../escape.png", b"x").await.is_err());
        assert!(store.read_qr("a/b.png").await.is_err());
        assert!(store.read_qr("..").await.is_err());
    }
}
