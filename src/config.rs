use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub event: EventConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in: i64, // seconds
}

/// 首次启动时写入的默认管理员
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub default_username: String,
    pub default_password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: String,
    pub qr_dir: String,
    pub ticket_template_path: String,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: "static/uploads".to_string(),
            qr_dir: "static/qr_codes".to_string(),
            ticket_template_path: "static/ticket_template.png".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    /// 二维码内嵌链接的站点前缀，扫码后跳转到管理后台
    pub base_url: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// 邮件模板中展示的活动信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub dress_code: String,
    pub contact_email: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: "Once Upon a Wedding".to_string(),
            date: "December 20, 2025".to_string(),
            time: "6:00 PM - 12:00 AM".to_string(),
            location: "Lahore".to_string(),
            dress_code: "Formal/Semi-Formal".to_string(),
            contact_email: "tickets@example.com".to_string(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let storage_defaults = StorageConfig::default();

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: get_env("DATABASE_URL")
                            .unwrap_or_else(|| "sqlite://ticket_orders.db?mode=rwc".to_string()),
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 5u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        expires_in: get_env_parse("JWT_EXPIRES_IN", 43_200i64),
                    },
                    admin: AdminConfig::default(),
                    smtp: SmtpConfig {
                        host: get_env("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                        port: get_env_parse("SMTP_PORT", 587u16),
                        username: get_env("SMTP_USERNAME").unwrap_or_default(),
                        password: get_env("SMTP_PASSWORD").unwrap_or_default(),
                        from: get_env("SMTP_FROM").unwrap_or_default(),
                    },
                    storage: StorageConfig {
                        max_upload_bytes: get_env_parse(
                            "MAX_UPLOAD_BYTES",
                            storage_defaults.max_upload_bytes,
                        ),
                        ..storage_defaults
                    },
                    qr: QrConfig::default(),
                    event: EventConfig::default(),
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.expires_in = n;
        }
        if let Ok(v) = env::var("ADMIN_DEFAULT_USERNAME") {
            config.admin.default_username = v;
        }
        if let Ok(v) = env::var("ADMIN_DEFAULT_PASSWORD") {
            config.admin.default_password = v;
        }
        if let Ok(v) = env::var("SMTP_HOST") {
            config.smtp.host = v;
        }
        if let Ok(v) = env::var("SMTP_PORT")
            && let Ok(p) = v.parse()
        {
            config.smtp.port = p;
        }
        if let Ok(v) = env::var("SMTP_USERNAME") {
            config.smtp.username = v;
        }
        if let Ok(v) = env::var("SMTP_PASSWORD") {
            config.smtp.password = v;
        }
        if let Ok(v) = env::var("SMTP_FROM") {
            config.smtp.from = v;
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            config.storage.upload_dir = v;
        }
        if let Ok(v) = env::var("QR_CODE_DIR") {
            config.storage.qr_dir = v;
        }
        if let Ok(v) = env::var("TICKET_TEMPLATE_PATH") {
            config.storage.ticket_template_path = v;
        }
        if let Ok(v) = env::var("MAX_UPLOAD_BYTES")
            && let Ok(n) = v.parse()
        {
            config.storage.max_upload_bytes = n;
        }
        if let Ok(v) = env::var("QR_CODE_BASE_URL") {
            config.qr.base_url = v;
        }
        if let Ok(v) = env::var("EVENT_CONTACT_EMAIL") {
            config.event.contact_email = v;
        }

        // 发件人未配置时回退到登录账号
        if config.smtp.from.is_empty() {
            config.smtp.from = config.smtp.username.clone();
        }

        Ok(config)
    }
}
