use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub log_level: String,
    pub upload_dir: PathBuf,
    pub max_upload_request: usize,
    pub cloudinary: Option<CloudinaryConfig>,
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

/// Dashboard login. When absent, write endpoints are open.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub password_hash: String,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("SITE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid SITE_HOST: {e}"))?;

        let port: u16 = env_or("SITE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid SITE_PORT: {e}"))?;

        let base_url = env_or("SITE_BASE_URL", "https://aldeyarksa.tech")
            .trim_end_matches('/')
            .to_string();

        let log_level = env_or("SITE_LOG_LEVEL", "info");

        let upload_dir = PathBuf::from(env_or("SITE_UPLOAD_DIR", "public/uploads"));

        let max_upload_request: usize = env_or("SITE_MAX_UPLOAD_REQUEST", "268435456")
            .parse()
            .map_err(|e| format!("Invalid SITE_MAX_UPLOAD_REQUEST: {e}"))?;

        let cloudinary = match (
            std::env::var("CLOUDINARY_CLOUD_NAME").ok(),
            std::env::var("CLOUDINARY_API_KEY").ok(),
            std::env::var("CLOUDINARY_API_SECRET").ok(),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => CloudinaryConfig::new(
                cloud_name,
                api_key,
                api_secret,
                env_or("CLOUDINARY_FOLDER", "portfolio/projects"),
            ),
            _ => None,
        };

        let admin = match std::env::var("ADMIN_PASSWORD_HASH").ok() {
            Some(password_hash) if !password_hash.trim().is_empty() => Some(AdminConfig {
                password_hash,
                jwt_secret: env_required("JWT_SECRET")?,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            base_url,
            log_level,
            upload_dir,
            max_upload_request,
            cloudinary,
            admin,
        })
    }
}

impl CloudinaryConfig {
    /// Returns `None` for blank credentials or the placeholder `demo` cloud.
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: String,
    ) -> Option<Self> {
        if cloud_name.trim().is_empty()
            || api_key.trim().is_empty()
            || api_secret.trim().is_empty()
            || cloud_name == "demo"
        {
            return None;
        }
        Some(CloudinaryConfig {
            cloud_name,
            api_key,
            api_secret,
            folder,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_cloud_disables_cdn() {
        let cfg = CloudinaryConfig::new(
            "demo".into(),
            "key".into(),
            "secret".into(),
            "portfolio".into(),
        );
        assert!(cfg.is_none());
    }

    #[test]
    fn blank_secret_disables_cdn() {
        let cfg = CloudinaryConfig::new(
            "aldeyar".into(),
            "key".into(),
            " ".into(),
            "portfolio".into(),
        );
        assert!(cfg.is_none());
    }

    #[test]
    fn full_credentials_enable_cdn() {
        let cfg = CloudinaryConfig::new(
            "aldeyar".into(),
            "key".into(),
            "secret".into(),
            "portfolio/projects".into(),
        )
        .unwrap();
        assert_eq!(cfg.cloud_name, "aldeyar");
        assert_eq!(cfg.folder, "portfolio/projects");
    }
}
