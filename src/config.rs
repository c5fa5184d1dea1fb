use std::env;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mock_mode: bool,
    pub aws_region: String,
    pub s3_bucket: String,
    pub api_url: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_session_token: Option<String>,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT").map(|p| p.parse::<u16>()) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                log::warn!("⚠️  Invalid PORT ({}), falling back to 5000", e);
                5000
            }
            None => 5000,
        };

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES").map(|v| v.parse::<usize>()) {
            Some(Ok(limit)) => limit,
            Some(Err(e)) => {
                log::warn!("⚠️  Invalid MAX_UPLOAD_BYTES ({}), falling back to {}", e, DEFAULT_MAX_UPLOAD_BYTES);
                DEFAULT_MAX_UPLOAD_BYTES
            }
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            mock_mode: var("MOCK_AWS", "true").to_lowercase() == "true",
            aws_region: var("AWS_REGION", "us-east-1"),
            s3_bucket: var("S3_BUCKET_NAME", "dummy-bucket"),
            api_url: var("API_GATEWAY_URL", "http://localhost:5000/mock-api"),
            aws_access_key_id: lookup("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: lookup("AWS_SECRET_ACCESS_KEY"),
            aws_session_token: lookup("AWS_SESSION_TOKEN"),
            host: var("HOST", "0.0.0.0"),
            port,
            max_upload_bytes,
            cors_allowed_origins,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        if self.mock_mode {
            "mock"
        } else {
            "remote"
        }
    }

    /// Bucket base shown on the index page
    pub fn bucket_base_url(&self) -> String {
        format!("https://{}.s3.{}.amazonaws.com/", self.s3_bucket, self.aws_region)
    }
}
