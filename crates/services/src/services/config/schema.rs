use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const CURRENT_CONFIG_VERSION: &str = "v1";

fn default_token_ttl_hours() -> i64 {
    168
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_max_batch_files() -> usize {
    20
}

fn default_sample_stride() -> u32 {
    10
}

fn default_dominant_color() -> String {
    "#000000".to_string()
}

fn generate_token_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub config_version: String,
    pub auth: AuthConfig,
    pub uploads: UploadConfig,
    pub color: ColorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: CURRENT_CONFIG_VERSION.to_string(),
            auth: AuthConfig::default(),
            uploads: UploadConfig::default(),
            color: ColorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret for bearer tokens. Generated on first run and
    /// persisted in the config file so sessions survive restarts.
    pub token_secret: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: generate_token_secret(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Override for the upload directory; defaults to `<asset dir>/uploads`.
    pub dir: Option<PathBuf>,
    pub max_upload_bytes: u64,
    pub max_batch_files: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_upload_bytes: default_max_upload_bytes(),
            max_batch_files: default_max_batch_files(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Fallback dominant color when sampling fails.
    pub default_color: String,
    /// Sample every Nth pixel when bucketing colors.
    pub sample_stride: u32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            default_color: default_dominant_color(),
            sample_stride: default_sample_stride(),
        }
    }
}

impl Config {
    pub fn from_raw(raw_config: &str) -> Self {
        match serde_json::from_str::<Config>(raw_config) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse config (line {}, column {}): {}, using default",
                    e.line(),
                    e.column(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn normalized(mut self) -> Self {
        self.config_version = CURRENT_CONFIG_VERSION.to_string();

        if self.auth.token_secret.trim().is_empty() {
            self.auth.token_secret = generate_token_secret();
        }
        if self.auth.token_ttl_hours <= 0 {
            self.auth.token_ttl_hours = default_token_ttl_hours();
        }
        if self.color.sample_stride == 0 {
            self.color.sample_stride = default_sample_stride();
        }
        if !is_hex_color(&self.color.default_color) {
            tracing::warn!(
                "Invalid default color '{}', resetting to default",
                self.color.default_color
            );
            self.color.default_color = default_dominant_color();
        }
        if matches!(&self.uploads.dir, Some(dir) if dir.as_os_str().is_empty()) {
            self.uploads.dir = None;
        }

        self
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.uploads
            .dir
            .clone()
            .unwrap_or_else(utils::assets::uploads_dir)
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit())
}
