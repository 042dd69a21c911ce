//! 連線設定
//!
//! # 環境變數
//!
//! - `KITCHEN_PROFILE` - 部署環境：`local`（預設）或 `hosted`
//! - `KITCHEN_API_URL` - API 基底網址；`hosted` 必填，`local` 可覆寫預設值

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 本地開發預設 API 位址
pub const LOCAL_API_URL: &str = "http://localhost:3000/api";

const PROFILE_VAR: &str = "KITCHEN_PROFILE";
const API_URL_VAR: &str = "KITCHEN_API_URL";

/// 設定載入錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("缺少環境變數: {0}")]
    MissingEnvVar(String),
    #[error("環境變數 {0} 無效: {1}")]
    InvalidEnvVar(String, String),
}

/// 部署環境
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentProfile {
    /// 本地開發
    #[default]
    Local,
    /// 雲端部署
    Hosted,
}

impl FromStr for DeploymentProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "" => Ok(Self::Local),
            "hosted" => Ok(Self::Hosted),
            other => Err(ConfigError::InvalidEnvVar(
                PROFILE_VAR.to_string(),
                format!("未知的部署環境 `{other}`"),
            )),
        }
    }
}

impl fmt::Display for DeploymentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Hosted => f.write_str("hosted"),
        }
    }
}

/// API 用戶端設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 部署環境
    pub profile: DeploymentProfile,

    /// API 基底網址（不含結尾斜線）
    pub base_url: String,
}

impl ClientConfig {
    /// 創建指定環境的設定
    pub fn new(profile: DeploymentProfile, base_url: impl Into<String>) -> Self {
        Self {
            profile,
            base_url: trim_base_url(base_url.into()),
        }
    }

    /// 本地開發設定
    pub fn local() -> Self {
        Self::new(DeploymentProfile::Local, LOCAL_API_URL)
    }

    /// 建構器模式：覆寫基底網址
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url.into());
        self
    }

    /// 從環境變數載入
    ///
    /// # Errors
    ///
    /// `hosted` 環境缺少 `KITCHEN_API_URL`，或設定值無效時回傳錯誤。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 從任意鍵值來源載入（方便測試）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = lookup(PROFILE_VAR)
            .map(|raw| raw.parse::<DeploymentProfile>())
            .transpose()?
            .unwrap_or_default();

        let api_url = lookup(API_URL_VAR).filter(|url| !url.trim().is_empty());

        let base_url = match (profile, api_url) {
            (_, Some(url)) => url,
            (DeploymentProfile::Local, None) => LOCAL_API_URL.to_string(),
            (DeploymentProfile::Hosted, None) => {
                return Err(ConfigError::MissingEnvVar(API_URL_VAR.to_string()))
            }
        };

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar(
                API_URL_VAR.to_string(),
                "必須以 http:// 或 https:// 開頭".to_string(),
            ));
        }

        Ok(Self::new(profile, base_url))
    }

}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::local()
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
