//! 環境変数からの設定読み込み

use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/library.db";
const DEFAULT_PORT: u16 = 3000;

/// 永続化の方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// データディレクトリ上の区切りテキストファイル
    FlatFile,
    /// 組み込みデータベース（SQLite）
    Sqlite,
    /// プロセス内のみ（再起動で消える）
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "flat_file" | "file" => Ok(Self::FlatFile),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::UnknownStorage(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown storage backend: {0} (expected csv, sqlite or memory)")]
    UnknownStorage(String),

    #[error("Invalid PORT: {0}")]
    InvalidPort(String),
}

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub port: u16,
    /// 管理者APIのBearerトークン（空文字は未設定扱い）
    pub admin_token: Option<String>,
}

impl AppConfig {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索関数から読み込む
    ///
    /// # 引数
    /// * `lookup` - 変数名から値を返す関数（未設定なら`None`）
    ///
    /// # エラー
    /// * `UnknownStorage` - LIBRARY_STORAGEが既知の値でない
    /// * `InvalidPort` - PORTが数値として解釈できない
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage = match lookup("LIBRARY_STORAGE") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => StorageBackend::FlatFile,
        };

        let data_dir = lookup("LIBRARY_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.clone()))?,
            None => DEFAULT_PORT,
        };

        let admin_token = lookup("LIBRARY_ADMIN_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            storage,
            data_dir,
            database_url,
            port,
            admin_token,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.storage, StorageBackend::FlatFile);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.database_url, "sqlite://data/library.db");
        assert_eq!(config.port, 3000);
        assert_eq!(config.admin_token, None);
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_explicit_values() {
        let config = config_from(&[
            ("LIBRARY_STORAGE", "SQLite"),
            ("LIBRARY_DATA_DIR", "/var/lib/library"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("LIBRARY_ADMIN_TOKEN", " secret "),
        ])
        .unwrap();

        assert_eq!(config.storage, StorageBackend::Sqlite);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/library"));
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.port, 8080);
        assert_eq!(config.admin_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_blank_admin_token_is_unset() {
        let config = config_from(&[("LIBRARY_ADMIN_TOKEN", "   ")]).unwrap();
        assert_eq!(config.admin_token, None);
    }

    #[test]
    fn test_memory_storage() {
        let config = config_from(&[("LIBRARY_STORAGE", "memory")]).unwrap();
        assert_eq!(config.storage, StorageBackend::Memory);
    }

    #[test]
    fn test_unknown_storage_is_rejected() {
        let result = config_from(&[("LIBRARY_STORAGE", "postgres")]);
        assert_eq!(
            result.unwrap_err(),
            ConfigError::UnknownStorage("postgres".to_string())
        );
    }

    #[test]
    fn test_blank_port_uses_default() {
        let config = config_from(&[("PORT", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = config_from(&[("PORT", "http")]);
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }
}
