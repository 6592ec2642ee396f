//! サーバー設定
//!
//! バイナリの CLI 引数（環境変数フォールバック付き）から組み立てられ、
//! 各ユースケースのしきい値やデバイス API の接続先を保持します。

use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::usecase::LivenessPolicy;

/// 設定のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 値が不正
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// 静的ファイルのディレクトリに index.html がない
    #[error("static assets not found: {0}")]
    StaticAssetsMissing(PathBuf),
}

/// 名前付きデバイス（`id:Name` 形式で指定）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDevice {
    pub id: String,
    pub name: String,
}

impl FromStr for NamedDevice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, name) = s.split_once(':').unwrap_or((s, s));
        let id = id.trim();
        let name = name.trim();
        if id.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "device must be given as 'id:Name', got '{}'",
                s
            )));
        }
        Ok(Self {
            id: id.to_string(),
            name: if name.is_empty() { id } else { name }.to_string(),
        })
    }
}

/// Hubitat Maker API の設定
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubitatConfig {
    /// ハブのベース URL（例: `http://192.168.1.10`）
    pub url: Option<String>,
    /// Maker API アプリの ID
    pub app_id: Option<String>,
    pub token: Option<String>,
    pub thermostat_id: Option<String>,
    pub sensors: Vec<NamedDevice>,
    pub weather_id: Option<String>,
    pub lights: Vec<NamedDevice>,
    /// 全デバイスからロックを検出する
    pub discover_locks: bool,
}

impl HubitatConfig {
    /// 接続先（URL、アプリ ID、トークン）。1 つでも欠けていれば `None`
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        match (&self.url, &self.app_id, &self.token) {
            (Some(url), Some(app_id), Some(token)) => {
                Some((url.as_str(), app_id.as_str(), token.as_str()))
            }
            _ => None,
        }
    }
}

/// サーバー設定
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_connections: usize,
    /// 緊急スイープを行う接続数の割合（0 < ratio <= 1）
    pub emergency_ratio: f64,
    pub heartbeat_interval: Duration,
    pub sweep_interval: Duration,
    pub heartbeat_grace: Duration,
    pub connection_timeout: Duration,
    pub data_grace: Duration,
    /// 上限到達時にクライアントへ伝える再試行までの時間
    pub retry_after: Duration,
    /// 接続ごとの送信バッファ（フレーム数）
    pub send_buffer: usize,
    pub poll_interval: Duration,
    /// 新規接続時にキャッシュを再利用できる最大経過時間
    pub snapshot_max_age: Duration,
    pub device_timeout: Duration,
    pub hubitat: HubitatConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8083,
            static_dir: PathBuf::from("static"),
            max_connections: 50,
            emergency_ratio: 0.8,
            heartbeat_interval: Duration::from_secs(120),
            sweep_interval: Duration::from_secs(120),
            heartbeat_grace: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(180),
            data_grace: Duration::from_secs(30),
            retry_after: Duration::from_secs(5),
            send_buffer: 32,
            poll_interval: Duration::from_secs(30),
            snapshot_max_age: Duration::from_secs(30),
            device_timeout: Duration::from_secs(10),
            hubitat: HubitatConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 値の妥当性を検証する
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        if !(self.emergency_ratio > 0.0 && self.emergency_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "emergency_ratio must be in (0, 1], got {}",
                self.emergency_ratio
            )));
        }
        if self.send_buffer == 0 {
            return Err(ConfigError::Invalid(
                "send_buffer must be greater than 0".to_string(),
            ));
        }

        let intervals = [
            ("heartbeat_interval", self.heartbeat_interval),
            ("sweep_interval", self.sweep_interval),
            ("poll_interval", self.poll_interval),
            ("device_timeout", self.device_timeout),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
        }
        Ok(())
    }

    /// 静的ファイルのディレクトリに index.html があるか確認する
    pub fn check_static_assets(&self) -> Result<(), ConfigError> {
        let index = self.static_dir.join("index.html");
        if index.is_file() {
            Ok(())
        } else {
            Err(ConfigError::StaticAssetsMissing(index))
        }
    }

    /// 緊急スイープを行う接続数（ceil(max × ratio)）
    pub fn emergency_threshold(&self) -> usize {
        let threshold = (self.max_connections as f64 * self.emergency_ratio).ceil() as usize;
        threshold.clamp(1, self.max_connections.max(1))
    }

    /// 死活監視のポリシー
    pub fn liveness_policy(&self) -> LivenessPolicy {
        LivenessPolicy {
            heartbeat_interval: self.heartbeat_interval,
            sweep_interval: self.sweep_interval,
            heartbeat_grace: self.heartbeat_grace,
            connection_timeout: self.connection_timeout,
            data_grace: self.data_grace,
            emergency_threshold: self.emergency_threshold(),
        }
    }

    /// バインドするアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
