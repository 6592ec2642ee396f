//! Value Object 定義

use std::fmt;

use serde::Serialize;

/// 接続 ID
///
/// レジストリが登録順に払い出す単調増加の整数。同じレジストリ内では再利用されない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// 新しい ConnectionId を作成
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 接続元のラベル（診断用）
///
/// `X-Forwarded-For` の先頭、またはピアアドレス。取得できない場合は `"unknown"`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RemoteLabel(String);

impl RemoteLabel {
    /// 新しい RemoteLabel を作成（空文字列は `"unknown"` 扱い）
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Self::unknown()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// 接続元が分からない場合のラベル
    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    /// `X-Forwarded-For` ヘッダとピアアドレスからラベルを決定
    ///
    /// ヘッダがあればその先頭のホップを優先する。
    pub fn from_forwarded(forwarded_for: Option<&str>, peer: Option<&str>) -> Self {
        let first_hop = forwarded_for
            .and_then(|header| header.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());

        match (first_hop, peer) {
            (Some(hop), _) => Self::new(hop),
            (None, Some(peer)) => Self::new(peer),
            (None, None) => Self::unknown(),
        }
    }

    /// 文字列として取得
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
