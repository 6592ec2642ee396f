//! UseCase: デバイスのポーリングとスナップショットの組み立て
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PollDevicesUseCase::poll_once() / latest_fresh() / refresh_if_stale() メソッド
//!
//! ### なぜこのテストが必要か
//! - 1 つのデバイスの失敗がスナップショット全体を止めてはならない
//! - 新規接続はキャッシュが新しければ再ポーリングせずに初期データを受け取れる
//!
//! ### どのような状況を想定しているか
//! - 正常系：全ソース成功、キャッシュと配信
//! - 異常系：一部／全ソースの失敗（degraded スナップショット）
//! - エッジケース：キャッシュが古い場合の再ポーリング

use std::{sync::Arc, time::Duration};

use futures_util::future::join_all;
use homedash_shared::time::Clock;
use tokio::{
    sync::{Mutex, RwLock, watch},
    task::JoinHandle,
};

use crate::domain::{DeviceSource, Snapshot, SnapshotBuilder};

use super::{PublishOutcome, PublishSnapshotUseCase, liveness::run_every};

/// キャッシュされた最新スナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSnapshot {
    pub snapshot: Snapshot,
    /// 取得時刻（Unix タイムスタンプ、ミリ秒）
    pub captured_at: i64,
}

/// 1 回のポーリング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PublishOutcome,
    /// 取得に失敗したソース名
    pub failed: Vec<&'static str>,
}

/// デバイスのポーリングのユースケース
pub struct PollDevicesUseCase {
    sources: Vec<Arc<dyn DeviceSource>>,
    broadcaster: Arc<PublishSnapshotUseCase>,
    latest: RwLock<Option<CachedSnapshot>>,
    clock: Arc<dyn Clock>,
    /// 同時に走るポーリングを 1 つに制限する
    poll_lock: Mutex<()>,
}

impl PollDevicesUseCase {
    /// 新しい PollDevicesUseCase を作成
    pub fn new(
        sources: Vec<Arc<dyn DeviceSource>>,
        broadcaster: Arc<PublishSnapshotUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            broadcaster,
            latest: RwLock::new(None),
            clock,
            poll_lock: Mutex::new(()),
        }
    }

    /// 全ソースを並行に取得し、キャッシュしてから配信する
    pub async fn poll_once(&self) -> PollReport {
        let _guard = self.poll_lock.lock().await;

        let results = join_all(self.sources.iter().map(|source| async move {
            (source.name(), source.fetch().await)
        }))
        .await;

        let mut builder = SnapshotBuilder::new();
        let mut failed = Vec::new();
        for (name, result) in results {
            match result {
                Ok(value) => {
                    builder.section(name, value);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {} data: {}", name, e);
                    builder.unavailable(name);
                    failed.push(name);
                }
            }
        }
        let snapshot = builder.build();

        *self.latest.write().await = Some(CachedSnapshot {
            snapshot: snapshot.clone(),
            captured_at: self.clock.now_millis(),
        });

        let outcome = self.broadcaster.publish(&snapshot).await;
        PollReport { outcome, failed }
    }

    /// 最新のキャッシュ
    pub async fn latest(&self) -> Option<CachedSnapshot> {
        self.latest.read().await.clone()
    }

    /// `max_age` 以内に取得されたキャッシュのみ返す
    pub async fn latest_fresh(&self, max_age: Duration) -> Option<CachedSnapshot> {
        let now = self.clock.now_millis();
        let max_age = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
        self.latest
            .read()
            .await
            .as_ref()
            .filter(|cached| now.saturating_sub(cached.captured_at) <= max_age)
            .cloned()
    }

    /// キャッシュが古ければ 1 回ポーリングしてから最新のスナップショットを返す
    pub async fn refresh_if_stale(&self, max_age: Duration) -> Option<Snapshot> {
        if let Some(cached) = self.latest_fresh(max_age).await {
            return Some(cached.snapshot);
        }
        tracing::debug!("Cached snapshot missing or stale, polling before subscribe");
        self.poll_once().await;
        self.latest().await.map(|cached| cached.snapshot)
    }

    /// ポーリングの定期実行を開始する（初回は即時）
    pub fn spawn(self: Arc<Self>, period: Duration, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        run_every(period, true, shutdown, move || {
            let poller = self.clone();
            async move {
                let report = poller.poll_once().await;
                if !report.failed.is_empty() {
                    tracing::debug!("Poll completed with unavailable sources: {:?}", report.failed);
                }
            }
        })
    }
}
