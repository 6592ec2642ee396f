//! UseCase: 接続の死活監視
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LivenessMonitor::heartbeat_pass() / sweep_pass() メソッド
//! - 定期実行ループ（spawn）がシャットダウン通知で止まること
//!
//! ### なぜこのテストが必要か
//! - 接続直後のクライアントにハートビートを送るとハンドシェイク中の接続を壊しうる
//! - 古いだけでデータを受信し続けている接続を誤って切断してはならない
//! - 既に閉じたトランスポートは年齢や負荷に関係なく回収しなければリークする
//!
//! ### どのような状況を想定しているか
//! - 正常系：猶予期間を過ぎた接続へのハートビート
//! - エッジケース：猶予期間内の接続、緊急閾値の前後
//! - 異常系：ハートビートの書き込み失敗、閉じたトランスポート

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::domain::{ConnectionId, Frame};

use super::SharedRegistry;

/// 死活監視の閾値と実行間隔
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessPolicy {
    /// ハートビートの実行間隔
    pub heartbeat_interval: Duration,
    /// スイープの実行間隔
    pub sweep_interval: Duration,
    /// この時間より若い接続にはハートビートを送らない
    pub heartbeat_grace: Duration,
    /// 緊急スイープで削除対象になる接続の年齢
    pub connection_timeout: Duration,
    /// 最後の書き込みからこの時間以内の接続は緊急スイープでも削除しない
    pub data_grace: Duration,
    /// 接続数がこの値以上のときだけ古くてアイドルな接続を削除する
    pub emergency_threshold: usize,
}

impl Default for LivenessPolicy {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(120),
            sweep_interval: Duration::from_secs(120),
            heartbeat_grace: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(180),
            data_grace: Duration::from_secs(30),
            emergency_threshold: 40,
        }
    }
}

/// ハートビート 1 回分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeartbeatReport {
    pub sent: Vec<ConnectionId>,
    pub removed: Vec<ConnectionId>,
}

/// スイープ 1 回分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// トランスポートが閉じていた接続
    pub dead: Vec<ConnectionId>,
    /// 緊急閾値超過時に古くてアイドルだったため削除した接続
    pub evicted: Vec<ConnectionId>,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.dead.len() + self.evicted.len()
    }
}

/// 接続の死活監視
pub struct LivenessMonitor {
    registry: SharedRegistry,
    policy: LivenessPolicy,
}

impl LivenessMonitor {
    /// 新しい LivenessMonitor を作成
    pub fn new(registry: SharedRegistry, policy: LivenessPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> &LivenessPolicy {
        &self.policy
    }

    /// ハートビートを 1 回実行する
    ///
    /// 猶予期間を過ぎた接続にだけキープアライブを書き込み、失敗した接続は走査後に削除する。
    pub async fn heartbeat_pass(&self) -> HeartbeatReport {
        let grace = millis(self.policy.heartbeat_grace);
        let mut registry = self.registry.lock().await;
        let now = registry.now();

        let mut report = HeartbeatReport::default();
        registry.for_each(|id, connection| {
            if connection.age(now) <= grace {
                return;
            }
            match connection.send(Frame::heartbeat()) {
                Ok(()) => report.sent.push(id),
                Err(e) => {
                    tracing::warn!("Heartbeat failed for client {}: {}", id, e);
                    report.removed.push(id);
                }
            }
        });

        for id in &report.sent {
            registry.touch(*id);
        }
        for id in &report.removed {
            tracing::info!("Removing unresponsive client: {}", id);
            registry.remove(*id);
        }

        report
    }

    /// スイープを 1 回実行する
    ///
    /// - トランスポートが閉じている接続は常に削除する
    /// - 接続数が緊急閾値以上のときだけ、タイムアウトを超えていて、かつデータ猶予期間より
    ///   長く書き込みがない接続も削除する
    pub async fn sweep_pass(&self) -> SweepReport {
        let timeout = millis(self.policy.connection_timeout);
        let data_grace = millis(self.policy.data_grace);
        let mut registry = self.registry.lock().await;
        let now = registry.now();
        let under_pressure = registry.size() >= self.policy.emergency_threshold;

        let mut report = SweepReport::default();
        registry.for_each(|id, connection| {
            if connection.is_closed() {
                report.dead.push(id);
                return;
            }
            if under_pressure
                && connection.age(now) > timeout
                && connection.idle_for(now) > data_grace
            {
                tracing::warn!(
                    "Emergency cleanup client {} ({}, age: {}s)",
                    id,
                    connection.remote_label(),
                    connection.age(now) / 1000
                );
                report.evicted.push(id);
            }
        });

        for id in report.dead.iter().chain(report.evicted.iter()) {
            registry.remove(*id);
        }

        if report.total() > 0 {
            tracing::info!(
                "Sweep removed {} dead, {} emergency. Active: {}/{}",
                report.dead.len(),
                report.evicted.len(),
                registry.size(),
                registry.max_connections()
            );
        } else {
            tracing::debug!(
                "Sweep health: {}/{} active connections",
                registry.size(),
                registry.max_connections()
            );
        }

        report
    }

    /// ハートビートとスイープの定期実行を開始する
    ///
    /// `shutdown` が `true` になる（または送信側が破棄される）と両方のループが終了する。
    pub fn spawn(self: Arc<Self>, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let heartbeat = {
            let monitor = self.clone();
            let period = self.policy.heartbeat_interval;
            run_every(period, false, shutdown.clone(), move || {
                let monitor = monitor.clone();
                async move {
                    monitor.heartbeat_pass().await;
                }
            })
        };
        let sweep = {
            let monitor = self.clone();
            let period = self.policy.sweep_interval;
            run_every(period, false, shutdown, move || {
                let monitor = monitor.clone();
                async move {
                    monitor.sweep_pass().await;
                }
            })
        };
        vec![heartbeat, sweep]
    }
}

/// `period` ごとに `task` を実行するループを spawn する
///
/// `immediate` が `false` の場合、最初の即時 tick は読み飛ばす。
pub(crate) fn run_every<F, Fut>(
    period: Duration,
    immediate: bool,
    mut shutdown: watch::Receiver<bool>,
    mut task: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if !immediate {
            ticker.tick().await;
        }

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => task().await,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ConnectionRegistry, RemoteLabel, transport::testing::RecordingTransport,
    };
    use homedash_shared::time::ManualClock;
    use tokio::sync::Mutex;

    const SECOND: i64 = 1_000;

    fn create_test_monitor(
        max: usize,
        policy: LivenessPolicy,
    ) -> (Arc<LivenessMonitor>, SharedRegistry, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let registry = Arc::new(Mutex::new(ConnectionRegistry::new(max, clock.clone())));
        (
            Arc::new(LivenessMonitor::new(registry.clone(), policy)),
            registry,
            clock,
        )
    }

    async fn register(registry: &SharedRegistry) -> (ConnectionId, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let id = registry
            .lock()
            .await
            .register(transport.clone(), RemoteLabel::unknown())
            .unwrap();
        (id, transport)
    }

    #[tokio::test]
    async fn test_heartbeat_skips_connections_within_grace() {
        // テスト項目: 猶予期間（30 秒）より若い接続にはハートビートを送らない
        // given (前提条件): t=5s で登録し、t=10s でハートビート
        let (monitor, registry, clock) = create_test_monitor(50, LivenessPolicy::default());
        clock.set(5 * SECOND);
        let (_id, transport) = register(&registry).await;
        clock.set(10 * SECOND);

        // when (操作):
        let report = monitor.heartbeat_pass().await;

        // then (期待する結果):
        assert!(report.sent.is_empty());
        assert_eq!(transport.heartbeat_count(), 0);
    }

    #[tokio::test]
    async fn test_heartbeat_sends_to_old_connections_and_touches() {
        // テスト項目: 猶予期間を過ぎた接続にだけハートビートを送り、最終アクティビティを更新する
        // given (前提条件):
        let (monitor, registry, clock) = create_test_monitor(50, LivenessPolicy::default());
        let (old_id, old_transport) = register(&registry).await;
        clock.set(40 * SECOND);
        let (_young_id, young_transport) = register(&registry).await;
        clock.set(45 * SECOND);

        // when (操作):
        let report = monitor.heartbeat_pass().await;

        // then (期待する結果):
        assert_eq!(report.sent, vec![old_id]);
        assert_eq!(old_transport.heartbeat_count(), 1);
        assert_eq!(young_transport.heartbeat_count(), 0);
        let registry = registry.lock().await;
        assert_eq!(registry.get(old_id).unwrap().last_activity_at(), 45 * SECOND);
    }

    #[tokio::test]
    async fn test_heartbeat_removes_failed_connections() {
        // テスト項目: ハートビートの書き込みに失敗した接続は走査後に削除される
        // given (前提条件):
        let (monitor, registry, clock) = create_test_monitor(50, LivenessPolicy::default());
        let (healthy_id, _healthy) = register(&registry).await;
        let (broken_id, broken) = register(&registry).await;
        broken.fail_writes();
        clock.set(60 * SECOND);

        // when (操作):
        let report = monitor.heartbeat_pass().await;

        // then (期待する結果):
        assert_eq!(report.sent, vec![healthy_id]);
        assert_eq!(report.removed, vec![broken_id]);
        assert_eq!(registry.lock().await.ids(), vec![healthy_id]);
    }

    #[tokio::test]
    async fn test_sweep_removes_closed_transport_below_threshold() {
        // テスト項目: 閉じたトランスポートは緊急閾値未満・登録直後でも削除される
        // given (前提条件):
        let (monitor, registry, _clock) = create_test_monitor(50, LivenessPolicy::default());
        let (open_id, _open) = register(&registry).await;
        let (closed_id, closed) = register(&registry).await;
        closed.mark_closed();

        // when (操作):
        let report = monitor.sweep_pass().await;

        // then (期待する結果):
        assert_eq!(report.dead, vec![closed_id]);
        assert!(report.evicted.is_empty());
        assert_eq!(registry.lock().await.ids(), vec![open_id]);
    }

    #[tokio::test]
    async fn test_sweep_keeps_old_idle_connections_below_threshold() {
        // テスト項目: 緊急閾値未満では古くてアイドルな接続も削除しない
        // given (前提条件):
        let policy = LivenessPolicy {
            emergency_threshold: 3,
            ..LivenessPolicy::default()
        };
        let (monitor, registry, clock) = create_test_monitor(4, policy);
        register(&registry).await;
        register(&registry).await;
        clock.set(600 * SECOND);

        // when (操作):
        let report = monitor.sweep_pass().await;

        // then (期待する結果):
        assert_eq!(report.total(), 0);
        assert_eq!(registry.lock().await.size(), 2);
    }

    #[tokio::test]
    async fn test_sweep_under_pressure_evicts_only_old_and_idle() {
        // テスト項目: 緊急閾値以上では「古い かつ アイドル」な接続だけが削除される
        // given (前提条件):
        let policy = LivenessPolicy {
            emergency_threshold: 3,
            ..LivenessPolicy::default()
        };
        let (monitor, registry, clock) = create_test_monitor(4, policy);
        let (idle_id, _idle) = register(&registry).await;
        let (active_id, _active) = register(&registry).await;
        clock.set(100 * SECOND);
        let (young_id, _young) = register(&registry).await;

        // active はタイムアウトを超えているが 10 秒前にデータを受信している
        clock.set(190 * SECOND);
        registry.lock().await.touch(active_id);
        clock.set(200 * SECOND);

        // when (操作):
        let report = monitor.sweep_pass().await;

        // then (期待する結果):
        assert_eq!(report.evicted, vec![idle_id]);
        assert_eq!(registry.lock().await.ids(), vec![active_id, young_id]);
    }

    #[tokio::test]
    async fn test_sweep_never_evicts_within_data_grace() {
        // テスト項目: データ猶予期間内に書き込みがあった接続は、閾値超過かつタイムアウト超過でも削除しない
        // given (前提条件):
        let policy = LivenessPolicy {
            emergency_threshold: 1,
            ..LivenessPolicy::default()
        };
        let (monitor, registry, clock) = create_test_monitor(2, policy);
        let (id, _transport) = register(&registry).await;
        clock.set(1_000 * SECOND);
        registry.lock().await.touch(id);
        clock.set(1_000 * SECOND + 29 * SECOND);

        // when (操作):
        let report = monitor.sweep_pass().await;

        // then (期待する結果):
        assert_eq!(report.total(), 0);
        assert_eq!(registry.lock().await.ids(), vec![id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loops_run_heartbeat_and_stop_on_shutdown() {
        // テスト項目: 定期実行ループがハートビートを送り、シャットダウン通知で終了する
        // given (前提条件):
        let policy = LivenessPolicy {
            heartbeat_interval: Duration::from_secs(10),
            sweep_interval: Duration::from_secs(10),
            ..LivenessPolicy::default()
        };
        let (monitor, registry, clock) = create_test_monitor(50, policy);
        let (_id, transport) = register(&registry).await;
        clock.set(60 * SECOND);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // when (操作):
        let handles = monitor.spawn(shutdown_rx);
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        tokio::task::yield_now().await;
        shutdown_tx.send(true).unwrap();
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(transport.heartbeat_count(), 1);
    }
}
