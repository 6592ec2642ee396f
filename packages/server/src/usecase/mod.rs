//! UseCase 層
//!
//! 購読・配信・死活監視・ポーリング・シャットダウンの各ユースケースを定義します。
//! いずれも `SharedRegistry` を共有し、ロックは常に短時間だけ保持します。

pub mod error;
pub mod get_connections;
pub mod liveness;
pub mod poll_devices;
pub mod publish_snapshot;
pub mod shutdown;
pub mod subscribe;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::ConnectionRegistry;

pub use error::SubscribeError;
pub use get_connections::{ConnectionsOverview, GetConnectionsUseCase};
pub use liveness::{HeartbeatReport, LivenessMonitor, LivenessPolicy, SweepReport};
pub use poll_devices::{CachedSnapshot, PollDevicesUseCase, PollReport};
pub use publish_snapshot::{PublishOutcome, PublishSnapshotUseCase};
pub use shutdown::ShutdownUseCase;
pub use subscribe::SubscribeUseCase;

/// ユースケース間で共有する接続レジストリ
pub type SharedRegistry = Arc<Mutex<ConnectionRegistry>>;
