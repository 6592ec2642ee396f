//! ドメイン層
//!
//! 接続・フレーム・スナップショットのモデルと、外側の層が実装するインターフェース
//! （`EventTransport`, `DeviceSource`）を定義します。

pub mod connection;
pub mod device;
pub mod error;
pub mod frame;
pub mod registry;
pub mod snapshot;
pub mod transport;
pub mod value_object;

pub use connection::{Connection, ConnectionSummary};
pub use device::DeviceSource;
pub use error::{DeviceError, RegistryError, TransportError};
pub use frame::Frame;
pub use registry::ConnectionRegistry;
pub use snapshot::{Snapshot, SnapshotBuilder};
pub use transport::EventTransport;
pub use value_object::{ConnectionId, RemoteLabel};

#[cfg(test)]
pub use device::MockDeviceSource;
