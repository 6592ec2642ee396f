//! Infrastructure 層
//!
//! ドメイン層が定義するインターフェースの具体的な実装を提供します。
//!
//! - `transport`: `EventTransport` の SSE 実装
//! - `device`: `DeviceSource` の Hubitat Maker API 実装
//! - `dto`: HTTP API のレスポンス DTO

pub mod device;
pub mod dto;
pub mod transport;
