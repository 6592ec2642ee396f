//! デバイス状態取得の実装
//!
//! - `hubitat`: Hubitat Maker API を使った実装

pub mod hubitat;

pub use hubitat::{
    HubitatClient, LightSource, LockSource, SensorSource, ThermostatSource, WeatherSource,
    build_sources,
};
