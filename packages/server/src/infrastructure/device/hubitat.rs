//! Hubitat Maker API を使った DeviceSource 実装
//!
//! ## 責務
//!
//! - Maker API へのリクエスト（デバイス詳細、全デバイス一覧）
//! - 属性値（数値または数値文字列）の解釈
//! - スナップショットの各セクション（thermostat, sensors, weather, locks, lights）の組み立て
//!
//! 報告されなかった数値属性は `0` ではなく `null` になります。

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::{
    config::{HubitatConfig, NamedDevice},
    domain::{DeviceError, DeviceSource},
};

/// デバイス詳細（`GET {base}/{id}`）
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDetail {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub attributes: Vec<DeviceAttribute>,
}

/// デバイスの属性 1 件
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceAttribute {
    pub name: String,
    #[serde(rename = "currentValue", default)]
    pub current_value: Value,
}

/// 全デバイス一覧（`GET {base}`）の 1 件
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceListing {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<Value>,
    /// 配列（`[{name, currentValue}]`）またはオブジェクト（`{name: value}`）
    #[serde(default)]
    pub attributes: Value,
}

/// 属性名 → 現在値
#[derive(Debug, Clone, Default)]
pub struct Attributes(HashMap<String, Value>);

impl Attributes {
    fn from_list(attributes: &[DeviceAttribute]) -> Self {
        Self(
            attributes
                .iter()
                .map(|attr| (attr.name.clone(), attr.current_value.clone()))
                .collect(),
        )
    }

    /// 数値として解釈できる属性値（数値文字列も受け付ける）
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.0.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// 文字列として解釈できる属性値
    pub fn text(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Maker API クライアント
#[derive(Debug)]
pub struct HubitatClient {
    client: Client,
    /// `{url}/apps/api/{app_id}/devices`
    base_url: String,
    token: String,
}

impl HubitatClient {
    /// 新しいクライアントを作成
    ///
    /// # Arguments
    ///
    /// * `url` - ハブのベース URL
    /// * `app_id` - Maker API アプリの ID
    /// * `token` - アクセストークン
    /// * `timeout` - 1 リクエストあたりのタイムアウト
    pub fn new(url: &str, app_id: &str, token: &str, timeout: Duration) -> Result<Self, DeviceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeviceError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/apps/api/{}/devices", url.trim_end_matches('/'), app_id),
            token: token.to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, DeviceError> {
        let response = self
            .client
            .get(url)
            .query(&[("access_token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| DeviceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| DeviceError::Decode(e.to_string()))
    }

    /// デバイス詳細を取得
    pub async fn device(&self, id: &str) -> Result<DeviceDetail, DeviceError> {
        tracing::debug!("Fetching Hubitat device {}", id);
        self.get(&format!("{}/{}", self.base_url, id)).await
    }

    /// デバイスの属性だけを取得
    pub async fn attributes(&self, id: &str) -> Result<(Option<String>, Attributes), DeviceError> {
        let detail = self.device(id).await?;
        Ok((detail.label, Attributes::from_list(&detail.attributes)))
    }

    /// 全デバイスの一覧を取得
    pub async fn all_devices(&self) -> Result<Vec<DeviceListing>, DeviceError> {
        tracing::debug!("Fetching all Hubitat devices");
        self.get(&self.base_url).await
    }
}

/// サーモスタット
pub struct ThermostatSource {
    client: Arc<HubitatClient>,
    device_id: String,
}

impl ThermostatSource {
    pub fn new(client: Arc<HubitatClient>, device_id: impl Into<String>) -> Self {
        Self {
            client,
            device_id: device_id.into(),
        }
    }
}

#[async_trait]
impl DeviceSource for ThermostatSource {
    fn name(&self) -> &'static str {
        "thermostat"
    }

    async fn fetch(&self) -> Result<Value, DeviceError> {
        let (label, attrs) = self.client.attributes(&self.device_id).await?;
        Ok(json!({
            "name": label,
            "currentTemp": attrs.number("temperature"),
            "heatingSetpoint": attrs.number("heatingSetpoint"),
            "coolingSetpoint": attrs.number("coolingSetpoint"),
            "humidity": attrs.number("humidity"),
            "mode": attrs.text("thermostatMode").unwrap_or_else(|| "auto".to_string()),
            "fanMode": attrs.text("thermostatFanMode").unwrap_or_else(|| "auto".to_string()),
            "operatingState": attrs
                .text("thermostatOperatingState")
                .unwrap_or_else(|| "idle".to_string()),
        }))
    }
}

/// 部屋ごとの温度・人感センサー
///
/// 一部のセンサーが失敗しても、1 つでも取得できれば成功として扱う。
pub struct SensorSource {
    client: Arc<HubitatClient>,
    sensors: Vec<NamedDevice>,
}

impl SensorSource {
    pub fn new(client: Arc<HubitatClient>, sensors: Vec<NamedDevice>) -> Self {
        Self { client, sensors }
    }
}

#[async_trait]
impl DeviceSource for SensorSource {
    fn name(&self) -> &'static str {
        "sensors"
    }

    async fn fetch(&self) -> Result<Value, DeviceError> {
        let results = join_all(self.sensors.iter().map(|sensor| async move {
            (sensor, self.client.attributes(&sensor.id).await)
        }))
        .await;

        let mut sensors = Map::new();
        let mut last_error = DeviceError::NotConfigured;
        for (sensor, result) in results {
            match result {
                Ok((label, attrs)) => {
                    sensors.insert(
                        section_key(&sensor.name),
                        json!({
                            "name": label.unwrap_or_else(|| sensor.name.clone()),
                            "temperature": attrs.number("temperature"),
                            "motion": attrs.text("motion").unwrap_or_else(|| "inactive".to_string()),
                            "status": attrs
                                .text("DeviceWatch-DeviceStatus")
                                .unwrap_or_else(|| "unknown".to_string()),
                        }),
                    );
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {} sensor: {}", sensor.name, e);
                    last_error = e;
                }
            }
        }

        if sensors.is_empty() {
            return Err(last_error);
        }
        Ok(Value::Object(sensors))
    }
}

/// 天気
pub struct WeatherSource {
    client: Arc<HubitatClient>,
    device_id: String,
}

impl WeatherSource {
    pub fn new(client: Arc<HubitatClient>, device_id: impl Into<String>) -> Self {
        Self {
            client,
            device_id: device_id.into(),
        }
    }
}

#[async_trait]
impl DeviceSource for WeatherSource {
    fn name(&self) -> &'static str {
        "weather"
    }

    async fn fetch(&self) -> Result<Value, DeviceError> {
        let (_label, attrs) = self.client.attributes(&self.device_id).await?;
        Ok(json!({
            "temperature": attrs.number("temperature"),
            "humidity": attrs.number("humidity"),
            "pressure": attrs.number("pressure"),
            "windSpeed": attrs.number("windSpeed"),
            "windDirection": attrs.number("windDirection"),
            "condition": attrs.text("weather"),
            "city": attrs.text("city"),
            "country": attrs.text("country"),
            "cloudiness": attrs.text("cloudiness"),
            "weatherIcon": attrs.text("weatherIcons"),
        }))
    }
}

/// 全デバイスから検出したスマートロック
pub struct LockSource {
    client: Arc<HubitatClient>,
}

impl LockSource {
    pub fn new(client: Arc<HubitatClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeviceSource for LockSource {
    fn name(&self) -> &'static str {
        "locks"
    }

    async fn fetch(&self) -> Result<Value, DeviceError> {
        let devices = self.client.all_devices().await?;
        let locks: Vec<Value> = devices
            .iter()
            .filter(|device| is_lock(device))
            .map(|device| {
                json!({
                    "id": id_string(&device.id),
                    "name": device.name,
                    "label": device.label,
                    "state": attribute_value(&device.attributes, "lock"),
                })
            })
            .collect();
        tracing::debug!("Found {} lock devices", locks.len());
        Ok(Value::Array(locks))
    }
}

/// スイッチ・照明
///
/// 個々のデバイスの失敗は `status: "unknown"` として扱い、セクション全体は失敗させない。
pub struct LightSource {
    client: Arc<HubitatClient>,
    lights: Vec<NamedDevice>,
}

impl LightSource {
    pub fn new(client: Arc<HubitatClient>, lights: Vec<NamedDevice>) -> Self {
        Self { client, lights }
    }
}

#[async_trait]
impl DeviceSource for LightSource {
    fn name(&self) -> &'static str {
        "lights"
    }

    async fn fetch(&self) -> Result<Value, DeviceError> {
        let results = join_all(self.lights.iter().map(|light| async move {
            (light, self.client.attributes(&light.id).await)
        }))
        .await;

        let lights = results
            .into_iter()
            .map(|(light, result)| {
                let (status, level) = match result {
                    Ok((_label, attrs)) => (
                        attrs.text("switch").unwrap_or_else(|| "off".to_string()),
                        attrs.number("level"),
                    ),
                    Err(e) => {
                        tracing::warn!("Failed to fetch {} status: {}", light.name, e);
                        ("unknown".to_string(), None)
                    }
                };
                (
                    section_key(&light.name),
                    json!({
                        "id": light.id,
                        "name": light.name,
                        "status": status,
                        "level": level,
                    }),
                )
            })
            .collect::<Map<String, Value>>();

        Ok(Value::Object(lights))
    }
}

/// 設定から有効なソースを組み立てる
///
/// 接続先が未設定の場合は空を返す（スナップショットは空のまま配信される）。
pub fn build_sources(
    config: &HubitatConfig,
    timeout: Duration,
) -> Result<Vec<Arc<dyn DeviceSource>>, DeviceError> {
    let Some((url, app_id, token)) = config.credentials() else {
        tracing::warn!("Hubitat is not configured; no device sources will be polled");
        return Ok(Vec::new());
    };

    let client = Arc::new(HubitatClient::new(url, app_id, token, timeout)?);
    let mut sources: Vec<Arc<dyn DeviceSource>> = Vec::new();

    if let Some(id) = &config.thermostat_id {
        sources.push(Arc::new(ThermostatSource::new(client.clone(), id.clone())));
    }
    if !config.sensors.is_empty() {
        sources.push(Arc::new(SensorSource::new(
            client.clone(),
            config.sensors.clone(),
        )));
    }
    if let Some(id) = &config.weather_id {
        sources.push(Arc::new(WeatherSource::new(client.clone(), id.clone())));
    }
    if config.discover_locks {
        sources.push(Arc::new(LockSource::new(client.clone())));
    }
    if !config.lights.is_empty() {
        sources.push(Arc::new(LightSource::new(client, config.lights.clone())));
    }

    tracing::info!(
        "Polling {} Hubitat sources: {:?}",
        sources.len(),
        sources.iter().map(|s| s.name()).collect::<Vec<_>>()
    );
    Ok(sources)
}

/// ロックらしいデバイスか（オーディオ機器は除外）
fn is_lock(device: &DeviceListing) -> bool {
    let name = device.name.as_deref().unwrap_or_default().to_lowercase();
    let label = device.label.as_deref().unwrap_or_default().to_lowercase();
    let device_type = device.device_type.as_deref().unwrap_or_default().to_lowercase();

    let is_audio = ["buds", "speaker", "echo"]
        .iter()
        .any(|word| name.contains(word) || label.contains(word))
        || device_type.contains("echo speaks");
    if is_audio {
        return false;
    }

    let named_lock = |s: &str| s.contains("lock") && !s.contains("unlock");
    let has_lock_capability = device.capabilities.iter().any(|cap| {
        cap.as_str().is_some_and(|cap| {
            matches!(
                cap.to_lowercase().as_str(),
                "lock" | "lockcodes" | "doorcontrol"
            )
        })
    });
    let has_lock_attribute = attribute_names(&device.attributes)
        .iter()
        .any(|attr| matches!(attr.as_str(), "lock" | "lockCodes" | "codeLength"));

    named_lock(&name)
        || named_lock(&label)
        || device_type.contains("lock")
        || has_lock_capability
        || has_lock_attribute
}

fn attribute_names(attributes: &Value) -> Vec<String> {
    match attributes {
        Value::Array(list) => list
            .iter()
            .filter_map(|attr| attr.get("name")?.as_str().map(str::to_string))
            .collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

fn attribute_value(attributes: &Value, name: &str) -> Value {
    match attributes {
        Value::Array(list) => list
            .iter()
            .find(|attr| attr.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|attr| attr.get("currentValue"))
            .cloned()
            .unwrap_or(Value::Null),
        Value::Object(map) => map.get(name).cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 表示名をセクションのキーにする（"Master Bedroom" → "masterBedroom"）
fn section_key(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(i, word)| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) if i > 0 => {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                }
                _ => word.to_lowercase(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    const TOKEN: &str = "test-token";

    async fn create_test_client() -> (MockServer, Arc<HubitatClient>) {
        let server = MockServer::start().await;
        let client =
            HubitatClient::new(&server.uri(), "19", TOKEN, Duration::from_secs(2)).unwrap();
        (server, Arc::new(client))
    }

    async fn mount_device(server: &MockServer, id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/apps/api/19/devices/{}", id)))
            .and(query_param("access_token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_thermostat_parses_numeric_strings_and_defaults() {
        // テスト項目: 数値文字列は数値に、欠けた属性は null／デフォルト値になる
        // given (前提条件):
        let (server, client) = create_test_client().await;
        mount_device(
            &server,
            "42",
            json!({
                "label": "Hallway Ecobee",
                "attributes": [
                    {"name": "temperature", "currentValue": "70.5"},
                    {"name": "heatingSetpoint", "currentValue": 68},
                    {"name": "thermostatMode", "currentValue": "heat"}
                ]
            }),
        )
        .await;
        let source = ThermostatSource::new(client, "42");

        // when (操作):
        let value = source.fetch().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "name": "Hallway Ecobee",
                "currentTemp": 70.5,
                "heatingSetpoint": 68.0,
                "coolingSetpoint": null,
                "humidity": null,
                "mode": "heat",
                "fanMode": "auto",
                "operatingState": "idle",
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_maps_error_status() {
        // テスト項目: 成功以外のステータスは DeviceError::Status になる
        // given (前提条件):
        let (server, client) = create_test_client().await;
        Mock::given(method("GET"))
            .and(path("/apps/api/19/devices/42"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let source = ThermostatSource::new(client, "42");

        // when (操作):
        let result = source.fetch().await;

        // then (期待する結果):
        assert_eq!(result, Err(DeviceError::Status(401)));
    }

    #[tokio::test]
    async fn test_fetch_maps_invalid_body_to_decode_error() {
        // テスト項目: JSON として解釈できないレスポンスは DeviceError::Decode になる
        // given (前提条件):
        let (server, client) = create_test_client().await;
        Mock::given(method("GET"))
            .and(path("/apps/api/19/devices/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;
        let source = WeatherSource::new(client, "7");

        // when (操作):
        let result = source.fetch().await;

        // then (期待する結果):
        assert!(matches!(result, Err(DeviceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_weather_reads_condition_and_icon_attributes() {
        // テスト項目: condition は weather 属性、weatherIcon は weatherIcons 属性から取られる
        // given (前提条件):
        let (server, client) = create_test_client().await;
        mount_device(
            &server,
            "7",
            json!({
                "label": "OpenWeather",
                "attributes": [
                    {"name": "temperature", "currentValue": 55},
                    {"name": "weather", "currentValue": "light rain"},
                    {"name": "weatherIcons", "currentValue": "10d"},
                    {"name": "city", "currentValue": "Portland"}
                ]
            }),
        )
        .await;
        let source = WeatherSource::new(client, "7");

        // when (操作):
        let value = source.fetch().await.unwrap();

        // then (期待する結果):
        assert_eq!(value["temperature"], json!(55.0));
        assert_eq!(value["condition"], json!("light rain"));
        assert_eq!(value["weatherIcon"], json!("10d"));
        assert_eq!(value["city"], json!("Portland"));
        assert_eq!(value["windSpeed"], Value::Null);
    }

    #[tokio::test]
    async fn test_sensors_keep_partial_results() {
        // テスト項目: 一部のセンサーが失敗しても、成功したセンサーは返される
        // given (前提条件):
        let (server, client) = create_test_client().await;
        mount_device(
            &server,
            "12",
            json!({
                "label": "Master Bedroom",
                "attributes": [
                    {"name": "temperature", "currentValue": "68"},
                    {"name": "motion", "currentValue": "active"}
                ]
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/apps/api/19/devices/13"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let source = SensorSource::new(
            client,
            vec![
                "12:Master Bedroom".parse().unwrap(),
                "13:Game Room".parse().unwrap(),
            ],
        );

        // when (操作):
        let value = source.fetch().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "masterBedroom": {
                    "name": "Master Bedroom",
                    "temperature": 68.0,
                    "motion": "active",
                    "status": "unknown",
                }
            })
        );
    }

    #[tokio::test]
    async fn test_sensors_fail_when_every_sensor_fails() {
        // テスト項目: すべてのセンサーが失敗した場合はソース全体が失敗する
        // given (前提条件):
        let (server, client) = create_test_client().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let source = SensorSource::new(client, vec!["12:Master Bedroom".parse().unwrap()]);

        // when (操作):
        let result = source.fetch().await;

        // then (期待する結果):
        assert_eq!(result, Err(DeviceError::Status(503)));
    }

    #[tokio::test]
    async fn test_locks_are_detected_and_audio_devices_excluded() {
        // テスト項目: ロックの判定ルールと、オーディオ機器の除外
        // given (前提条件):
        let (server, client) = create_test_client().await;
        Mock::given(method("GET"))
            .and(path("/apps/api/19/devices"))
            .and(query_param("access_token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "name": "Front Door Lock", "label": "Front Door", "type": "Z-Wave Lock",
                 "attributes": [{"name": "lock", "currentValue": "locked"}]},
                {"id": "2", "name": "Echo Dot", "label": "Kitchen Echo", "type": "Echo Speaks Device",
                 "capabilities": ["Lock"]},
                {"id": "3", "name": "Auto Unlock Rule", "label": "Auto Unlock Rule", "type": "Virtual Switch"},
                {"id": 4, "name": "Garage", "label": "Garage Door", "type": "Generic",
                 "capabilities": ["DoorControl"]},
                {"id": "5", "name": "Pixel Buds", "label": "Buds", "type": "Lock Helper"},
                {"id": "6", "name": "Keypad", "label": "Side Keypad", "type": "Generic",
                 "attributes": {"codeLength": 4}}
            ])))
            .mount(&server)
            .await;
        let source = LockSource::new(client);

        // when (操作):
        let value = source.fetch().await.unwrap();

        // then (期待する結果):
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|lock| lock["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "4", "6"]);
        assert_eq!(value[0]["state"], json!("locked"));
        assert_eq!(value[1]["state"], Value::Null);
    }

    #[tokio::test]
    async fn test_lights_report_unknown_on_device_error() {
        // テスト項目: 照明の取得失敗は status "unknown" になり、セクションは成功する
        // given (前提条件):
        let (server, client) = create_test_client().await;
        mount_device(
            &server,
            "30",
            json!({
                "label": "Entryway Light",
                "attributes": [
                    {"name": "switch", "currentValue": "on"},
                    {"name": "level", "currentValue": "80"}
                ]
            }),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/apps/api/19/devices/31"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let source = LightSource::new(
            client,
            vec![
                "30:Entryway Light".parse().unwrap(),
                "31:Porch".parse().unwrap(),
            ],
        );

        // when (操作):
        let value = source.fetch().await.unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            json!({
                "entrywayLight": {"id": "30", "name": "Entryway Light", "status": "on", "level": 80.0},
                "porch": {"id": "31", "name": "Porch", "status": "unknown", "level": null},
            })
        );
    }

    #[test]
    fn test_build_sources_respects_configuration() {
        // テスト項目: 接続先が未設定なら空、設定済みなら指定されたソースだけが有効になる
        // given (前提条件):
        let unconfigured = HubitatConfig::default();
        let configured = HubitatConfig {
            url: Some("http://hub.local/".to_string()),
            app_id: Some("19".to_string()),
            token: Some(TOKEN.to_string()),
            thermostat_id: Some("42".to_string()),
            discover_locks: true,
            ..HubitatConfig::default()
        };

        // when (操作):
        let none = build_sources(&unconfigured, Duration::from_secs(1)).unwrap();
        let some = build_sources(&configured, Duration::from_secs(1)).unwrap();

        // then (期待する結果):
        assert!(none.is_empty());
        let names: Vec<_> = some.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["thermostat", "locks"]);
    }

    #[test]
    fn test_section_key_camel_cases_names() {
        assert_eq!(section_key("Master Bedroom"), "masterBedroom");
        assert_eq!(section_key("game-room 2"), "gameRoom2");
        assert_eq!(section_key("PORCH"), "porch");
    }
}
