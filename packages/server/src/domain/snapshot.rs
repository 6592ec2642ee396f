//! Snapshot: 全デバイス状態の集約値
//!
//! 同一性は内容のみで決まる。正規化シリアライズ（オブジェクトのキーを辞書順に並べた
//! コンパクトな JSON）の文字列が等しければ同じスナップショットとみなす。

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// 取得できなかったソース名の一覧を入れるキー
pub const UNAVAILABLE_KEY: &str = "unavailable";

/// デバイス状態のスナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Value);

impl Snapshot {
    /// JSON 値からスナップショットを作成
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// 正規化シリアライズ
    ///
    /// serde_json の `preserve_order` が有効かどうかに依らず、キーは常に辞書順で出力される。
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        write_canonical(&self.0, &mut out);
        out
    }

    /// トップレベルのセクションを取得（`null` のセクションは `None`）
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    /// 取得できなかったソース名
    pub fn unavailable(&self) -> Vec<&str> {
        self.0
            .get(UNAVAILABLE_KEY)
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// 一部のソースが欠けているか
    pub fn is_degraded(&self) -> bool {
        !self.unavailable().is_empty()
    }
}

impl From<Value> for Snapshot {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (index, (key, value)) in entries.into_iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                // Value::String の Display は JSON エスケープ済みの文字列を返す
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// ポーラーが各ソースの結果からスナップショットを組み立てるためのビルダー
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    sections: BTreeMap<String, Value>,
    unavailable: BTreeSet<String>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得に成功したセクションを追加
    pub fn section(&mut self, name: &str, value: Value) -> &mut Self {
        self.unavailable.remove(name);
        self.sections.insert(name.to_string(), value);
        self
    }

    /// 取得に失敗したソースを記録（セクションは `null`）
    pub fn unavailable(&mut self, name: &str) -> &mut Self {
        self.sections.insert(name.to_string(), Value::Null);
        self.unavailable.insert(name.to_string());
        self
    }

    pub fn build(&self) -> Snapshot {
        let mut map = serde_json::Map::new();
        for (name, value) in &self.sections {
            map.insert(name.clone(), value.clone());
        }
        map.insert(
            UNAVAILABLE_KEY.to_string(),
            Value::Array(
                self.unavailable
                    .iter()
                    .map(|name| Value::String(name.clone()))
                    .collect(),
            ),
        );
        Snapshot(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_is_independent_of_key_order() {
        // テスト項目: キーの挿入順が違っても正規化結果は同じ
        // given (前提条件):
        let mut first = serde_json::Map::new();
        first.insert("b".to_string(), json!(2));
        first.insert("a".to_string(), json!({"y": 1, "x": [3, {"d": 4, "c": 5}]}));
        let mut second = serde_json::Map::new();
        second.insert("a".to_string(), json!({"x": [3, {"c": 5, "d": 4}], "y": 1}));
        second.insert("b".to_string(), json!(2));

        // when (操作):
        let first = Snapshot::new(Value::Object(first)).canonical();
        let second = Snapshot::new(Value::Object(second)).canonical();

        // then (期待する結果):
        assert_eq!(first, second);
        assert_eq!(first, r#"{"a":{"x":[3,{"c":5,"d":4}],"y":1},"b":2}"#);
    }

    #[test]
    fn test_canonical_escapes_strings() {
        // テスト項目: 文字列とキーは JSON としてエスケープされる
        // given (前提条件):
        let snapshot = Snapshot::new(json!({"say \"hi\"": "line\nbreak"}));

        // when (操作):
        let canonical = snapshot.canonical();

        // then (期待する結果):
        assert_eq!(canonical, r#"{"say \"hi\"":"line\nbreak"}"#);
        let parsed: Value = serde_json::from_str(&canonical).unwrap();
        assert_eq!(&parsed, snapshot.value());
    }

    #[test]
    fn test_builder_records_unavailable_sources() {
        // テスト項目: 失敗したソースは null になり unavailable に列挙される
        // given (前提条件):
        let mut builder = SnapshotBuilder::new();

        // when (操作):
        builder
            .section("thermostat", json!({"currentTemp": 70.0}))
            .unavailable("weather")
            .unavailable("locks");
        let snapshot = builder.build();

        // then (期待する結果):
        assert_eq!(
            snapshot.value(),
            &json!({
                "thermostat": {"currentTemp": 70.0},
                "weather": null,
                "locks": null,
                "unavailable": ["locks", "weather"]
            })
        );
        assert!(snapshot.is_degraded());
        assert!(snapshot.section("weather").is_none());
        assert_eq!(snapshot.unavailable(), vec!["locks", "weather"]);
    }

    #[test]
    fn test_builder_without_failures_is_not_degraded() {
        // テスト項目: 全ソース成功時は unavailable が空配列
        // when (操作):
        let snapshot = SnapshotBuilder::new()
            .section("thermostat", json!({"currentTemp": 71.5}))
            .build();

        // then (期待する結果):
        assert!(!snapshot.is_degraded());
        assert_eq!(
            snapshot.canonical(),
            r#"{"thermostat":{"currentTemp":71.5},"unavailable":[]}"#
        );
    }
}
