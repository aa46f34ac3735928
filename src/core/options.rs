// 設定の正規化 - マップ / 階層設定オブジェクト / 生のJSON値をフラットな順序付きマップへ

use super::error::{BarcodeError, BarcodeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// 順序付きのオプションマップ
pub type Options = serde_json::Map<String, Value>;

/// 階層的な設定オブジェクト
///
/// JSONオブジェクトの木構造をそのまま保持し、`to_options` でフラットなマップへ変換する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    root: Options,
}

impl Config {
    pub fn new(root: Options) -> Self {
        Self { root }
    }

    /// JSON値から作成（オブジェクト以外はエラー）
    pub fn from_value(value: Value) -> BarcodeResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(BarcodeError::invalid_argument(format!(
                "Config must be built from an object, got {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(json: &str) -> BarcodeResult<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| BarcodeError::config(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_json_file(path: &Path) -> BarcodeResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| BarcodeError::io(path, e))?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// 文字列値を取得（null や文字列以外は None）
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.root.get(key).and_then(Value::as_str)
    }

    /// キーが存在し、かつ null でないか
    pub fn is_set(&self, key: &str) -> bool {
        self.root.get(key).is_some_and(|v| !v.is_null())
    }

    /// ネストしたセクションを取得
    ///
    /// キーが無い場合は `Ok(None)`、マップ以外の値が入っている場合はエラー。
    pub fn section(&self, key: &str) -> BarcodeResult<Option<Config>> {
        match self.root.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Config::new(map.clone()))),
            Some(other) => Err(BarcodeError::invalid_argument(format!(
                "Section '{key}' must be a map, got {}",
                value_kind(other)
            ))),
        }
    }

    pub fn to_options(&self) -> Options {
        self.root.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

impl TryFrom<Value> for Config {
    type Error = BarcodeError;

    fn try_from(value: Value) -> BarcodeResult<Self> {
        Self::from_value(value)
    }
}

/// ファクトリーに渡される設定の入力形
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// 設定なし（空マップとして扱う）
    #[default]
    Absent,
    /// フラットなマップ
    Options(Options),
    /// 階層設定オブジェクト
    Config(Config),
    /// 任意のJSON値（オブジェクト以外はエラー）
    Value(Value),
}

impl From<Options> for ConfigSource {
    fn from(options: Options) -> Self {
        Self::Options(options)
    }
}

impl From<Config> for ConfigSource {
    fn from(config: Config) -> Self {
        Self::Config(config)
    }
}

impl From<Value> for ConfigSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Option<Options>> for ConfigSource {
    fn from(options: Option<Options>) -> Self {
        options.map_or(Self::Absent, Self::Options)
    }
}

/// 設定入力をフラットな順序付きマップへ正規化
pub fn normalize(source: ConfigSource) -> BarcodeResult<Options> {
    match source {
        ConfigSource::Absent => Ok(Options::new()),
        ConfigSource::Options(options) => Ok(options),
        ConfigSource::Config(config) => Ok(config.to_options()),
        ConfigSource::Value(Value::Object(map)) => Ok(map),
        ConfigSource::Value(other) => Err(BarcodeError::invalid_argument(format!(
            "Configuration must be a map or a Config instance, got {}",
            value_kind(&other)
        ))),
    }
}

/// 名前空間キーを大文字小文字を区別せずに取り出す
pub fn take_namespace(options: &mut Options, key: &str) -> BarcodeResult<Option<String>> {
    let found = options
        .keys()
        .find(|k| k.eq_ignore_ascii_case(key))
        .cloned();

    let Some(found) = found else {
        return Ok(None);
    };

    match options.remove(&found) {
        Some(Value::String(namespace)) if !namespace.trim().is_empty() => {
            Ok(Some(namespace.trim().to_string()))
        }
        Some(Value::Null) | Some(Value::String(_)) | None => Ok(None),
        Some(other) => Err(BarcodeError::invalid_argument(format!(
            "'{key}' must be a string, got {}",
            value_kind(&other)
        ))),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

/// 数値として解釈（数値文字列も許容）
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// 整数として解釈（小数部は切り捨て）
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        other => coerce_f64(other).map(|f| f.trunc() as i64),
    }
}

/// 真偽値として解釈
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "off" | "no" => Some(false),
            "1" | "true" | "on" | "yes" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// 文字列として解釈（数値はそのまま文字列化）
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_shapes() {
        assert!(normalize(ConfigSource::Absent).unwrap().is_empty());

        let options = normalize(json!({"barHeight": 123}).into()).unwrap();
        assert_eq!(options["barHeight"], 123);

        let config = Config::from_value(json!({"imageType": "gif"})).unwrap();
        let options = normalize(config.into()).unwrap();
        assert_eq!(options["imageType"], "gif");
    }

    #[test]
    fn test_normalize_rejects_non_map() {
        let err = normalize(Value::Null.into()).unwrap_err();
        assert!(matches!(err, BarcodeError::InvalidArgument { .. }));
        assert!(err.to_string().contains("null"));

        let err = normalize(json!([1, 2]).into()).unwrap_err();
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_normalize_preserves_order() {
        let options = normalize(json!({"z": 1, "a": 2, "m": 3}).into()).unwrap();
        let keys: Vec<_> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_config_sections() {
        let config = Config::from_json_str(
            r#"{"barcode": "code25", "barcodeParams": {"barHeight": 123}, "renderer": null}"#,
        )
        .unwrap();

        assert_eq!(config.get_str("barcode"), Some("code25"));
        assert!(!config.is_set("renderer"));
        let params = config.section("barcodeParams").unwrap().unwrap();
        assert_eq!(params.get("barHeight"), Some(&json!(123)));
        assert!(config.section("rendererParams").unwrap().is_none());
        assert!(config.section("barcode").is_err());
    }

    #[test]
    fn test_config_from_invalid_json() {
        let err = Config::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, BarcodeError::Config { .. }));

        let err = Config::from_json_str("[1]").unwrap_err();
        assert!(matches!(err, BarcodeError::InvalidArgument { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barcode.json");
        std::fs::write(&path, r#"{"barcode": "code39"}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.get_str("barcode"), Some("code39"));

        let missing = Config::from_json_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(missing, BarcodeError::Io { .. }));
    }

    #[test]
    fn test_take_namespace_is_case_insensitive() {
        let mut options = json!({"BarcodeNamespace": "My_Namespace", "barHeight": 10})
            .as_object()
            .cloned()
            .unwrap();

        let namespace = take_namespace(&mut options, "barcodeNamespace").unwrap();
        assert_eq!(namespace.as_deref(), Some("My_Namespace"));
        assert!(!options.contains_key("BarcodeNamespace"));
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_coercions() {
        assert_eq!(coerce_i64(&json!("42")), Some(42));
        assert_eq!(coerce_i64(&json!(-1)), Some(-1));
        assert_eq!(coerce_i64(&json!(2.9)), Some(2));
        assert_eq!(coerce_f64(&json!("abc")), None);
        assert_eq!(coerce_bool(&json!("false")), Some(false));
        assert_eq!(coerce_bool(&json!(1)), Some(true));
        assert_eq!(coerce_bool(&json!("maybe")), None);
        assert_eq!(coerce_string(&json!(123)), Some("123".to_string()));
        assert_eq!(coerce_string(&json!([1])), None);
    }
}
