// エラーフォールバック用オブジェクト

use super::{apply_common, BarcodeObject, ObjectDefaults, ObjectParams};
use crate::core::error::{BarcodeError, BarcodeResult};
use crate::core::options::{coerce_string, Options};
use serde_json::Value;
use std::any::Any;

/// 生成・描画に失敗したときに差し替えられる診断用オブジェクト
#[derive(Debug, Clone)]
pub struct ErrorObject {
    params: ObjectParams,
    exception_class: Option<String>,
}

impl ErrorObject {
    pub const NAME: &'static str = "error";
    pub const DESCRIPTION: &'static str = "Error placeholder that renders a failure message";

    pub const WIDTH: u32 = 400;
    pub const HEIGHT: u32 = 80;

    pub fn new() -> Self {
        Self::with_defaults(&ObjectDefaults::default())
    }

    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        let mut params = ObjectParams::with_defaults(defaults);
        params.with_border = true;
        params.with_quiet_zones = false;
        Self {
            params,
            exception_class: None,
        }
    }

    /// 失敗内容をオプションマップとして表現
    pub fn options_for(error: &BarcodeError) -> Options {
        let mut options = Options::new();
        options.insert("text".into(), Value::String(error.to_string()));
        options.insert(
            "exceptionClass".into(),
            Value::String(error.kind_name().to_string()),
        );
        options
    }

    /// エラーから直接作成
    pub fn from_error(error: &BarcodeError, defaults: &ObjectDefaults) -> Self {
        let mut object = Self::with_defaults(defaults);
        object.params.text = Some(error.to_string());
        object.exception_class = Some(error.kind_name().to_string());
        object
    }

    pub fn message(&self) -> Option<&str> {
        self.params.text.as_deref()
    }

    pub fn exception_class(&self) -> Option<&str> {
        self.exception_class.as_deref()
    }
}

impl Default for ErrorObject {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeObject for ErrorObject {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> &ObjectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ObjectParams {
        &mut self.params
    }

    fn set_option(&mut self, key: &str, value: &Value) -> BarcodeResult<()> {
        if key.eq_ignore_ascii_case("exceptionClass") {
            self.exception_class = coerce_string(value);
            return Ok(());
        }
        apply_common(Self::NAME, &mut self.params, key, value)
    }

    fn validate_text(&self, _text: &str) -> BarcodeResult<()> {
        Ok(())
    }

    fn check_params(&self) -> BarcodeResult<()> {
        Ok(())
    }

    fn symbol_width(&self, _text: &str) -> BarcodeResult<u32> {
        Ok(Self::WIDTH)
    }

    fn dimensions(&self) -> BarcodeResult<(u32, u32)> {
        Ok((Self::WIDTH, Self::HEIGHT))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TypeSpace;

    #[test]
    fn test_options_for_error() {
        let error = BarcodeError::invalid_type(TypeSpace::Object, "My_Namespace_Other_Error");
        let options = ErrorObject::options_for(&error);

        assert_eq!(options["exceptionClass"], "InvalidTypeError");
        assert!(options["text"].as_str().unwrap().contains("My_Namespace_Other_Error"));
    }

    #[test]
    fn test_set_options_carries_failure() {
        let error = BarcodeError::object_option("barHeight", "Bar height must be greater than 0");
        let mut object = ErrorObject::new();
        object.set_options(&ErrorObject::options_for(&error)).unwrap();

        assert_eq!(object.exception_class(), Some("ObjectConfigurationError"));
        assert!(object.message().unwrap().contains("Bar height"));
        assert!(object.check_params().is_ok());
        assert_eq!(object.dimensions().unwrap(), (400, 80));
    }

    #[test]
    fn test_from_error_matches_options_for() {
        let error = BarcodeError::invalid_argument("Barcode name must be specified");
        let object = ErrorObject::from_error(&error, &ObjectDefaults::default());
        assert_eq!(object.exception_class(), Some("InvalidArgumentError"));
        assert_eq!(object.message(), Some("Barcode name must be specified"));
        assert!(object.params().with_border);
    }
}
