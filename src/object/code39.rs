// Code 39

use super::{add_px, apply_common, mul_px, BarcodeObject, ObjectDefaults, ObjectParams};
use crate::core::error::{BarcodeError, BarcodeResult};
use serde_json::Value;
use std::any::Any;

const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

#[derive(Debug, Clone)]
pub struct Code39 {
    params: ObjectParams,
}

impl Code39 {
    pub const NAME: &'static str = "code39";
    pub const DESCRIPTION: &'static str = "Code 39 (uppercase alphanumerics and - . space $ / + %)";

    pub fn new() -> Self {
        Self::with_defaults(&ObjectDefaults::default())
    }

    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        Self {
            params: ObjectParams::with_defaults(defaults),
        }
    }
}

impl Default for Code39 {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeObject for Code39 {
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
        // Code 39 は大文字のみ
        if key.eq_ignore_ascii_case("text") {
            if let Value::String(text) = value {
                self.params.text = Some(text.to_ascii_uppercase());
                return Ok(());
            }
        }
        apply_common(Self::NAME, &mut self.params, key, value)
    }

    fn validate_text(&self, text: &str) -> BarcodeResult<()> {
        match text.chars().find(|c| !CHARSET.contains(*c)) {
            Some(c) => Err(BarcodeError::render(format!(
                "Invalid character '{c}' in code39 text"
            ))),
            None => Ok(()),
        }
    }

    fn symbol_width(&self, text: &str) -> BarcodeResult<u32> {
        let thin = self.params.bar_thin_width;
        let thick = self.params.bar_thick_width;
        // 開始・終了文字 '*' を含め、文字間は細スペース1つ
        let chars = u32::try_from(text.chars().count())
            .ok()
            .and_then(|n| n.checked_add(2 + u32::from(self.params.with_checksum)))
            .ok_or_else(|| BarcodeError::render("Barcode text is too long"))?;
        let per_char = add_px(mul_px(6, thin)?, mul_px(3, thick)?)?;
        add_px(mul_px(chars, per_char)?, mul_px(chars - 1, thin)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
