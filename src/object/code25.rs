// Code 2 of 5 系シンボル（Standard / Interleaved）

use super::{add_px, mul_px, BarcodeObject, ObjectDefaults, ObjectParams};
use crate::core::error::{BarcodeError, BarcodeResult};
use std::any::Any;

fn validate_digits(kind: &str, text: &str) -> BarcodeResult<()> {
    match text.chars().find(|c| !c.is_ascii_digit()) {
        Some(c) => Err(BarcodeError::render(format!(
            "Invalid character '{c}' in {kind} text; only digits are allowed"
        ))),
        None => Ok(()),
    }
}

fn encoded_len(params: &ObjectParams, text: &str) -> BarcodeResult<u32> {
    let chars = u32::try_from(text.chars().count())
        .map_err(|_| BarcodeError::render("Barcode text is too long"))?;
    add_px(chars, u32::from(params.with_checksum))
}

/// Standard 2 of 5
#[derive(Debug, Clone)]
pub struct Code25 {
    params: ObjectParams,
}

impl Code25 {
    pub const NAME: &'static str = "code25";
    pub const DESCRIPTION: &'static str = "Code 2 of 5 (standard, digits only)";

    pub fn new() -> Self {
        Self::with_defaults(&ObjectDefaults::default())
    }

    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        Self {
            params: ObjectParams::with_defaults(defaults),
        }
    }
}

impl Default for Code25 {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeObject for Code25 {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> &ObjectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ObjectParams {
        &mut self.params
    }

    fn validate_text(&self, text: &str) -> BarcodeResult<()> {
        validate_digits(Self::NAME, text)
    }

    fn symbol_width(&self, text: &str) -> BarcodeResult<u32> {
        let thin = self.params.bar_thin_width;
        let thick = self.params.bar_thick_width;
        // 1文字 = 5本のバー（うち2本が太）+ 各バー後の細スペース
        let per_char = add_px(mul_px(8, thin)?, mul_px(2, thick)?)?;
        let start = add_px(mul_px(2, thick)?, mul_px(3, thin)?)?;
        let stop = add_px(mul_px(2, thick)?, mul_px(2, thin)?)?;
        let body = mul_px(encoded_len(&self.params, text)?, per_char)?;
        add_px(add_px(start, body)?, stop)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Interleaved 2 of 5
#[derive(Debug, Clone)]
pub struct Code25Interleaved {
    params: ObjectParams,
}

impl Code25Interleaved {
    pub const NAME: &'static str = "code25interleaved";
    pub const DESCRIPTION: &'static str = "Interleaved 2 of 5 (digits, padded to even length)";

    pub fn new() -> Self {
        Self::with_defaults(&ObjectDefaults::default())
    }

    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        Self {
            params: ObjectParams::with_defaults(defaults),
        }
    }
}

impl Default for Code25Interleaved {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeObject for Code25Interleaved {
    fn kind(&self) -> &'static str {
        Self::NAME
    }

    fn params(&self) -> &ObjectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ObjectParams {
        &mut self.params
    }

    fn validate_text(&self, text: &str) -> BarcodeResult<()> {
        validate_digits(Self::NAME, text)
    }

    fn symbol_width(&self, text: &str) -> BarcodeResult<u32> {
        let thin = self.params.bar_thin_width;
        let thick = self.params.bar_thick_width;
        // 奇数桁は先頭0で偶数桁に揃える
        let pairs = encoded_len(&self.params, text)?.div_ceil(2);
        let per_pair = add_px(mul_px(6, thin)?, mul_px(4, thick)?)?;
        let start = mul_px(4, thin)?;
        let stop = add_px(thick, mul_px(2, thin)?)?;
        add_px(add_px(start, mul_px(pairs, per_pair)?)?, stop)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
