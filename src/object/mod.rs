use crate::core::error::{BarcodeError, BarcodeResult};
use crate::core::options::{coerce_bool, coerce_f64, coerce_i64, coerce_string, Options};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

pub mod code25;
pub mod code39;
pub mod error;

/// キャプション描画に使うフォント
#[derive(Debug, Clone, PartialEq)]
pub enum FontSource {
    /// 組み込みピクセルフォント（1〜5）
    Builtin(u8),
    /// TrueTypeフォントファイル
    File(PathBuf),
}

impl FontSource {
    /// 文字列から解釈（空文字列はフォント未指定）
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.parse::<u8>() {
            Ok(n @ 1..=5) => Some(Self::Builtin(n)),
            _ => Some(Self::File(PathBuf::from(value))),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

/// オブジェクト生成時に適用される既定値
///
/// プロセス全体の既定フォントを隠れたグローバルではなく明示的に受け渡す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectDefaults {
    pub font: Option<FontSource>,
}

/// 全シンボル共通のパラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectParams {
    pub bar_height: u32,
    pub bar_thin_width: u32,
    pub bar_thick_width: u32,
    pub factor: f64,
    pub fore_color: u32,
    pub background_color: u32,
    pub orientation: f64,
    pub font: Option<FontSource>,
    pub font_size: f64,
    pub text: Option<String>,
    pub draw_text: bool,
    pub stretch_text: bool,
    pub with_border: bool,
    pub with_quiet_zones: bool,
    pub with_checksum: bool,
    pub with_checksum_in_text: bool,
}

impl Default for ObjectParams {
    fn default() -> Self {
        Self {
            bar_height: 50,
            bar_thin_width: 1,
            bar_thick_width: 3,
            factor: 1.0,
            fore_color: 0x000000,
            background_color: 0xFFFFFF,
            orientation: 0.0,
            font: None,
            font_size: 10.0,
            text: None,
            draw_text: true,
            stretch_text: false,
            with_border: false,
            with_quiet_zones: true,
            with_checksum: false,
            with_checksum_in_text: false,
        }
    }
}

impl ObjectParams {
    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        Self {
            font: defaults.font.clone(),
            ..Self::default()
        }
    }

    /// 共通オプションを1つ適用
    ///
    /// キーは大文字小文字を区別しない。未知のキーは `Ok(false)` を返す。
    pub fn apply(&mut self, key: &str, value: &Value) -> BarcodeResult<bool> {
        match key.to_ascii_lowercase().as_str() {
            "barheight" => {
                self.bar_height = positive_u32(key, value, "Bar height must be greater than 0")?
            }
            "barthinwidth" => {
                self.bar_thin_width =
                    positive_u32(key, value, "Bar width must be greater than 0")?
            }
            "barthickwidth" => {
                self.bar_thick_width =
                    positive_u32(key, value, "Bar width must be greater than 0")?
            }
            "factor" => {
                let factor = coerce_f64(value)
                    .filter(|f| *f > 0.0)
                    .ok_or_else(|| BarcodeError::object_option(key, "Factor must be greater than 0"))?;
                self.factor = factor;
            }
            "forecolor" => self.fore_color = parse_color(key, value)?,
            "backgroundcolor" => self.background_color = parse_color(key, value)?,
            "orientation" => {
                let degrees = coerce_f64(value).ok_or_else(|| {
                    BarcodeError::object_option(key, "Orientation must be numeric")
                })?;
                self.orientation = degrees.rem_euclid(360.0);
            }
            "font" => self.set_font(key, value)?,
            "fontsize" => {
                if self.font.as_ref().is_some_and(FontSource::is_builtin) {
                    return Err(BarcodeError::object_option(
                        key,
                        "Can't use font size with a pixel font",
                    ));
                }
                self.font_size = coerce_f64(value).ok_or_else(|| {
                    BarcodeError::object_option(key, "Font size must be a numeric value")
                })?;
            }
            "text" => self.text = coerce_string(value),
            "drawtext" => self.draw_text = flag(key, value)?,
            "stretchtext" => self.stretch_text = flag(key, value)?,
            "withborder" => self.with_border = flag(key, value)?,
            "withquietzones" => self.with_quiet_zones = flag(key, value)?,
            "withchecksum" => self.with_checksum = flag(key, value)?,
            "withchecksumintext" => self.with_checksum_in_text = flag(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn set_font(&mut self, key: &str, value: &Value) -> BarcodeResult<()> {
        self.font = match value {
            Value::Null => None,
            Value::Number(_) => {
                let n = coerce_i64(value).unwrap_or_default();
                if !(1..=5).contains(&n) {
                    return Err(BarcodeError::object_option(
                        key,
                        format!("Invalid font \"{n}\"; only pixel fonts 1 to 5 are available"),
                    ));
                }
                Some(FontSource::Builtin(n as u8))
            }
            Value::String(s) => FontSource::parse(s),
            _ => {
                return Err(BarcodeError::object_option(
                    key,
                    "Font must be a file path or a pixel font number",
                ))
            }
        };
        Ok(())
    }

    /// キャプションの高さ（ピクセル、倍率適用前）
    pub fn text_height(&self) -> u32 {
        if !self.draw_text {
            return 0;
        }
        match self.font {
            Some(FontSource::Builtin(n)) => 8 + 2 * u32::from(n),
            _ => (self.font_size.ceil().max(0.0) as u32).saturating_add(2),
        }
    }

    /// 左右のクワイエットゾーン幅
    pub fn quiet_zone(&self) -> u32 {
        if self.with_quiet_zones {
            self.bar_thin_width.saturating_mul(10)
        } else {
            0
        }
    }
}

/// 共通オプションを適用し、未知のキーはログに残す
pub(crate) fn apply_common(
    kind: &'static str,
    params: &mut ObjectParams,
    key: &str,
    value: &Value,
) -> BarcodeResult<()> {
    if !params.apply(key, value)? {
        debug!(kind, option = key, "ignoring unknown barcode option");
    }
    Ok(())
}

fn dimension_overflow() -> BarcodeError {
    BarcodeError::render("Barcode dimensions exceed the supported range")
}

/// ピクセル数の加算（オーバーフローは描画エラー）
pub(crate) fn add_px(a: u32, b: u32) -> BarcodeResult<u32> {
    a.checked_add(b).ok_or_else(dimension_overflow)
}

/// ピクセル数の乗算（オーバーフローは描画エラー）
pub(crate) fn mul_px(a: u32, b: u32) -> BarcodeResult<u32> {
    a.checked_mul(b).ok_or_else(dimension_overflow)
}

/// 倍率を適用（`u32` に収まらない場合は描画エラー）
pub(crate) fn scale_px(value: u32, factor: f64) -> BarcodeResult<u32> {
    let scaled = (f64::from(value) * factor).round();
    if scaled.is_finite() && scaled <= f64::from(u32::MAX) {
        Ok(scaled as u32)
    } else {
        Err(dimension_overflow())
    }
}

fn positive_u32(key: &str, value: &Value, reason: &str) -> BarcodeResult<u32> {
    match coerce_i64(value) {
        Some(n) if n > 0 => u32::try_from(n).map_err(|_| BarcodeError::object_option(key, reason)),
        _ => Err(BarcodeError::object_option(key, reason)),
    }
}

fn flag(key: &str, value: &Value) -> BarcodeResult<bool> {
    coerce_bool(value).ok_or_else(|| BarcodeError::object_option(key, "Expected a boolean value"))
}

/// `#RRGGBB` 形式または 0〜0xFFFFFF の整数を色として解釈
pub fn parse_color(key: &str, value: &Value) -> BarcodeResult<u32> {
    let invalid = || BarcodeError::object_option(key, "Color must be set as #[0-9A-F]{6}");

    match value {
        Value::String(s) if s.starts_with('#') => {
            let hex = &s[1..];
            // from_str_radix は先頭の '+' も受け付けてしまう
            if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u32::from_str_radix(hex, 16).map_err(|_| invalid())
        }
        other => match coerce_i64(other) {
            Some(n) if (0..=0xFFFFFF).contains(&n) => Ok(n as u32),
            _ => Err(invalid()),
        },
    }
}

/// コンテンツオブジェクトの基底ケイパビリティ
pub trait BarcodeObject: Send + Sync + fmt::Debug {
    /// 組み込み識別子（"code39" など）
    fn kind(&self) -> &'static str;

    fn params(&self) -> &ObjectParams;

    fn params_mut(&mut self) -> &mut ObjectParams;

    /// オプションを1つ適用
    fn set_option(&mut self, key: &str, value: &Value) -> BarcodeResult<()> {
        let kind = self.kind();
        apply_common(kind, self.params_mut(), key, value)
    }

    /// オプションマップを順に適用
    fn set_options(&mut self, options: &Options) -> BarcodeResult<()> {
        for (key, value) in options {
            self.set_option(key, value)?;
        }
        Ok(())
    }

    /// テキストがシンボルの文字集合に収まるか検証
    fn validate_text(&self, text: &str) -> BarcodeResult<()>;

    /// シンボル本体の幅（クワイエットゾーン・倍率を含まない）
    ///
    /// 幅が `u32` に収まらない場合は描画エラー。
    fn symbol_width(&self, text: &str) -> BarcodeResult<u32>;

    /// 描画前のパラメータ検査
    fn check_params(&self) -> BarcodeResult<()> {
        let text = self
            .params()
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BarcodeError::render("A text must be provided to the barcode before drawing"))?;
        self.validate_text(text)
    }

    /// 描画サイズ（倍率適用済み）
    fn dimensions(&self) -> BarcodeResult<(u32, u32)> {
        let params = self.params();
        let text = params.text.as_deref().unwrap_or_default();
        let border = if params.with_border { 2 } else { 0 };
        let width = add_px(
            add_px(self.symbol_width(text)?, mul_px(2, params.quiet_zone())?)?,
            border,
        )?;
        let height = add_px(add_px(params.bar_height, params.text_height())?, border)?;
        Ok((scale_px(width, params.factor)?, scale_px(height, params.factor)?))
    }

    fn bar_height(&self) -> u32 {
        self.params().bar_height
    }

    fn font(&self) -> Option<&FontSource> {
        self.params().font.as_ref()
    }

    fn text(&self) -> Option<&str> {
        self.params().text.as_deref()
    }

    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_defaults_take_font() {
        let defaults = ObjectDefaults {
            font: FontSource::parse("my_font.ttf"),
        };
        let params = ObjectParams::with_defaults(&defaults);
        assert_eq!(params.font, Some(FontSource::File("my_font.ttf".into())));
        assert_eq!(params.bar_height, 50);
    }

    #[test]
    fn test_apply_is_case_insensitive() {
        let mut params = ObjectParams::default();
        assert!(params.apply("barHeight", &json!(123)).unwrap());
        assert_eq!(params.bar_height, 123);
        assert!(params.apply("BARHEIGHT", &json!("7")).unwrap());
        assert_eq!(params.bar_height, 7);
        assert!(!params.apply("unknownOption", &json!(1)).unwrap());
    }

    #[test]
    fn test_negative_bar_height_rejected() {
        let mut params = ObjectParams::default();
        let err = params.apply("barHeight", &json!(-1)).unwrap_err();
        assert!(matches!(err, BarcodeError::ObjectConfiguration { .. }));
        assert!(err.to_string().contains("Bar height must be greater than 0"));
        assert_eq!(params.bar_height, 50);
    }

    #[test]
    fn test_colors() {
        assert_eq!(parse_color("foreColor", &json!("#FF0000")).unwrap(), 0xFF0000);
        assert_eq!(parse_color("foreColor", &json!(255)).unwrap(), 255);
        assert!(parse_color("foreColor", &json!("#FF00")).is_err());
        assert!(parse_color("foreColor", &json!("red")).is_err());
        assert!(parse_color("foreColor", &json!(0x1000000)).is_err());
        assert!(parse_color("foreColor", &json!("#+12345")).is_err());
        assert!(parse_color("foreColor", &json!("#-12345")).is_err());
    }

    #[test]
    fn test_dimensions_overflow_is_render_error() {
        let mut barcode = code25::Code25::new();
        barcode.set_option("text", &json!("0123")).unwrap();

        barcode.set_option("barHeight", &json!(u32::MAX)).unwrap();
        let err = barcode.dimensions().unwrap_err();
        assert!(matches!(err, BarcodeError::Render { .. }));
        assert!(err.is_renderable());

        let mut barcode = code25::Code25::new();
        barcode.set_option("text", &json!("0123")).unwrap();
        barcode.set_option("barThinWidth", &json!(1_000_000_000)).unwrap();
        assert!(matches!(
            barcode.dimensions().unwrap_err(),
            BarcodeError::Render { .. }
        ));
    }

    #[test]
    fn test_factor_overflow_is_render_error() {
        let mut barcode = code39::Code39::new();
        barcode.set_option("text", &json!("A")).unwrap();
        barcode.set_option("factor", &json!(1e12)).unwrap();
        assert!(matches!(
            barcode.dimensions().unwrap_err(),
            BarcodeError::Render { .. }
        ));
    }

    /// ログ出力を取り込むための書き込み先
    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_debug_log(f: impl FnOnce()) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_unknown_option_is_logged_for_every_kind() {
        let mut objects: Vec<Box<dyn BarcodeObject>> = vec![
            Box::new(code25::Code25::new()),
            Box::new(code39::Code39::new()),
            Box::new(error::ErrorObject::new()),
        ];

        for object in objects.iter_mut() {
            let output = captured_debug_log(|| {
                object.set_option("unknownOption", &json!(1)).unwrap();
            });
            assert!(
                output.contains("ignoring unknown barcode option"),
                "{}: {output}",
                object.kind()
            );
            assert!(output.contains("unknownOption"));
        }
    }

    #[test]
    fn test_fonts() {
        let mut params = ObjectParams::default();
        params.apply("font", &json!(3)).unwrap();
        assert_eq!(params.font, Some(FontSource::Builtin(3)));
        assert!(params.apply("fontSize", &json!(12)).is_err());

        assert!(params.apply("font", &json!(9)).is_err());

        params.apply("font", &json!("/fonts/Vera.ttf")).unwrap();
        assert_eq!(params.font, Some(FontSource::File("/fonts/Vera.ttf".into())));
        params.apply("fontSize", &json!(12)).unwrap();
        assert_eq!(params.font_size, 12.0);

        params.apply("font", &json!("")).unwrap();
        assert_eq!(params.font, None);
    }

    #[test]
    fn test_font_source_parse() {
        assert_eq!(FontSource::parse(""), None);
        assert_eq!(FontSource::parse("2"), Some(FontSource::Builtin(2)));
        assert_eq!(FontSource::parse("9"), Some(FontSource::File("9".into())));
    }
}
