use crate::core::error::{BarcodeError, BarcodeResult};
use crate::core::options::{coerce_bool, coerce_f64, coerce_i64, Options};
use crate::object::error::ErrorObject;
use crate::object::{BarcodeObject, ObjectDefaults};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod image;
pub mod pdf;

pub use self::image::{ImageOutput, ImageRenderer, ImageType};
pub use self::pdf::{PdfDocument, PdfElement, PdfPage, PdfRenderer};

/// 画像サイズ・オフセットの上限（ピクセル）
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// 水平方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalPosition {
    #[default]
    Left,
    Center,
    Right,
}

/// 垂直方向の配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPosition {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// 全レンダラー共通のパラメータ
#[derive(Debug, Clone, PartialEq)]
pub struct RendererParams {
    pub top_offset: u32,
    pub left_offset: u32,
    pub horizontal_position: HorizontalPosition,
    pub vertical_position: VerticalPosition,
    pub module_size: f64,
    pub automatic_render_error: bool,
}

impl Default for RendererParams {
    fn default() -> Self {
        Self {
            top_offset: 0,
            left_offset: 0,
            horizontal_position: HorizontalPosition::Left,
            vertical_position: VerticalPosition::Top,
            module_size: 1.0,
            automatic_render_error: false,
        }
    }
}

impl RendererParams {
    /// 共通オプションを1つ適用（未知のキーは `Ok(false)`）
    pub fn apply(&mut self, key: &str, value: &Value) -> BarcodeResult<bool> {
        match key.to_ascii_lowercase().as_str() {
            "topoffset" => {
                self.top_offset =
                    non_negative(key, value, "Vertical position must be greater than or equal to 0")?
            }
            "leftoffset" => {
                self.left_offset = non_negative(
                    key,
                    value,
                    "Horizontal position must be greater than or equal to 0",
                )?
            }
            "horizontalposition" => {
                self.horizontal_position = match lowercase_str(value).as_deref() {
                    Some("left") => HorizontalPosition::Left,
                    Some("center") => HorizontalPosition::Center,
                    Some("right") => HorizontalPosition::Right,
                    _ => {
                        return Err(BarcodeError::renderer_option(
                            key,
                            "Invalid barcode position provided, must be 'left', 'center' or 'right'",
                        ))
                    }
                }
            }
            "verticalposition" => {
                self.vertical_position = match lowercase_str(value).as_deref() {
                    Some("top") => VerticalPosition::Top,
                    Some("middle") => VerticalPosition::Middle,
                    Some("bottom") => VerticalPosition::Bottom,
                    _ => {
                        return Err(BarcodeError::renderer_option(
                            key,
                            "Invalid barcode position provided, must be 'top', 'middle' or 'bottom'",
                        ))
                    }
                }
            }
            "modulesize" => {
                self.module_size = coerce_f64(value).filter(|f| *f > 0.0).ok_or_else(|| {
                    BarcodeError::renderer_option(key, "Module size must be greater than 0")
                })?
            }
            "automaticrendererror" => {
                self.automatic_render_error = coerce_bool(value).ok_or_else(|| {
                    BarcodeError::renderer_option(key, "Expected a boolean value")
                })?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// キャンバス内でのバーコード左上位置を計算
    pub fn place(&self, canvas: (u32, u32), barcode: (u32, u32)) -> (u32, u32) {
        let free_x = canvas.0.saturating_sub(barcode.0.saturating_add(self.left_offset));
        let free_y = canvas.1.saturating_sub(barcode.1.saturating_add(self.top_offset));
        let x = match self.horizontal_position {
            HorizontalPosition::Left => 0,
            HorizontalPosition::Center => free_x / 2,
            HorizontalPosition::Right => free_x,
        };
        let y = match self.vertical_position {
            VerticalPosition::Top => 0,
            VerticalPosition::Middle => free_y / 2,
            VerticalPosition::Bottom => free_y,
        };
        (
            self.left_offset.saturating_add(x),
            self.top_offset.saturating_add(y),
        )
    }
}

/// 0 以上 `MAX_IMAGE_DIMENSION` 以下の整数オプションを読む
pub(crate) fn non_negative(key: &str, value: &Value, reason: &str) -> BarcodeResult<u32> {
    match coerce_i64(value) {
        Some(n) if n > i64::from(MAX_IMAGE_DIMENSION) => Err(BarcodeError::renderer_option(
            key,
            format!("Value must not exceed {MAX_IMAGE_DIMENSION}"),
        )),
        Some(n) if n >= 0 => {
            u32::try_from(n).map_err(|_| BarcodeError::renderer_option(key, reason))
        }
        _ => Err(BarcodeError::renderer_option(key, reason)),
    }
}

fn lowercase_str(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_ascii_lowercase())
}

/// レンダラー共通の状態（パラメータと関連付けられたバーコード）
#[derive(Debug, Clone, Default)]
pub struct RendererBase {
    pub params: RendererParams,
    pub barcode: Option<Arc<dyn BarcodeObject>>,
}

/// 描画結果
#[derive(Debug, Clone)]
pub enum RenderOutput {
    Image(ImageOutput),
    Pdf(PdfDocument),
}

impl RenderOutput {
    pub fn as_image(&self) -> Option<&ImageOutput> {
        match self {
            Self::Image(image) => Some(image),
            Self::Pdf(_) => None,
        }
    }

    pub fn as_pdf(&self) -> Option<&PdfDocument> {
        match self {
            Self::Pdf(document) => Some(document),
            Self::Image(_) => None,
        }
    }
}

/// レンダラーの基底ケイパビリティ
pub trait BarcodeRenderer: Send + Sync + fmt::Debug {
    /// 組み込み識別子（"image" など）
    fn renderer_type(&self) -> &'static str;

    fn base(&self) -> &RendererBase;

    fn base_mut(&mut self) -> &mut RendererBase;

    fn params(&self) -> &RendererParams {
        &self.base().params
    }

    fn params_mut(&mut self) -> &mut RendererParams {
        &mut self.base_mut().params
    }

    /// オプションを1つ適用
    fn set_option(&mut self, key: &str, value: &Value) -> BarcodeResult<()> {
        if !self.params_mut().apply(key, value)? {
            debug!(
                renderer = self.renderer_type(),
                option = key,
                "ignoring unknown renderer option"
            );
        }
        Ok(())
    }

    fn set_options(&mut self, options: &Options) -> BarcodeResult<()> {
        for (key, value) in options {
            self.set_option(key, value)?;
        }
        Ok(())
    }

    /// バーコードオブジェクトを関連付ける（共有参照として保持）
    fn set_barcode(&mut self, barcode: Arc<dyn BarcodeObject>) {
        self.base_mut().barcode = Some(barcode);
    }

    fn barcode(&self) -> Option<&Arc<dyn BarcodeObject>> {
        self.base().barcode.as_ref()
    }

    /// 描画前のレンダラー固有の検査
    fn check_params(&self, _object: &dyn BarcodeObject) -> BarcodeResult<()> {
        Ok(())
    }

    /// 指定オブジェクトを描画
    fn render_object(&self, object: &dyn BarcodeObject) -> BarcodeResult<RenderOutput>;

    /// 関連付けられたバーコードを描画
    ///
    /// `automatic_render_error` が有効で失敗が描画可能な場合はエラーオブジェクトを描画する。
    fn render(&self) -> BarcodeResult<RenderOutput> {
        let barcode = self
            .barcode()
            .ok_or_else(|| BarcodeError::render("No barcode object attached to the renderer"))?;

        let result = barcode
            .check_params()
            .and_then(|()| self.check_params(barcode.as_ref()))
            .and_then(|()| self.render_object(barcode.as_ref()));

        match result {
            Err(error) if self.params().automatic_render_error && error.is_renderable() => {
                warn!(
                    renderer = self.renderer_type(),
                    barcode = barcode.kind(),
                    error = %error,
                    "rendering error barcode instead"
                );
                let fallback = ErrorObject::from_error(&error, &ObjectDefaults::default());
                self.render_object(&fallback)
            }
            other => other,
        }
    }

    fn as_any(&self) -> &dyn Any;
}
