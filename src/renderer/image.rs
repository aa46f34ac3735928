// ラスター画像レンダラー

use super::{non_negative, BarcodeRenderer, RenderOutput, RendererBase, MAX_IMAGE_DIMENSION};
use crate::core::error::{BarcodeError, BarcodeResult};
use crate::object::{add_px, BarcodeObject};
use ::image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// 出力画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageType {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl ImageType {
    pub const ALLOWED: [&'static str; 3] = ["png", "jpeg", "gif"];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    pub const fn format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Gif => ImageFormat::Gif,
        }
    }

    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }
}

impl FromStr for ImageType {
    type Err = BarcodeError;

    fn from_str(s: &str) -> BarcodeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            other => Err(BarcodeError::renderer_option(
                "imageType",
                format!(
                    "Invalid type \"{other}\" given; allowed: {}",
                    Self::ALLOWED.join(", ")
                ),
            )),
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画像レンダラーの出力
#[derive(Debug, Clone)]
pub struct ImageOutput {
    pub image: DynamicImage,
    pub image_type: ImageType,
}

impl ImageOutput {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// 指定形式でエンコード
    pub fn encode(&self) -> BarcodeResult<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        // JPEG はアルファを持てない
        let image = match self.image_type {
            ImageType::Jpeg => DynamicImage::ImageRgb8(self.image.to_rgb8()),
            ImageType::Png | ImageType::Gif => DynamicImage::ImageRgba8(self.image.to_rgba8()),
        };
        image.write_to(&mut buffer, self.image_type.format())?;
        Ok(buffer.into_inner())
    }

    /// エンコード結果をBase64文字列として取得
    pub fn to_base64(&self) -> BarcodeResult<String> {
        Ok(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            self.encode()?,
        ))
    }

    /// `data:` URI として取得
    pub fn to_data_uri(&self) -> BarcodeResult<String> {
        Ok(format!(
            "data:{};base64,{}",
            self.image_type.mime_type(),
            self.to_base64()?
        ))
    }
}

fn rgb(color: u32) -> Rgb<u8> {
    Rgb([(color >> 16) as u8, (color >> 8) as u8, color as u8])
}

#[derive(Debug, Clone, Default)]
pub struct ImageRenderer {
    base: RendererBase,
    image_type: ImageType,
    width: u32,
    height: u32,
}

impl ImageRenderer {
    pub const NAME: &'static str = "image";
    pub const DESCRIPTION: &'static str = "Raster image (png, jpeg, gif)";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    pub fn set_image_type(&mut self, image_type: ImageType) {
        self.image_type = image_type;
    }

    /// 画像サイズ（0 はバーコードに合わせる）
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// キャンバスサイズ（上限を超える場合は描画エラー）
    fn canvas_size(&self, barcode: (u32, u32)) -> BarcodeResult<(u32, u32)> {
        let params = self.params();
        let width = if self.width == 0 {
            add_px(barcode.0, params.left_offset)?
        } else {
            self.width
        };
        let height = if self.height == 0 {
            add_px(barcode.1, params.top_offset)?
        } else {
            self.height
        };
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(BarcodeError::render(format!(
                "Image size {width}x{height} exceeds the maximum of {MAX_IMAGE_DIMENSION} pixels per side"
            )));
        }
        Ok((width.max(1), height.max(1)))
    }
}

impl BarcodeRenderer for ImageRenderer {
    fn renderer_type(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &RendererBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    fn set_option(&mut self, key: &str, value: &Value) -> BarcodeResult<()> {
        match key.to_ascii_lowercase().as_str() {
            "imagetype" => {
                let image_type = value.as_str().ok_or_else(|| {
                    BarcodeError::renderer_option(key, "Image type must be a string")
                })?;
                self.image_type = image_type.parse()?;
            }
            "width" => {
                self.width = non_negative(key, value, "Image width must be greater than or equal to 0")?
            }
            "height" => {
                self.height =
                    non_negative(key, value, "Image height must be greater than or equal to 0")?
            }
            _ => {
                self.params_mut().apply(key, value)?;
            }
        }
        Ok(())
    }

    fn check_params(&self, object: &dyn BarcodeObject) -> BarcodeResult<()> {
        let (width, height) = object.dimensions()?;
        let params = self.params();
        if self.width > 0 && width.saturating_add(params.left_offset) > self.width {
            return Err(BarcodeError::render(
                "Barcode is defined outside the image (horizontally)",
            ));
        }
        if self.height > 0 && height.saturating_add(params.top_offset) > self.height {
            return Err(BarcodeError::render(
                "Barcode is defined outside the image (vertically)",
            ));
        }
        self.canvas_size((width, height))?;
        Ok(())
    }

    fn render_object(&self, object: &dyn BarcodeObject) -> BarcodeResult<RenderOutput> {
        let size = object.dimensions()?;
        let (canvas_width, canvas_height) = self.canvas_size(size)?;
        let object_params = object.params();

        let mut canvas =
            RgbImage::from_pixel(canvas_width, canvas_height, rgb(object_params.background_color));

        if object_params.with_border {
            let (x0, y0) = self.params().place((canvas_width, canvas_height), size);
            if x0 < canvas_width && y0 < canvas_height {
                let x1 = x0.saturating_add(size.0).min(canvas_width).saturating_sub(1).max(x0);
                let y1 = y0.saturating_add(size.1).min(canvas_height).saturating_sub(1).max(y0);
                let fore = rgb(object_params.fore_color);
                for x in x0..=x1 {
                    canvas.put_pixel(x, y0, fore);
                    canvas.put_pixel(x, y1, fore);
                }
                for y in y0..=y1 {
                    canvas.put_pixel(x0, y, fore);
                    canvas.put_pixel(x1, y, fore);
                }
            }
        }

        Ok(RenderOutput::Image(ImageOutput {
            image: DynamicImage::ImageRgb8(canvas),
            image_type: self.image_type,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
