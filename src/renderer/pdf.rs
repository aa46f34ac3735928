// PDFドキュメントレンダラー

use super::{BarcodeRenderer, RenderOutput, RendererBase};
use crate::core::error::{BarcodeError, BarcodeResult};
use crate::object::{scale_px, BarcodeObject, FontSource};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::any::Any;

/// A4 縦（ポイント）
pub const A4_PORTRAIT: (f64, f64) = (595.0, 842.0);

/// ページ上の描画要素
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PdfElement {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<u32>,
        stroke: Option<u32>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font: Option<String>,
        size: f64,
        color: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<PdfElement>,
}

/// PDFレンダラーの出力ドキュメント
#[derive(Debug, Clone, Serialize)]
pub struct PdfDocument {
    pub created_at: DateTime<Utc>,
    pub pages: Vec<PdfPage>,
}

impl PdfDocument {
    pub fn to_json(&self) -> BarcodeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BarcodeError::render(e.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    base: RendererBase,
}

impl PdfRenderer {
    pub const NAME: &'static str = "pdf";
    pub const DESCRIPTION: &'static str = "PDF document (A4 page)";

    pub fn new() -> Self {
        Self::default()
    }

    fn font_name(object: &dyn BarcodeObject) -> BarcodeResult<Option<String>> {
        match object.font() {
            Some(FontSource::File(path)) if object.params().draw_text => {
                // フォントファイルの存在確認は描画時に行う
                std::fs::metadata(path).map_err(|e| BarcodeError::io(path, e))?;
                Ok(Some(path.display().to_string()))
            }
            Some(FontSource::Builtin(n)) => Ok(Some(format!("builtin-{n}"))),
            _ => Ok(None),
        }
    }
}

impl BarcodeRenderer for PdfRenderer {
    fn renderer_type(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &RendererBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    fn render_object(&self, object: &dyn BarcodeObject) -> BarcodeResult<RenderOutput> {
        let params = self.params();
        let object_params = object.params();
        let scale = params.module_size;
        let (width, height) = object.dimensions()?;
        let size = (scale_px(width, scale)?, scale_px(height, scale)?);
        let (page_width, page_height) = A4_PORTRAIT;
        let (x, y) = params.place((page_width as u32, page_height as u32), size);

        let font = Self::font_name(object)?;
        let mut elements = vec![PdfElement::Rect {
            x: x as f64,
            y: y as f64,
            width: size.0 as f64,
            height: size.1 as f64,
            fill: Some(object_params.background_color),
            stroke: object_params.with_border.then_some(object_params.fore_color),
        }];

        if object_params.draw_text {
            if let Some(text) = object.text() {
                let font_size = object_params.font_size * scale;
                elements.push(PdfElement::Text {
                    x: x as f64 + object_params.quiet_zone() as f64 * scale,
                    y: y as f64 + size.1 as f64 - font_size,
                    text: text.to_string(),
                    font,
                    size: font_size,
                    color: object_params.fore_color,
                });
            }
        }

        Ok(RenderOutput::Pdf(PdfDocument {
            created_at: Utc::now(),
            pages: vec![PdfPage {
                width: page_width,
                height: page_height,
                elements,
            }],
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
