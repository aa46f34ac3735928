//! 識別子と設定からバーコードオブジェクト・レンダラーを生成するファクトリー
//!
//! - `object`: 描画対象のシンボル（code25, code39 など）
//! - `renderer`: 出力形式（image, pdf）
//! - `factories`: 識別子 → インスタンスの生成
//! - `proxy`: 生成・結合・エラーフォールバックをまとめたエントリポイント

pub mod cli;
pub mod core;
pub mod factories;
pub mod object;
pub mod proxy;
pub mod renderer;

pub use crate::core::{
    BarcodeError, BarcodeResult, Config, ConfigSource, Options, TypeCatalog, TypeSpace,
};
pub use object::{BarcodeObject, FontSource};
pub use proxy::{Barcode, FactoryRequest};
pub use renderer::{BarcodeRenderer, RenderOutput};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_draw_png_end_to_end() {
        let output = Barcode::new()
            .draw(
                FactoryRequest::new("code39")
                    .with_barcode_config(json!({"text": "HELLO"}))
                    .with_renderer_config(json!({"imageType": "png"})),
            )
            .unwrap();

        let image = output.as_image().unwrap();
        let (width, height) = image.dimensions();
        assert!(width > 0 && height > 0);
        assert!(image.to_data_uri().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_draw_error_barcode_for_invalid_text() {
        let output = Barcode::new()
            .draw(FactoryRequest::new("code25").with_barcode_config(json!({"text": "ABC"})))
            .unwrap();
        assert!(output.as_image().is_some());

        let err = Barcode::new()
            .draw(
                FactoryRequest::new("code25")
                    .with_barcode_config(json!({"text": "ABC"}))
                    .with_automatic_barcode_error(false),
            )
            .unwrap_err();
        assert!(matches!(err, BarcodeError::Render { .. }));
    }
}
