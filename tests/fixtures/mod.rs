// テストユーティリティ
// 独自名前空間に登録するテスト用の型

#![allow(dead_code)]

use barcode_factory::core::error::BarcodeResult;
use barcode_factory::object::{BarcodeObject, ObjectDefaults, ObjectParams};
use barcode_factory::renderer::{BarcodeRenderer, ImageRenderer, RenderOutput, RendererBase};
use barcode_factory::{Barcode, TypeCatalog};
use std::any::Any;

pub const MY_NAMESPACE: &str = "My_Namespace";
pub const MY_OTHER_NAMESPACE: &str = "My_Namespace_Other";

/// `My_Namespace_Error` - 任意テキストを受け付けるオブジェクト
#[derive(Debug)]
pub struct MyNamespaceError {
    params: ObjectParams,
}

impl MyNamespaceError {
    pub fn with_defaults(defaults: &ObjectDefaults) -> Self {
        Self {
            params: ObjectParams::with_defaults(defaults),
        }
    }
}

impl BarcodeObject for MyNamespaceError {
    fn kind(&self) -> &'static str {
        "my_namespace_error"
    }

    fn params(&self) -> &ObjectParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut ObjectParams {
        &mut self.params
    }

    fn validate_text(&self, _text: &str) -> BarcodeResult<()> {
        Ok(())
    }

    fn symbol_width(&self, text: &str) -> BarcodeResult<u32> {
        Ok(text.len() as u32 * 10)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// `My_Namespace_Image` - 組み込み画像レンダラーに描画を委譲
#[derive(Debug, Default)]
pub struct MyNamespaceImage {
    base: RendererBase,
}

impl BarcodeRenderer for MyNamespaceImage {
    fn renderer_type(&self) -> &'static str {
        "my_namespace_image"
    }

    fn base(&self) -> &RendererBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    fn render_object(&self, object: &dyn BarcodeObject) -> BarcodeResult<RenderOutput> {
        ImageRenderer::new().render_object(object)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 組み込み型に加えて独自名前空間の型を登録したカタログ
pub fn namespaced_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::with_builtins();
    catalog.register_object(MY_NAMESPACE, "error", |d| {
        Box::new(MyNamespaceError::with_defaults(d))
    });
    catalog.register_renderer(MY_NAMESPACE, "image", || Box::new(MyNamespaceImage::default()));
    // 基底トレイトを実装しない型
    catalog.register_opaque(MY_OTHER_NAMESPACE, "error");
    catalog.register_opaque(MY_OTHER_NAMESPACE, "image");
    catalog
}

pub fn namespaced_barcode() -> Barcode {
    Barcode::with_catalog(namespaced_catalog())
}
