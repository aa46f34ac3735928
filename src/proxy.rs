//! バーコード生成のエントリポイント
//!
//! オブジェクト生成・レンダラー生成・エラーフォールバックをまとめる。

use crate::core::catalog::TypeCatalog;
use crate::core::error::{BarcodeError, BarcodeResult, TypeSpace};
use crate::core::options::{Config, ConfigSource, Options};
use crate::factories::{
    split_dispatch, BarcodeSelector, ObjectFactory, RendererFactory, RendererSelector,
};
use crate::object::error::ErrorObject;
use crate::object::{BarcodeObject, FontSource, ObjectDefaults};
use crate::renderer::{BarcodeRenderer, RenderOutput};
use std::sync::Arc;
use tracing::warn;

/// `Barcode::factory` への入力
#[derive(Debug)]
pub struct FactoryRequest {
    barcode: BarcodeSelector,
    renderer: RendererSelector,
    barcode_config: ConfigSource,
    renderer_config: ConfigSource,
    automatic_barcode_error: bool,
    automatic_renderer_error: bool,
}

impl FactoryRequest {
    /// バーコード識別子（またはインスタンス / ディスパッチ設定）から作成
    pub fn new(barcode: impl Into<BarcodeSelector>) -> Self {
        Self {
            barcode: barcode.into(),
            renderer: RendererSelector::default(),
            barcode_config: ConfigSource::Absent,
            renderer_config: ConfigSource::Absent,
            automatic_barcode_error: true,
            automatic_renderer_error: true,
        }
    }

    /// ディスパッチ設定（`barcode` / `renderer` / `*Params`）から作成
    pub fn from_config(config: Config) -> Self {
        Self::new(BarcodeSelector::Dispatch(config))
    }

    pub fn with_renderer(mut self, renderer: impl Into<RendererSelector>) -> Self {
        self.renderer = renderer.into();
        self
    }

    pub fn with_barcode_config(mut self, config: impl Into<ConfigSource>) -> Self {
        self.barcode_config = config.into();
        self
    }

    pub fn with_renderer_config(mut self, config: impl Into<ConfigSource>) -> Self {
        self.renderer_config = config.into();
        self
    }

    /// バーコード生成失敗時にエラーオブジェクトへ置き換えるか
    pub fn with_automatic_barcode_error(mut self, enabled: bool) -> Self {
        self.automatic_barcode_error = enabled;
        self
    }

    /// レンダラー生成失敗時にエラーオブジェクトへ置き換えるか
    pub fn with_automatic_renderer_error(mut self, enabled: bool) -> Self {
        self.automatic_renderer_error = enabled;
        self
    }

    /// ディスパッチ設定を識別子とパラメータへ展開
    ///
    /// ディスパッチ設定の場合、個別に渡された設定は使われない。
    fn resolve(self) -> BarcodeResult<ResolvedRequest> {
        let Self {
            barcode,
            renderer,
            barcode_config,
            renderer_config,
            automatic_barcode_error,
            automatic_renderer_error,
        } = self;

        let (barcode, barcode_config, renderer, renderer_config) = match barcode {
            BarcodeSelector::Dispatch(config) => {
                let (barcode_name, barcode_params) = split_dispatch(&config, TypeSpace::Object)?;
                let (renderer_name, renderer_params) =
                    split_dispatch(&config, TypeSpace::Renderer)?;
                (
                    barcode_name.map_or(BarcodeSelector::Unspecified, BarcodeSelector::Name),
                    ConfigSource::Options(barcode_params),
                    renderer_name.map_or_else(RendererSelector::default, RendererSelector::Name),
                    ConfigSource::Options(renderer_params),
                )
            }
            other => {
                // ディスパッチ設定のレンダラーも識別子に分解しておく（フォールバックで再生成するため）
                let (renderer, renderer_config) = match renderer {
                    RendererSelector::Dispatch(config) => {
                        let (name, params) = split_dispatch(&config, TypeSpace::Renderer)?;
                        (
                            name.map_or_else(RendererSelector::default, RendererSelector::Name),
                            ConfigSource::Options(params),
                        )
                    }
                    renderer => (renderer, renderer_config),
                };
                (other, barcode_config, renderer, renderer_config)
            }
        };

        Ok(ResolvedRequest {
            barcode,
            barcode_config,
            renderer,
            renderer_config,
            automatic_barcode_error,
            automatic_renderer_error,
        })
    }
}

struct ResolvedRequest {
    barcode: BarcodeSelector,
    barcode_config: ConfigSource,
    renderer: RendererSelector,
    renderer_config: ConfigSource,
    automatic_barcode_error: bool,
    automatic_renderer_error: bool,
}

/// バーコードファクトリーのプロキシ
///
/// 型カタログと生成時の既定値（既定フォント）を保持する。
pub struct Barcode {
    catalog: TypeCatalog,
    defaults: ObjectDefaults,
}

impl Barcode {
    /// 組み込み型のみのプロキシを作成
    pub fn new() -> Self {
        Self::with_catalog(TypeCatalog::with_builtins())
    }

    pub fn with_catalog(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            defaults: ObjectDefaults::default(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut TypeCatalog {
        &mut self.catalog
    }

    /// 以降に生成されるオブジェクトの既定フォントを設定（存在確認は描画時）
    pub fn set_barcode_font(&mut self, font: Option<FontSource>) {
        self.defaults.font = font;
    }

    pub fn barcode_font(&self) -> Option<&FontSource> {
        self.defaults.font.as_ref()
    }

    pub fn defaults(&self) -> &ObjectDefaults {
        &self.defaults
    }

    /// バーコードオブジェクトを生成（エラーはそのまま返す）
    pub fn make_barcode(
        &self,
        barcode: impl Into<BarcodeSelector>,
        config: impl Into<ConfigSource>,
    ) -> BarcodeResult<Arc<dyn BarcodeObject>> {
        ObjectFactory::new(&self.catalog, &self.defaults).make(barcode.into(), config.into())
    }

    /// レンダラーを生成（エラーはそのまま返す）
    pub fn make_renderer(
        &self,
        renderer: impl Into<RendererSelector>,
        config: impl Into<ConfigSource>,
    ) -> BarcodeResult<Box<dyn BarcodeRenderer>> {
        RendererFactory::new(&self.catalog).make(renderer.into(), config.into())
    }

    /// バーコードとレンダラーを生成して結び付ける
    ///
    /// 生成に失敗した場合、対応するフラグが有効で失敗が描画可能ならエラーオブジェクトに置き換える。
    pub fn factory(&self, request: FactoryRequest) -> BarcodeResult<Box<dyn BarcodeRenderer>> {
        let request = request.resolve()?;
        let objects = ObjectFactory::new(&self.catalog, &self.defaults);
        let renderers = RendererFactory::new(&self.catalog);

        let mut barcode = match objects.make(request.barcode, request.barcode_config) {
            Ok(barcode) => barcode,
            Err(error) => self.substitute(error, request.automatic_barcode_error)?,
        };

        let renderer_name = match &request.renderer {
            RendererSelector::Name(name) => Some(name.clone()),
            _ => None,
        };

        let mut renderer = match renderers.make(request.renderer, request.renderer_config) {
            Ok(renderer) => renderer,
            Err(error) => {
                let name = match renderer_name {
                    Some(name) if request.automatic_renderer_error && error.is_renderable() => name,
                    _ => return Err(error),
                };
                barcode = self.substitute(error, true)?;
                renderers.build(&name, Options::new())?
            }
        };

        renderer.params_mut().automatic_render_error = request.automatic_barcode_error;
        renderer.set_barcode(barcode);
        Ok(renderer)
    }

    /// 生成してそのまま描画
    pub fn draw(&self, request: FactoryRequest) -> BarcodeResult<RenderOutput> {
        self.factory(request)?.render()
    }

    fn substitute(
        &self,
        error: BarcodeError,
        enabled: bool,
    ) -> BarcodeResult<Arc<dyn BarcodeObject>> {
        if !enabled || !error.is_renderable() {
            return Err(error);
        }
        warn!(
            error = %error,
            exception_class = error.kind_name(),
            "substituting error barcode"
        );
        ObjectFactory::new(&self.catalog, &self.defaults)
            .build(ErrorObject::NAME, ErrorObject::options_for(&error))
    }
}

impl Default for Barcode {
    fn default() -> Self {
        Self::new()
    }
}
