//! RendererFactory - レンダラーの Factory Pattern 実装

use super::split_dispatch;
use crate::core::catalog::TypeCatalog;
use crate::core::error::{BarcodeError, BarcodeResult, TypeSpace};
use crate::core::options::{normalize, take_namespace, Config, ConfigSource, Options};
use crate::renderer::BarcodeRenderer;
use tracing::debug;

/// レンダラーの指定方法
#[derive(Debug)]
pub enum RendererSelector {
    /// 識別子（"image" など）
    Name(String),
    /// `renderer` / `rendererParams` を持つディスパッチ設定
    Dispatch(Config),
    /// 生成済みのインスタンス（そのまま採用）
    Instance(Box<dyn BarcodeRenderer>),
}

impl RendererSelector {
    pub const DEFAULT: &'static str = "image";
}

impl Default for RendererSelector {
    fn default() -> Self {
        Self::Name(Self::DEFAULT.to_string())
    }
}

impl From<&str> for RendererSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for RendererSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Config> for RendererSelector {
    fn from(config: Config) -> Self {
        Self::Dispatch(config)
    }
}

impl From<Box<dyn BarcodeRenderer>> for RendererSelector {
    fn from(renderer: Box<dyn BarcodeRenderer>) -> Self {
        Self::Instance(renderer)
    }
}

pub struct RendererFactory<'a> {
    catalog: &'a TypeCatalog,
}

impl<'a> RendererFactory<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self { catalog }
    }

    /// 設定済みのレンダラーを生成
    ///
    /// ディスパッチ設定の場合 `config` は使われない。
    pub fn make(
        &self,
        selector: RendererSelector,
        config: ConfigSource,
    ) -> BarcodeResult<Box<dyn BarcodeRenderer>> {
        match selector {
            RendererSelector::Instance(renderer) => Ok(renderer),
            RendererSelector::Dispatch(config) => {
                let (name, params) = split_dispatch(&config, TypeSpace::Renderer)?;
                let name = name.ok_or_else(|| {
                    BarcodeError::missing_identifier(TypeSpace::Renderer, super::RENDERER_KEY)
                })?;
                self.build(&name, params)
            }
            RendererSelector::Name(name) => {
                if name.trim().is_empty() {
                    return Err(BarcodeError::invalid_argument(
                        "Renderer name must be specified in a string",
                    ));
                }
                let options = normalize(config)?;
                self.build(&name, options)
            }
        }
    }

    /// 識別子とオプションから生成
    pub fn build(&self, name: &str, mut options: Options) -> BarcodeResult<Box<dyn BarcodeRenderer>> {
        let namespace = take_namespace(&mut options, TypeSpace::Renderer.namespace_key())?;
        let creator = self.catalog.resolve_renderer(name, namespace.as_deref())?;

        let mut renderer = creator();
        renderer.set_options(&options)?;
        debug!(
            renderer = renderer.renderer_type(),
            options = options.len(),
            "renderer created"
        );

        Ok(renderer)
    }
}
