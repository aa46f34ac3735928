//! ObjectFactory - バーコードオブジェクトの Factory Pattern 実装

use super::split_dispatch;
use crate::core::catalog::TypeCatalog;
use crate::core::error::{BarcodeError, BarcodeResult, TypeSpace};
use crate::core::options::{normalize, take_namespace, Config, ConfigSource, Options};
use crate::object::{BarcodeObject, ObjectDefaults};
use std::sync::Arc;
use tracing::debug;

/// バーコードオブジェクトの指定方法
#[derive(Debug, Clone, Default)]
pub enum BarcodeSelector {
    /// 識別子（"code39" など）
    Name(String),
    /// `barcode` / `barcodeParams` を持つディスパッチ設定
    Dispatch(Config),
    /// 生成済みのインスタンス（そのまま採用）
    Instance(Arc<dyn BarcodeObject>),
    /// 未指定
    #[default]
    Unspecified,
}

impl From<&str> for BarcodeSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for BarcodeSelector {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Option<&str>> for BarcodeSelector {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Self::Unspecified, Self::from)
    }
}

impl From<Config> for BarcodeSelector {
    fn from(config: Config) -> Self {
        Self::Dispatch(config)
    }
}

impl From<Arc<dyn BarcodeObject>> for BarcodeSelector {
    fn from(barcode: Arc<dyn BarcodeObject>) -> Self {
        Self::Instance(barcode)
    }
}

pub struct ObjectFactory<'a> {
    catalog: &'a TypeCatalog,
    defaults: &'a ObjectDefaults,
}

impl<'a> ObjectFactory<'a> {
    pub fn new(catalog: &'a TypeCatalog, defaults: &'a ObjectDefaults) -> Self {
        Self { catalog, defaults }
    }

    /// 設定済みのバーコードオブジェクトを生成
    ///
    /// ディスパッチ設定の場合 `config` は使われない。
    pub fn make(
        &self,
        selector: BarcodeSelector,
        config: ConfigSource,
    ) -> BarcodeResult<Arc<dyn BarcodeObject>> {
        match selector {
            BarcodeSelector::Instance(barcode) => Ok(barcode),
            BarcodeSelector::Dispatch(config) => {
                let (name, params) = split_dispatch(&config, TypeSpace::Object)?;
                let name = name.ok_or_else(|| {
                    BarcodeError::missing_identifier(TypeSpace::Object, super::BARCODE_KEY)
                })?;
                self.build(&name, params)
            }
            BarcodeSelector::Name(name) => {
                if name.trim().is_empty() {
                    return Err(unspecified());
                }
                let options = normalize(config)?;
                self.build(&name, options)
            }
            BarcodeSelector::Unspecified => Err(unspecified()),
        }
    }

    /// 識別子とオプションから生成
    pub fn build(&self, name: &str, mut options: Options) -> BarcodeResult<Arc<dyn BarcodeObject>> {
        let namespace = take_namespace(&mut options, TypeSpace::Object.namespace_key())?;
        let creator = self.catalog.resolve_object(name, namespace.as_deref())?;

        let mut barcode = creator(self.defaults);
        barcode.set_options(&options)?;
        debug!(kind = barcode.kind(), options = options.len(), "barcode created");

        Ok(Arc::from(barcode))
    }
}

fn unspecified() -> BarcodeError {
    BarcodeError::invalid_argument("Barcode name must be specified in a string")
}
