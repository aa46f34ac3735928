//! ファクトリーモジュール - 識別子・設定からバーコードオブジェクト/レンダラーを生成
//!
//! - `ObjectFactory`: コンテンツオブジェクト（シンボル）
//! - `RendererFactory`: レンダラー
//!
//! この層ではエラーを握りつぶさない。フォールバックは `proxy` の責務。

pub mod object_factory;
pub mod renderer_factory;

pub use object_factory::{BarcodeSelector, ObjectFactory};
pub use renderer_factory::{RendererFactory, RendererSelector};

use crate::core::error::{BarcodeError, BarcodeResult, TypeSpace};
use crate::core::options::{Config, Options};

/// ディスパッチ設定のキー
pub const BARCODE_KEY: &str = "barcode";
pub const BARCODE_PARAMS_KEY: &str = "barcodeParams";
pub const RENDERER_KEY: &str = "renderer";
pub const RENDERER_PARAMS_KEY: &str = "rendererParams";

/// ディスパッチ設定から識別子とパラメータを取り出す
///
/// 識別子キーが無い（または null の）場合は `None`、文字列以外は `InvalidArgument`。
pub(crate) fn split_dispatch(
    config: &Config,
    space: TypeSpace,
) -> BarcodeResult<(Option<String>, Options)> {
    let (key, params_key) = match space {
        TypeSpace::Object => (BARCODE_KEY, BARCODE_PARAMS_KEY),
        TypeSpace::Renderer => (RENDERER_KEY, RENDERER_PARAMS_KEY),
    };

    let identifier = if config.is_set(key) {
        let name = config.get_str(key).ok_or_else(|| {
            BarcodeError::invalid_argument(format!("'{key}' must be a string"))
        })?;
        Some(name.to_string())
    } else {
        None
    };

    let params = config
        .section(params_key)?
        .map(|section| section.to_options())
        .unwrap_or_default();

    Ok((identifier, params))
}
