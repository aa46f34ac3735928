// コアレイヤー - エラー定義、設定の正規化、型カタログ
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod catalog;
pub mod error;
pub mod options;

// 公開API - 明示的にエクスポートして曖昧性を回避
pub use catalog::{class_name, TypeCatalog};
pub use error::{BarcodeError, BarcodeResult, TypeSpace};
pub use options::{Config, ConfigSource, Options};
