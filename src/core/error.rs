// バーコードファクトリーのエラー型定義

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 識別子空間（コンテンツオブジェクト / レンダラー）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSpace {
    /// バーコードオブジェクト
    Object,
    /// レンダラー
    Renderer,
}

impl TypeSpace {
    /// 組み込み型が登録されている既定の名前空間
    pub const fn default_namespace(&self) -> &'static str {
        match self {
            Self::Object => "Barcode_Object",
            Self::Renderer => "Barcode_Renderer",
        }
    }

    /// 設定内で名前空間を指定するキー
    pub const fn namespace_key(&self) -> &'static str {
        match self {
            Self::Object => "barcodeNamespace",
            Self::Renderer => "rendererNamespace",
        }
    }

    /// 満たすべき基底ケイパビリティの名前
    pub const fn base_name(&self) -> &'static str {
        match self {
            Self::Object => "BarcodeObject",
            Self::Renderer => "BarcodeRenderer",
        }
    }
}

impl fmt::Display for TypeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.write_str("barcode"),
            Self::Renderer => f.write_str("renderer"),
        }
    }
}

/// ファクトリー・オブジェクト・レンダラー共通のエラー型
#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("{space} class '{class_name}' not found")]
    NotFound { space: TypeSpace, class_name: String },

    #[error("{space} class '{class_name}' does not implement {}", space.base_name())]
    InvalidType { space: TypeSpace, class_name: String },

    #[error("No {space} name provided (missing '{key}' key)")]
    MissingIdentifier { space: TypeSpace, key: String },

    #[error("{message}")]
    InvalidArgument { message: String },

    #[error("Invalid barcode option '{option}': {reason}")]
    ObjectConfiguration { option: String, reason: String },

    #[error("Invalid renderer option '{option}': {reason}")]
    RendererConfiguration { option: String, reason: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration parse error: {message}")]
    Config { message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl BarcodeError {
    pub fn not_found(space: TypeSpace, class_name: impl Into<String>) -> Self {
        Self::NotFound {
            space,
            class_name: class_name.into(),
        }
    }

    pub fn invalid_type(space: TypeSpace, class_name: impl Into<String>) -> Self {
        Self::InvalidType {
            space,
            class_name: class_name.into(),
        }
    }

    pub fn missing_identifier(space: TypeSpace, key: impl Into<String>) -> Self {
        Self::MissingIdentifier {
            space,
            key: key.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn object_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ObjectConfiguration {
            option: option.into(),
            reason: reason.into(),
        }
    }

    pub fn renderer_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RendererConfiguration {
            option: option.into(),
            reason: reason.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// エラーフォールバックオブジェクトに渡す例外クラス名
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::InvalidType { .. } => "InvalidTypeError",
            Self::MissingIdentifier { .. } => "MissingIdentifierError",
            Self::InvalidArgument { .. } => "InvalidArgumentError",
            Self::ObjectConfiguration { .. } => "ObjectConfigurationError",
            Self::RendererConfiguration { .. } => "RendererConfigurationError",
            Self::Render { .. } => "RenderError",
            Self::Config { .. } => "ConfigError",
            Self::Io { .. } => "IoError",
            Self::Image(_) => "ImageError",
        }
    }

    /// 自動エラー描画で置き換え可能かどうか
    ///
    /// 型のロード失敗と入出力系の失敗は常に呼び出し元へ伝播する
    pub const fn is_renderable(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::Io { .. } | Self::Image(_)
        )
    }
}

/// ファクトリー操作の結果型
pub type BarcodeResult<T> = std::result::Result<T, BarcodeError>;
