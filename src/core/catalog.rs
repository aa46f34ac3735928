// 識別子 → 型の解決（文字列キーのコンストラクタレジストリ）

use super::error::{BarcodeError, BarcodeResult, TypeSpace};
use crate::object::code25::{Code25, Code25Interleaved};
use crate::object::code39::Code39;
use crate::object::error::ErrorObject;
use crate::object::{BarcodeObject, ObjectDefaults};
use crate::renderer::{BarcodeRenderer, ImageRenderer, PdfRenderer};
use std::collections::HashMap;
use tracing::debug;

// Type aliases for creator function types
pub type ObjectCreator = Box<dyn Fn(&ObjectDefaults) -> Box<dyn BarcodeObject> + Send + Sync>;
pub type RendererCreator = Box<dyn Fn() -> Box<dyn BarcodeRenderer> + Send + Sync>;

/// カタログに登録された型の種類
enum TypeDescriptor {
    Object(ObjectCreator),
    Renderer(RendererCreator),
    /// 存在はするがどちらの基底も満たさない型
    Opaque,
}

impl TypeDescriptor {
    fn space(&self) -> Option<TypeSpace> {
        match self {
            Self::Object(_) => Some(TypeSpace::Object),
            Self::Renderer(_) => Some(TypeSpace::Renderer),
            Self::Opaque => None,
        }
    }
}

struct CatalogEntry {
    class_name: String,
    descriptor: TypeDescriptor,
    description: Option<String>,
}

/// 名前空間と識別子から正規のクラス名を組み立てる
///
/// 全体を小文字化したうえで `_` 区切りの各要素の先頭を大文字にする。
/// `("My_Namespace", "ERROR")` → `"My_Namespace_Error"`
pub fn class_name(namespace: &str, identifier: &str) -> String {
    let joined = format!("{}_{}", namespace.trim(), identifier.trim()).to_ascii_lowercase();
    joined
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// 型カタログ
pub struct TypeCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl TypeCatalog {
    /// 空のカタログを作成
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 組み込み型を登録済みのカタログを作成
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        let objects = TypeSpace::Object.default_namespace();
        let renderers = TypeSpace::Renderer.default_namespace();

        catalog.register_object(objects, Code25::NAME, |d| Box::new(Code25::with_defaults(d)));
        catalog.register_object(objects, Code25Interleaved::NAME, |d| {
            Box::new(Code25Interleaved::with_defaults(d))
        });
        catalog.register_object(objects, Code39::NAME, |d| Box::new(Code39::with_defaults(d)));
        catalog.register_object(objects, ErrorObject::NAME, |d| {
            Box::new(ErrorObject::with_defaults(d))
        });
        catalog.register_renderer(renderers, ImageRenderer::NAME, || Box::new(ImageRenderer::new()));
        catalog.register_renderer(renderers, PdfRenderer::NAME, || Box::new(PdfRenderer::new()));

        for (space, name, description) in [
            (TypeSpace::Object, Code25::NAME, Code25::DESCRIPTION),
            (TypeSpace::Object, Code25Interleaved::NAME, Code25Interleaved::DESCRIPTION),
            (TypeSpace::Object, Code39::NAME, Code39::DESCRIPTION),
            (TypeSpace::Object, ErrorObject::NAME, ErrorObject::DESCRIPTION),
            (TypeSpace::Renderer, ImageRenderer::NAME, ImageRenderer::DESCRIPTION),
            (TypeSpace::Renderer, PdfRenderer::NAME, PdfRenderer::DESCRIPTION),
        ] {
            catalog.describe(space.default_namespace(), name, description);
        }

        catalog
    }

    fn insert(&mut self, namespace: &str, identifier: &str, descriptor: TypeDescriptor) {
        let class_name = class_name(namespace, identifier);
        self.entries.insert(
            class_name.clone(),
            CatalogEntry {
                class_name,
                descriptor,
                description: None,
            },
        );
    }

    /// バーコードオブジェクト型を登録
    pub fn register_object<F>(&mut self, namespace: &str, identifier: &str, creator: F)
    where
        F: Fn(&ObjectDefaults) -> Box<dyn BarcodeObject> + Send + Sync + 'static,
    {
        self.insert(namespace, identifier, TypeDescriptor::Object(Box::new(creator)));
    }

    /// レンダラー型を登録
    pub fn register_renderer<F>(&mut self, namespace: &str, identifier: &str, creator: F)
    where
        F: Fn() -> Box<dyn BarcodeRenderer> + Send + Sync + 'static,
    {
        self.insert(namespace, identifier, TypeDescriptor::Renderer(Box::new(creator)));
    }

    /// どちらの基底も満たさない型名を登録
    pub fn register_opaque(&mut self, namespace: &str, identifier: &str) {
        self.insert(namespace, identifier, TypeDescriptor::Opaque);
    }

    /// 登録済みの型に説明を付ける
    pub fn describe(&mut self, namespace: &str, identifier: &str, description: &str) {
        if let Some(entry) = self.entries.get_mut(&class_name(namespace, identifier)) {
            entry.description = Some(description.to_string());
        }
    }

    fn lookup(
        &self,
        space: TypeSpace,
        identifier: &str,
        namespace: Option<&str>,
    ) -> BarcodeResult<&CatalogEntry> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(BarcodeError::invalid_argument(format!(
                "{} name must be specified in a string",
                capitalize(&space.to_string())
            )));
        }

        let requested = namespace.map(|ns| class_name(ns, identifier));
        if let Some(entry) = requested.as_ref().and_then(|name| self.entries.get(name)) {
            return Ok(entry);
        }

        let builtin = class_name(space.default_namespace(), identifier);
        self.entries
            .get(&builtin)
            .ok_or_else(|| BarcodeError::not_found(space, requested.unwrap_or(builtin)))
    }

    /// バーコードオブジェクトのコンストラクタを解決
    pub fn resolve_object(
        &self,
        identifier: &str,
        namespace: Option<&str>,
    ) -> BarcodeResult<&ObjectCreator> {
        let entry = self.lookup(TypeSpace::Object, identifier, namespace)?;
        debug!(identifier, class_name = %entry.class_name, "resolved barcode class");
        match &entry.descriptor {
            TypeDescriptor::Object(creator) => Ok(creator),
            _ => Err(BarcodeError::invalid_type(
                TypeSpace::Object,
                entry.class_name.clone(),
            )),
        }
    }

    /// レンダラーのコンストラクタを解決
    pub fn resolve_renderer(
        &self,
        identifier: &str,
        namespace: Option<&str>,
    ) -> BarcodeResult<&RendererCreator> {
        let entry = self.lookup(TypeSpace::Renderer, identifier, namespace)?;
        debug!(identifier, class_name = %entry.class_name, "resolved renderer class");
        match &entry.descriptor {
            TypeDescriptor::Renderer(creator) => Ok(creator),
            _ => Err(BarcodeError::invalid_type(
                TypeSpace::Renderer,
                entry.class_name.clone(),
            )),
        }
    }

    /// 既定名前空間に登録された識別子の一覧
    pub fn available(&self, space: TypeSpace) -> Vec<String> {
        let prefix = format!("{}_", space.default_namespace());
        let mut names: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.descriptor.space() == Some(space))
            .filter_map(|entry| entry.class_name.strip_prefix(&prefix))
            .map(str::to_ascii_lowercase)
            .collect();
        names.sort();
        names
    }

    /// 識別子の説明を取得
    pub fn description(&self, space: TypeSpace, identifier: &str) -> Option<&str> {
        self.entries
            .get(&class_name(space.default_namespace(), identifier))
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name() {
        assert_eq!(class_name("Barcode_Object", "code39"), "Barcode_Object_Code39");
        assert_eq!(class_name("my_namespace", "ERROR"), "My_Namespace_Error");
        assert_eq!(class_name(" My_Namespace ", " error "), "My_Namespace_Error");
    }

    #[test]
    fn test_builtins_available() {
        let catalog = TypeCatalog::with_builtins();
        assert_eq!(
            catalog.available(TypeSpace::Object),
            vec!["code25", "code25interleaved", "code39", "error"]
        );
        assert_eq!(catalog.available(TypeSpace::Renderer), vec!["image", "pdf"]);
        assert!(catalog.description(TypeSpace::Object, "code39").is_some());
        assert!(catalog.description(TypeSpace::Object, "zf123").is_none());
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        let catalog = TypeCatalog::with_builtins();
        let creator = catalog.resolve_object("CoDe39", None).unwrap();
        assert_eq!(creator(&ObjectDefaults::default()).kind(), "code39");

        let creator = catalog.resolve_renderer(" PDF ", None).unwrap();
        assert_eq!(creator().renderer_type(), "pdf");
    }

    #[test]
    fn test_not_found() {
        let catalog = TypeCatalog::with_builtins();
        let err = catalog.resolve_object("zf123", None).err().unwrap();
        assert!(matches!(err, BarcodeError::NotFound { .. }));
        assert!(err.to_string().contains("Barcode_Object_Zf123"));

        let err = catalog.resolve_renderer("zend", None).err().unwrap();
        assert!(matches!(
            err,
            BarcodeError::NotFound {
                space: TypeSpace::Renderer,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_identifier() {
        let catalog = TypeCatalog::with_builtins();
        let err = catalog.resolve_object("   ", None).err().unwrap();
        assert!(matches!(err, BarcodeError::InvalidArgument { .. }));
        assert_eq!(err.to_string(), "Barcode name must be specified in a string");
    }

    #[test]
    fn test_wrong_space_is_invalid_type() {
        let catalog = TypeCatalog::with_builtins();
        // レンダラー名前空間の型をオブジェクトとして要求
        let err = catalog
            .resolve_object("image", Some("Barcode_Renderer"))
            .err()
            .unwrap();
        assert!(matches!(err, BarcodeError::InvalidType { .. }));
    }

    #[test]
    fn test_namespace_takes_precedence() {
        let mut catalog = TypeCatalog::with_builtins();
        catalog.register_object("My_Namespace", "error", |d| Box::new(Code39::with_defaults(d)));
        catalog.register_opaque("My_Namespace_Other", "error");

        let creator = catalog.resolve_object("error", Some("my_namespace")).unwrap();
        assert_eq!(creator(&ObjectDefaults::default()).kind(), "code39");

        let err = catalog
            .resolve_object("error", Some("My_Namespace_Other"))
            .err()
            .unwrap();
        assert!(matches!(err, BarcodeError::InvalidType { .. }));

        // 名前空間に無い識別子は組み込みへフォールバック
        let creator = catalog.resolve_object("code25", Some("My_Namespace")).unwrap();
        assert_eq!(creator(&ObjectDefaults::default()).kind(), "code25");
    }
}
