use crate::core::catalog::TypeCatalog;
use crate::core::error::TypeSpace;
use anyhow::Result;

/// 一覧表示用の行を作成
pub fn list_lines(catalog: &TypeCatalog) -> Vec<String> {
    let mut lines = Vec::new();

    for (space, title) in [
        (TypeSpace::Object, "Barcode objects"),
        (TypeSpace::Renderer, "Renderers"),
    ] {
        lines.push(format!("{title}:"));
        for name in catalog.available(space) {
            match catalog.description(space, &name) {
                Some(description) => lines.push(format!("  - {name:<18} {description}")),
                None => lines.push(format!("  - {name}")),
            }
        }
    }

    lines
}

/// Execute list command
pub fn execute_list() -> Result<()> {
    let catalog = TypeCatalog::with_builtins();
    for line in list_lines(&catalog) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_lines() {
        let lines = list_lines(&TypeCatalog::with_builtins());

        assert_eq!(lines[0], "Barcode objects:");
        assert!(lines.iter().any(|l| l.contains("code39")));
        assert!(lines.iter().any(|l| l.contains("code25interleaved")));
        assert!(lines.contains(&"Renderers:".to_string()));
        assert!(lines.iter().any(|l| l.contains("pdf")));
    }

    #[test]
    fn test_list_lines_without_descriptions() {
        let mut catalog = TypeCatalog::new();
        catalog.register_renderer("Barcode_Renderer", "svg", || {
            Box::new(crate::renderer::ImageRenderer::new())
        });

        let lines = list_lines(&catalog);
        assert_eq!(lines, vec!["Barcode objects:", "Renderers:", "  - svg"]);
    }
}
