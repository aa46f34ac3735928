use crate::cli::output::OutputStore;
use crate::core::error::BarcodeResult;
use crate::core::options::{Config, Options};
use crate::factories::{BARCODE_KEY, BARCODE_PARAMS_KEY, RENDERER_KEY, RENDERER_PARAMS_KEY};
use crate::object::FontSource;
use crate::proxy::{Barcode, FactoryRequest};
use crate::renderer::RenderOutput;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Configuration struct for draw command to reduce argument count
#[derive(Debug, Default, Clone)]
pub struct DrawConfig {
    pub barcode: Option<String>,
    pub renderer: Option<String>,
    pub text: Option<String>,
    pub barcode_params: Vec<String>,
    pub renderer_params: Vec<String>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub font: Option<String>,
    pub strict: bool,
    pub force: bool,
}

/// `KEY=VALUE` 形式の引数を解析
///
/// VALUE は JSON として解釈できればその値、できなければ文字列として扱う。
pub fn parse_param(raw: &str) -> Result<(String, Value)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid parameter '{raw}': expected KEY=VALUE"))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid parameter '{raw}': empty key");
    }

    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// 設定ファイルとコマンドライン引数からディスパッチ設定を組み立てる
///
/// コマンドライン引数が設定ファイルの値より優先される。
pub fn build_dispatch(config: &DrawConfig) -> Result<Config> {
    let file = match &config.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    let mut barcode_params = section_options(&file, BARCODE_PARAMS_KEY)?;
    if let Some(text) = &config.text {
        barcode_params.insert("text".to_string(), Value::String(text.clone()));
    }
    for raw in &config.barcode_params {
        let (key, value) = parse_param(raw)?;
        barcode_params.insert(key, value);
    }

    let mut renderer_params = section_options(&file, RENDERER_PARAMS_KEY)?;
    for raw in &config.renderer_params {
        let (key, value) = parse_param(raw)?;
        renderer_params.insert(key, value);
    }

    let mut root = file.to_options();
    if let Some(barcode) = &config.barcode {
        root.insert(BARCODE_KEY.to_string(), Value::String(barcode.clone()));
    }
    if let Some(renderer) = &config.renderer {
        root.insert(RENDERER_KEY.to_string(), Value::String(renderer.clone()));
    }
    root.insert(BARCODE_PARAMS_KEY.to_string(), Value::Object(barcode_params));
    root.insert(RENDERER_PARAMS_KEY.to_string(), Value::Object(renderer_params));

    Ok(Config::new(root))
}

fn section_options(config: &Config, key: &str) -> Result<Options> {
    Ok(config
        .section(key)?
        .map(|section| section.to_options())
        .unwrap_or_default())
}

/// 描画結果をバイト列と拡張子に変換
pub fn encode_output(output: &RenderOutput) -> BarcodeResult<(Vec<u8>, &'static str)> {
    match output {
        RenderOutput::Image(image) => Ok((image.encode()?, image.image_type.extension())),
        RenderOutput::Pdf(document) => Ok((document.to_json()?.into_bytes(), "json")),
    }
}

/// Execute draw command
pub async fn execute_draw<S>(config: DrawConfig, store: &S) -> Result<PathBuf>
where
    S: OutputStore + ?Sized,
{
    let dispatch = build_dispatch(&config)?;

    let mut barcode = Barcode::new();
    if let Some(font) = &config.font {
        barcode.set_barcode_font(FontSource::parse(font));
    }

    let request = FactoryRequest::from_config(dispatch)
        .with_automatic_barcode_error(!config.strict)
        .with_automatic_renderer_error(!config.strict);

    info!(
        barcode = config.barcode.as_deref().unwrap_or("-"),
        renderer = config.renderer.as_deref().unwrap_or("-"),
        strict = config.strict,
        "drawing barcode"
    );

    // 描画とエンコードはCPU処理なのでブロッキングスレッドで実行
    let (data, extension) = tokio::task::spawn_blocking(move || {
        let output = barcode.draw(request)?;
        encode_output(&output)
    })
    .await
    .context("Render task failed")??;

    let output = config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("barcode.{extension}")));

    // Check if output file already exists
    if store.exists(&output).await && !config.force {
        anyhow::bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    store.write(&output, &data).await?;

    println!("✅ 描画完了!");
    println!("   - 出力サイズ: {} bytes", data.len());
    println!("📄 結果は {} に保存されました", output.display());

    Ok(output)
}
