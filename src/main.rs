use anyhow::Result;
use barcode_factory::cli::{execute_draw, execute_list, Cli, Commands, DrawConfig, LocalOutputStore};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG が未設定なら warn 以上のみ
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Draw {
            barcode,
            renderer,
            text,
            barcode_params,
            renderer_params,
            config,
            output,
            font,
            strict,
            force,
        } => {
            let config = DrawConfig {
                barcode,
                renderer,
                text,
                barcode_params,
                renderer_params,
                config,
                output,
                font,
                strict,
                force,
            };
            execute_draw(config, &LocalOutputStore::new()).await?;
        }
        Commands::List => execute_list()?,
    }

    Ok(())
}
