// CLI層 - コマンドライン引数の定義と処理
// ユーザーインターフェースとバーコード生成ロジックの橋渡し

pub mod args;
pub mod commands;
pub mod output;

// 公開API
pub use args::*;
pub use commands::*;
pub use output::{LocalOutputStore, OutputStore};
