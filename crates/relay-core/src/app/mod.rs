//! App - アプリケーション層
//!
//! ports を組み合わせて completion bridge を実装します。
//!
//! # 主要コンポーネント
//! - **SlotRegistry**: SlotKey -> CompletionSlot の並行マップ
//! - **TranslatorCell**: 差し替え可能な ErrorTranslator の置き場
//! - **TaskRunner**: work を実行し、結果を slot に 1 回だけ届ける
//! - **Bridge / BridgeBuilder**: registry + translator + config の束
//! - **PendingReply**: transport 側の待ち受け（key の登録と解除）
//! - **global**: プロセス全体で共有する Bridge

pub mod bridge;
pub mod config;
pub mod global;
pub mod pending;
pub mod registry;
pub mod runner;
pub mod translator;

pub use self::bridge::{Bridge, BridgeBuilder};
pub use self::config::BridgeConfig;
pub use self::pending::PendingReply;
pub use self::registry::SlotRegistry;
pub use self::runner::TaskRunner;
pub use self::translator::TranslatorCell;
