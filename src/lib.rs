//! glkfref - Glk file reference handles
//!
//! ファイル参照の生成・列挙・破棄、ファイル名の正規化、対話的なファイル名入力

// コアモジュール
pub mod error;
pub mod logging;

// データ層
pub mod encoding;
pub mod fileref;
pub mod session;

// 入力層
pub mod prompt;

// 公開API
pub use error::{EncodingError, FrefError, Result};
pub use fileref::{FileMode, FileRef, FileType, FileUsage, FilerefRegistry, FrefId, Rock};
pub use prompt::{MessageInput, PromptOutcome};
pub use session::{Session, SessionConfig};
