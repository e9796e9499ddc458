//! エラーハンドリングシステム
//!
//! ファイル参照コア全体で使用されるエラー型を定義
//! 呼び出し側の契約違反（無効なハンドル）はここでは致命扱いしない

use thiserror::Error;

/// 文字コード変換のエラー
///
/// 変換関数は `Result<usize, EncodingError>` を返し、成功時は終端文字を
/// 含まない書き込み文字数になる。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingError {
    /// 入力または出力バッファが渡されていない
    #[error("invalid parameters")]
    InvalidParams,

    /// 変換先で表現できない文字列が含まれている
    #[error("invalid character sequence")]
    InvalidSequence,

    /// 終端文字を含めた結果が出力容量を超える
    #[error("insufficient space")]
    InsufficientSpace,
}

/// ファイル参照操作のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrefError {
    /// 無効または解放済みのハンドル
    #[error("{operation}: invalid ref")]
    InvalidHandle { operation: &'static str },

    /// 文字コード変換に失敗
    #[error("{context}: {source}")]
    Encoding {
        context: &'static str,
        #[source]
        source: EncodingError,
    },

    /// メモリ確保に失敗
    #[error("Out of memory")]
    OutOfMemory,

    /// 一時ファイル名を生成できない
    #[error("Temporary file name unavailable: {message}")]
    TempName { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl FrefError {
    /// 変換エラーにコンテキストを付与
    pub fn encoding(context: &'static str, source: EncodingError) -> Self {
        FrefError::Encoding { context, source }
    }
}

// std::io::Error から FrefError への変換
impl From<std::io::Error> for FrefError {
    fn from(error: std::io::Error) -> Self {
        FrefError::Io {
            message: error.to_string(),
        }
    }
}

impl From<std::collections::TryReserveError> for FrefError {
    fn from(_: std::collections::TryReserveError) -> Self {
        FrefError::OutOfMemory
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, FrefError>;
