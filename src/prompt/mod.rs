//! 対話的なファイル名入力
//!
//! ユーザーにファイル名を尋ねてファイル参照を生成する。
//! 行入力と1文字入力は `MessageInput` に委ね、その呼び出しだけが処理を止める。
//! キャンセル（空入力・拒否・入力側の中断）はエラーではなく `PromptOutcome::Cancelled`。

pub mod terminal;

pub use terminal::TerminalInput;

use crate::encoding::{narrow_from_wide, wide_from_narrow, WideChar};
use crate::error::{EncodingError, FrefError, Result};
use crate::fileref::query::is_regular_file;
use crate::fileref::{suffix_for_usage, FileMode, FileType, FileUsage, FilerefRegistry, FrefId, Rock};
use crate::session::Session;

/// プロンプトと入力バッファの文字数
pub const BUFLEN: usize = 256;

/// 特殊キー: Escape
pub const KEYCODE_ESCAPE: u32 = 0xffff_fff8;
/// 特殊キー: Return
pub const KEYCODE_RETURN: u32 = 0xffff_fffa;

/// 上書き確認で「いいえ」とみなすキー（n, N, ESC, BEL）
const DECLINE_KEYS: [u32; 5] = [b'n' as u32, b'N' as u32, 0x1b, 0x07, KEYCODE_ESCAPE];
const ACCEPT_KEYS: [u32; 2] = [b'y' as u32, b'Y' as u32];

/// ユーザー入力の受け口
pub trait MessageInput {
    /// 1行入力
    ///
    /// `buf[..initial_len]` を初期内容として編集させ、確定したら内容を `buf` に
    /// 書いて文字数を返す。`buf.len()` が容量。キャンセル時は `None`。
    fn get_line(
        &mut self,
        prompt: &[WideChar],
        buf: &mut [WideChar],
        initial_len: usize,
    ) -> Option<usize>;

    /// 1文字入力（文字コードまたは特殊キーコード）
    fn get_char(&mut self, prompt: &[WideChar]) -> u32;
}

/// 対話的な生成の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    Created(FrefId),
    Cancelled,
}

impl PromptOutcome {
    pub fn fref(self) -> Option<FrefId> {
        match self {
            PromptOutcome::Created(fref) => Some(fref),
            PromptOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, PromptOutcome::Cancelled)
    }
}

/// 用途ごとのプロンプト文言
fn prompt_label(file_type: FileType) -> &'static str {
    match file_type {
        FileType::SavedGame => "Enter saved game",
        FileType::Transcript => "Enter transcript file",
        FileType::InputRecord => "Enter command record file",
        FileType::Data | FileType::Other(_) => "Enter data file",
    }
}

/// 末尾の改行・空白と先頭の空白を取り除く
fn trim_filename(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| matches!(c, '\n' | '\r' | ' '))
        .trim_start_matches(' ')
}

/// 入力された名前から候補パスを作る
///
/// `/` で始まればそのまま、そうでなければ作業ディレクトリに結合する。
/// 最後の要素に `.` がなければ用途の拡張子を付ける。
fn candidate_path(session: &Session, name: &str, usage: FileUsage) -> String {
    let mut path = if name.starts_with('/') {
        name.to_string()
    } else {
        session.join(name)
    };

    let last_component = path.rfind('/').map_or(path.as_str(), |slash| &path[slash + 1..]);
    if !last_component.contains('.') {
        path.push_str(suffix_for_usage(usage));
    }
    path
}

impl FilerefRegistry {
    /// ユーザーにファイル名を尋ねてハンドルを生成
    ///
    /// 書き込みモードで既存の通常ファイルを指した場合は上書きを確認する。
    /// 確定した名前は用途ごとの前回ファイル名として記憶する（キャンセル時は変更しない）。
    pub fn create_by_prompt(
        &mut self,
        session: &mut Session,
        input: &mut dyn MessageInput,
        usage: FileUsage,
        mode: FileMode,
        rock: Rock,
    ) -> Result<PromptOutcome> {
        let file_type = usage.file_type();
        let action = if mode == FileMode::Read {
            "to load"
        } else {
            "to store"
        };
        let text = format!("{} {}: ", prompt_label(file_type), action);

        let mut prbuf = [0 as WideChar; BUFLEN];
        let prlen = self.widen_or_warn(&mut prbuf, &text, "prompt")?;

        let mut wcsbuf = [0 as WideChar; BUFLEN];
        let initial_len = if session.config().prompt_defaults {
            self.widen_or_warn(&mut wcsbuf, session.last_name(file_type), "default filename")?
        } else {
            0
        };

        let Some(len) = input.get_line(&prbuf[..prlen], &mut wcsbuf[..BUFLEN - 1], initial_len)
        else {
            log::debug!("fileref_create_by_prompt: input cancelled");
            return Ok(PromptOutcome::Cancelled);
        };
        let len = len.min(BUFLEN - 1);
        wcsbuf[len] = 0;

        let mut buf = [0u8; BUFLEN];
        let narrow_len = narrow_from_wide(Some(&mut buf[..]), Some(&wcsbuf[..=len]))
            .map_err(|err| self.encoding_failure("filename", err))?;
        let raw = String::from_utf8_lossy(&buf[..narrow_len]);

        let name = trim_filename(&raw);
        if name.is_empty() {
            log::debug!("fileref_create_by_prompt: empty filename");
            return Ok(PromptOutcome::Cancelled);
        }

        let path = candidate_path(session, name, usage);

        if mode != FileMode::Read && is_regular_file(&path) {
            let question = format!("Overwrite \"{}\"? [y/n] ", name);
            let qlen = self.widen_or_warn(&mut prbuf, &question, "confirmation prompt")?;

            loop {
                let response = input.get_char(&prbuf[..qlen]);
                if DECLINE_KEYS.contains(&response) {
                    log::debug!("fileref_create_by_prompt: overwrite of {} declined", path);
                    return Ok(PromptOutcome::Cancelled);
                }
                if ACCEPT_KEYS.contains(&response) {
                    break;
                }
            }
        }

        session.remember_name(file_type, name);

        let fref = self.create_or_warn(&path, usage, rock, "fileref_create_by_prompt")?;
        Ok(PromptOutcome::Created(fref))
    }

    fn widen_or_warn(
        &mut self,
        dest: &mut [WideChar],
        text: &str,
        what: &'static str,
    ) -> Result<usize> {
        wide_from_narrow(Some(dest), Some(text.as_bytes()))
            .map_err(|err| self.encoding_failure(what, err))
    }

    fn encoding_failure(&mut self, what: &'static str, err: EncodingError) -> FrefError {
        let message = match err {
            EncodingError::InvalidSequence => format!("fileref_create_by_prompt: invalid {}.", what),
            _ => format!("fileref_create_by_prompt: {} too long.", what),
        };
        self.warn(message);
        FrefError::encoding(what, err)
    }
}
