//! ファイル名の正規化
//!
//! ユーザー入力の名前から安全なパス要素を作る：
//! - `"\/><:|?*` を削除
//! - 最初の `.` で打ち切り
//! - 何も残らなければ `null`
//! - 用途に応じた拡張子を付与

use super::{FileType, FileUsage};

/// 正規化後の名前の最大文字数（拡張子を除く）
pub const MAX_NAME_LEN: usize = 255;

/// ファイル名から取り除く文字
const FORBIDDEN: &[char] = &['"', '\\', '/', '>', '<', ':', '|', '?', '*'];

/// 用途ごとの既定の拡張子
pub fn suffix_for_usage(usage: FileUsage) -> &'static str {
    match usage.file_type() {
        FileType::Data => ".glkdata",
        FileType::SavedGame => ".glksave",
        FileType::Transcript | FileType::InputRecord => ".txt",
        FileType::Other(_) => "",
    }
}

/// 名前を正規化して拡張子を付ける
///
/// ファイルシステムには触れない。
///
/// # Examples
/// ```
/// use glkfref::fileref::{sanitize_filename, FileUsage};
///
/// assert_eq!(sanitize_filename("My/File:1.sav", FileUsage::DATA), "MyFile1.glkdata");
/// assert_eq!(sanitize_filename("????", FileUsage::DATA), "null.glkdata");
/// ```
pub fn sanitize_filename(raw: &str, usage: FileUsage) -> String {
    let mut name: String = raw
        .chars()
        .take_while(|&ch| ch != '.')
        .filter(|ch| !FORBIDDEN.contains(ch))
        .take(MAX_NAME_LEN)
        .collect();

    if name.is_empty() {
        name.push_str("null");
    }
    name.push_str(suffix_for_usage(usage));
    name
}
