//! 文字コード変換
//!
//! ホストロケールの狭い文字列（バイト列、UTF-8を想定）と、
//! 行エディタが扱う固定幅のワイド文字列（UCS-4）の相互変換。
//! どちらの関数も呼び出しごとに状態を持たずに変換する。
//! 入力はNUL文字があればそこで終端とみなす。

use crate::error::EncodingError;

/// 行エディタが扱うワイド文字（UCS-4 コードポイント）
pub type WideChar = u32;

/// 狭い文字列をワイド文字列に変換
///
/// `dest` の容量は文字数で数え、終端のNULを含めて収まる必要がある。
/// 成功時は終端を含まない書き込み文字数を返す。
///
/// # Examples
/// ```
/// use glkfref::encoding::wide_from_narrow;
///
/// let mut buf = [0u32; 8];
/// assert_eq!(wide_from_narrow(Some(&mut buf[..]), Some(&b"save"[..])), Ok(4));
/// assert_eq!(buf[..5], ['s' as u32, 'a' as u32, 'v' as u32, 'e' as u32, 0]);
/// ```
pub fn wide_from_narrow(
    dest: Option<&mut [WideChar]>,
    src: Option<&[u8]>,
) -> Result<usize, EncodingError> {
    let (Some(dest), Some(src)) = (dest, src) else {
        return Err(EncodingError::InvalidParams);
    };

    let src = until_nul(src, 0);
    let (text, malformed) = match std::str::from_utf8(src) {
        Ok(text) => (text, false),
        Err(err) => (
            std::str::from_utf8(&src[..err.valid_up_to()]).unwrap_or_default(),
            true,
        ),
    };

    let mut written = 0;
    for ch in text.chars() {
        if written + 1 >= dest.len() {
            return Err(EncodingError::InsufficientSpace);
        }
        dest[written] = ch as WideChar;
        written += 1;
    }

    if malformed {
        return Err(EncodingError::InvalidSequence);
    }
    terminate(dest, written, 0)
}

/// ワイド文字列を狭い文字列に変換
///
/// `dest` の容量は狭い文字（バイト）単位で数え、終端のNULを含めて収まる必要がある。
/// 成功時は終端を含まない書き込みバイト数を返す。
pub fn narrow_from_wide(
    dest: Option<&mut [u8]>,
    src: Option<&[WideChar]>,
) -> Result<usize, EncodingError> {
    let (Some(dest), Some(src)) = (dest, src) else {
        return Err(EncodingError::InvalidParams);
    };

    let mut written = 0;
    let mut scratch = [0u8; 4];
    for &code in until_nul(src, 0) {
        let ch = char::from_u32(code).ok_or(EncodingError::InvalidSequence)?;
        let encoded = ch.encode_utf8(&mut scratch).as_bytes();
        if written + encoded.len() >= dest.len() {
            return Err(EncodingError::InsufficientSpace);
        }
        dest[written..written + encoded.len()].copy_from_slice(encoded);
        written += encoded.len();
    }

    terminate(dest, written, 0)
}

/// 表示用にワイド文字列を `String` へ変換（不正なコードポイントは置換文字）
pub fn wide_to_string_lossy(src: &[WideChar]) -> String {
    until_nul(src, 0)
        .iter()
        .map(|&code| char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn until_nul<T: PartialEq + Copy>(src: &[T], nul: T) -> &[T] {
    match src.iter().position(|&c| c == nul) {
        Some(end) => &src[..end],
        None => src,
    }
}

fn terminate<T>(dest: &mut [T], written: usize, nul: T) -> Result<usize, EncodingError> {
    match dest.get_mut(written) {
        Some(slot) => {
            *slot = nul;
            Ok(written)
        }
        None => Err(EncodingError::InsufficientSpace),
    }
}
