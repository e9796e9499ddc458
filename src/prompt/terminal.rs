//! 端末からの入力
//!
//! crossterm の raw モードでプロンプトを表示し、行編集と1文字入力を行う。

use std::io::{self, Stdout, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use unicode_width::UnicodeWidthChar;

use super::{MessageInput, KEYCODE_ESCAPE, KEYCODE_RETURN};
use crate::encoding::{wide_to_string_lossy, WideChar};

/// 行編集の結果
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineEdit {
    /// 画面に書き出す文字列（消去シーケンスを含む）
    Echo(String),
    Confirm,
    Cancel,
    Ignore,
}

/// 1キー分の行編集
fn edit_line(line: &mut Vec<char>, capacity: usize, key: &KeyEvent) -> LineEdit {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => LineEdit::Confirm,
        KeyCode::Esc => LineEdit::Cancel,
        KeyCode::Char('g') if ctrl => LineEdit::Cancel,
        KeyCode::Char('u') if ctrl => {
            let width: usize = line.drain(..).map(char_width).sum();
            LineEdit::Echo(erase(width))
        }
        KeyCode::Backspace => match line.pop() {
            Some(ch) => LineEdit::Echo(erase(char_width(ch))),
            None => LineEdit::Ignore,
        },
        KeyCode::Char(ch) if !ctrl => {
            if line.len() >= capacity {
                return LineEdit::Ignore;
            }
            line.push(ch);
            LineEdit::Echo(ch.to_string())
        }
        _ => LineEdit::Ignore,
    }
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

fn erase(width: usize) -> String {
    "\u{8} \u{8}".repeat(width)
}

/// キーイベントを文字コードに変換
fn key_to_code(key: &KeyEvent) -> Option<u32> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Some(0x1b),
        KeyCode::Enter => Some(KEYCODE_RETURN),
        KeyCode::Char(ch) if ctrl && ch.is_ascii_alphabetic() => {
            Some(ch.to_ascii_lowercase() as u32 & 0x1f)
        }
        KeyCode::Char(ch) => Some(ch as u32),
        _ => None,
    }
}

/// raw モードの有効期間
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// 押下されたキーを1つ読む
fn read_key() -> io::Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}

/// 端末を使う入力
pub struct TerminalInput<W: Write> {
    out: W,
}

impl TerminalInput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalInput<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn read_line(
        &mut self,
        prompt: &[WideChar],
        buf: &mut [WideChar],
        initial_len: usize,
    ) -> io::Result<Option<usize>> {
        let mut line: Vec<char> = buf[..initial_len.min(buf.len())]
            .iter()
            .filter_map(|&code| char::from_u32(code))
            .collect();

        let _raw = RawModeGuard::enable()?;
        let initial: String = line.iter().collect();
        write!(self.out, "{}{}", wide_to_string_lossy(prompt), initial)?;
        self.out.flush()?;

        let confirmed = loop {
            match edit_line(&mut line, buf.len(), &read_key()?) {
                LineEdit::Echo(text) => {
                    write!(self.out, "{}", text)?;
                    self.out.flush()?;
                }
                LineEdit::Confirm => break true,
                LineEdit::Cancel => break false,
                LineEdit::Ignore => {}
            }
        };
        write!(self.out, "\r\n")?;
        self.out.flush()?;

        if !confirmed {
            return Ok(None);
        }
        for (slot, ch) in buf.iter_mut().zip(&line) {
            *slot = *ch as WideChar;
        }
        Ok(Some(line.len()))
    }

    fn read_char(&mut self, prompt: &[WideChar]) -> io::Result<u32> {
        let _raw = RawModeGuard::enable()?;
        write!(self.out, "{}", wide_to_string_lossy(prompt))?;
        self.out.flush()?;

        let code = loop {
            if let Some(code) = key_to_code(&read_key()?) {
                break code;
            }
        };
        write!(self.out, "\r\n")?;
        self.out.flush()?;
        Ok(code)
    }
}

impl<W: Write> MessageInput for TerminalInput<W> {
    fn get_line(
        &mut self,
        prompt: &[WideChar],
        buf: &mut [WideChar],
        initial_len: usize,
    ) -> Option<usize> {
        // 端末エラーは入力のキャンセルとして扱う
        self.read_line(prompt, buf, initial_len).unwrap_or_else(|err| {
            log::warn!("terminal line input failed: {}", err);
            None
        })
    }

    fn get_char(&mut self, prompt: &[WideChar]) -> u32 {
        self.read_char(prompt).unwrap_or_else(|err| {
            log::warn!("terminal key input failed: {}", err);
            KEYCODE_ESCAPE
        })
    }
}
