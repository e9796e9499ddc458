//! 結合テスト用ユーティリティ
//!
//! - 台本どおりに応答する `MessageInput`
//! - 生成・破棄を記録するトラッカー

#![allow(dead_code)]

use glkfref::encoding::{wide_to_string_lossy, WideChar};
use glkfref::fileref::{DispatchRock, ObjectClass, ObjectTracker};
use glkfref::{FrefId, MessageInput};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// 行入力への応答
#[derive(Debug, Clone)]
pub enum Line {
    /// 初期内容のまま確定
    Keep,
    /// 内容を置き換えて確定
    Type(String),
    /// キャンセル
    Cancel,
}

/// 台本どおりに応答する入力
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<Line>,
    keys: VecDeque<u32>,
    /// 受け取った行入力プロンプト
    pub line_prompts: Vec<String>,
    /// 受け取った初期内容
    pub initial_contents: Vec<String>,
    /// 受け取った1文字入力プロンプト
    pub char_prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typing(text: &str) -> Self {
        Self::new().line(Line::Type(text.to_string()))
    }

    pub fn line(mut self, line: Line) -> Self {
        self.lines.push_back(line);
        self
    }

    pub fn keys(mut self, keys: &[u32]) -> Self {
        self.keys.extend(keys.iter().copied());
        self
    }

    pub fn chars(self, keys: &str) -> Self {
        let codes: Vec<u32> = keys.chars().map(|c| c as u32).collect();
        self.keys(&codes)
    }
}

impl MessageInput for ScriptedInput {
    fn get_line(
        &mut self,
        prompt: &[WideChar],
        buf: &mut [WideChar],
        initial_len: usize,
    ) -> Option<usize> {
        self.line_prompts.push(wide_to_string_lossy(prompt));
        self.initial_contents
            .push(wide_to_string_lossy(&buf[..initial_len]));

        match self.lines.pop_front().unwrap_or(Line::Cancel) {
            Line::Keep => Some(initial_len),
            Line::Type(text) => {
                let mut len = 0;
                for (slot, ch) in buf.iter_mut().zip(text.chars()) {
                    *slot = ch as WideChar;
                    len += 1;
                }
                Some(len)
            }
            Line::Cancel => None,
        }
    }

    fn get_char(&mut self, prompt: &[WideChar]) -> u32 {
        self.char_prompts.push(wide_to_string_lossy(prompt));
        // 台本切れは ESC
        self.keys.pop_front().unwrap_or(0x1b)
    }
}

/// トラッカーが受け取ったイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    Register(FrefId),
    Unregister(FrefId, DispatchRock),
}

/// イベントを共有ログに記録するトラッカー
pub struct RecordingTracker {
    events: Rc<RefCell<Vec<TrackerEvent>>>,
    next_rock: u64,
}

impl RecordingTracker {
    pub fn new() -> (Self, Rc<RefCell<Vec<TrackerEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let tracker = Self {
            events: Rc::clone(&events),
            next_rock: 100,
        };
        (tracker, events)
    }
}

impl ObjectTracker for RecordingTracker {
    fn register(&mut self, fref: FrefId, _class: ObjectClass) -> DispatchRock {
        self.next_rock += 1;
        self.events.borrow_mut().push(TrackerEvent::Register(fref));
        DispatchRock(self.next_rock)
    }

    fn unregister(&mut self, fref: FrefId, _class: ObjectClass, disprock: DispatchRock) {
        self.events
            .borrow_mut()
            .push(TrackerEvent::Unregister(fref, disprock));
    }
}
