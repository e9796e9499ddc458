//! ロギングシステム
//!
//! `log` ファサード経由の診断出力と、ホストへ提示する厳格警告の履歴を提供

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// 厳格警告の最大保存数
const MAX_WARNINGS: usize = 100;

/// 厳格警告の履歴
///
/// 無効なハンドルなど呼び出し側の契約違反を記録する。
/// 記録と同時に `log::warn!` へも転送する。新しいものが先頭。
#[derive(Debug, Clone)]
pub struct StrictWarnings {
    entries: VecDeque<String>,
    max_size: usize,
}

impl StrictWarnings {
    pub fn new() -> Self {
        Self::with_capacity(MAX_WARNINGS)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size.min(MAX_WARNINGS)),
            max_size,
        }
    }

    /// 警告を記録
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!(target: "glkfref", "{}", message);

        if self.max_size == 0 {
            return;
        }
        self.entries.push_front(message);
        while self.entries.len() > self.max_size {
            self.entries.pop_back();
        }
    }

    /// 記録済みの警告（新しい順）
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 記録済みの警告を取り出して履歴を空にする
    pub fn take(&mut self) -> Vec<String> {
        self.entries.drain(..).collect()
    }
}

impl Default for StrictWarnings {
    fn default() -> Self {
        Self::new()
    }
}

/// 標準エラー出力（と任意のファイル）へ書き出すロガー
///
/// バイナリから `install` して使う。ライブラリ側は `log` マクロのみを使用する。
#[derive(Debug, Clone)]
pub struct StderrLogger {
    level: LevelFilter,
    output_stderr: bool,
    output_file: Option<PathBuf>,
}

impl StderrLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            output_stderr: true,
            output_file: None,
        }
    }

    /// 開発者向けロガー
    pub fn for_development() -> Self {
        Self::new(LevelFilter::Debug)
    }

    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// ファイル出力を設定
    pub fn with_file_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// 標準エラー出力を無効化（テスト向け）
    #[cfg(test)]
    pub fn without_stderr(mut self) -> Self {
        self.output_stderr = false;
        self
    }

    /// グローバルロガーとして登録
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn tag(level: Level) -> &'static str {
        match level {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARNING",
            Level::Error => "ERROR",
        }
    }

    fn format_line(record: &Record<'_>) -> String {
        format!(
            "{} in {}: {}",
            Self::tag(record.level()),
            record.target(),
            record.args()
        )
    }

    fn write_line(&self, message: &str) {
        if self.output_stderr {
            eprintln!("{}", message);
        }

        if let Some(path) = &self.output_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", message);
            }
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&Self::format_line(record));
        }
    }

    fn flush(&self) {}
}
