//! セッション既定値
//!
//! 作業ディレクトリと、用途ごとに前回使ったファイル名を保持する。
//! ホストの起動処理で一度だけ `set_base_file` を呼んで初期化する。

use crate::fileref::{suffix_for_usage, FileType, FileUsage};

/// プロンプト既定値の環境変数
pub const PROMPT_DEFAULTS_ENV: &str = "GLKFREF_PROMPT_DEFAULTS";

/// セッション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// プロンプトに前回のファイル名を入れておくか
    pub prompt_defaults: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt_defaults: true,
        }
    }
}

impl SessionConfig {
    /// 環境変数から設定を読む（未設定・不正値は既定値）
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(PROMPT_DEFAULTS_ENV) {
            match parse_switch(&value) {
                Some(enabled) => config.prompt_defaults = enabled,
                None => log::warn!("ignoring {}={:?}", PROMPT_DEFAULTS_ENV, value),
            }
        }
        config
    }
}

/// yes/no 形式の設定値を解釈
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "on" | "true" | "1" => Some(true),
        "no" | "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// 作業ディレクトリと前回のファイル名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    working_dir: String,
    last_save: String,
    last_script: String,
    last_command: String,
    last_data: String,
    config: SessionConfig,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            working_dir: ".".to_string(),
            last_save: "game.glksave".to_string(),
            last_script: "script.txt".to_string(),
            last_command: "commands.txt".to_string(),
            last_data: "file.glkdata".to_string(),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn working_dir(&self) -> &str {
        &self.working_dir
    }

    /// 作業ディレクトリからの相対名を結合
    pub fn join(&self, name: &str) -> String {
        format!("{}/{}", self.working_dir, name)
    }

    /// 用途の前回ファイル名（未定義の種別はデータファイル扱い）
    pub fn last_name(&self, file_type: FileType) -> &str {
        match file_type {
            FileType::SavedGame => &self.last_save,
            FileType::Transcript => &self.last_script,
            FileType::InputRecord => &self.last_command,
            FileType::Data | FileType::Other(_) => &self.last_data,
        }
    }

    pub(crate) fn remember_name(&mut self, file_type: FileType, name: &str) {
        let slot = match file_type {
            FileType::SavedGame => &mut self.last_save,
            FileType::Transcript => &mut self.last_script,
            FileType::InputRecord => &mut self.last_command,
            FileType::Data | FileType::Other(_) => &mut self.last_data,
        };
        slot.clear();
        slot.push_str(name);
    }

    /// 起動時に渡されたファイルから既定値を導出
    ///
    /// 最後の `/` より前を作業ディレクトリにし、ファイル名の最後の `.` より前を
    /// セーブ・トランスクリプト・データの既定名に使う。他の操作より先に呼ぶこと。
    pub fn set_base_file(&mut self, path: &str) {
        let filename = match path.rfind('/') {
            Some(slash) => {
                let dir = &path[..slash];
                if !dir.is_empty() {
                    self.working_dir = dir.to_string();
                }
                &path[slash + 1..]
            }
            None => path,
        };

        let stem = match filename.rfind('.') {
            Some(dot) => &filename[..dot],
            None => filename,
        };

        self.last_save = format!("{}{}", stem, suffix_for_usage(FileUsage::SAVED_GAME));
        self.last_script = format!("{}{}", stem, suffix_for_usage(FileUsage::TRANSCRIPT));
        self.last_data = format!("{}{}", stem, suffix_for_usage(FileUsage::DATA));
        log::debug!(
            "base file {}: working dir {}, stem {}",
            path,
            self.working_dir,
            stem
        );
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
