//! ファイル参照モジュール
//!
//! stdio環境でのファイル参照の実装：
//! - ファイル参照はパス名、テキスト/バイナリの区別、用途種別を持つ
//! - ハンドルは世代番号付きのインデックスで、解放後の使用を検出できる
//! - 生成順に新しいものから列挙する

pub mod creation;
pub mod query;
pub mod registry;
pub mod sanitize;
pub mod tracker;

pub use registry::{FilerefRegistry, Iter};
pub use sanitize::{sanitize_filename, suffix_for_usage};
pub use tracker::{DispatchRock, NullTracker, ObjectClass, ObjectTracker};

/// 呼び出し側が割り当てる不透明な値
pub type Rock = u32;

/// 用途フラグ（種別ビットとテキストモードビット）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileUsage(u32);

impl FileUsage {
    pub const DATA: FileUsage = FileUsage(0x00);
    pub const SAVED_GAME: FileUsage = FileUsage(0x01);
    pub const TRANSCRIPT: FileUsage = FileUsage(0x02);
    pub const INPUT_RECORD: FileUsage = FileUsage(0x03);
    pub const TYPE_MASK: u32 = 0x0f;
    pub const TEXT_MODE: u32 = 0x100;
    pub const BINARY_MODE: u32 = 0x000;

    pub const fn from_bits(bits: u32) -> Self {
        FileUsage(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// テキストモードを付与
    pub const fn text(self) -> Self {
        FileUsage(self.0 | Self::TEXT_MODE)
    }

    pub const fn is_text_mode(self) -> bool {
        self.0 & Self::TEXT_MODE != 0
    }

    pub fn file_type(self) -> FileType {
        FileType::from_bits(self.0 & Self::TYPE_MASK)
    }
}

impl From<u32> for FileUsage {
    fn from(bits: u32) -> Self {
        FileUsage(bits)
    }
}

impl From<FileType> for FileUsage {
    fn from(file_type: FileType) -> Self {
        FileUsage(file_type.bits())
    }
}

/// 用途種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Data,
    SavedGame,
    Transcript,
    InputRecord,
    /// 未定義の種別ビット
    Other(u32),
}

impl FileType {
    pub fn from_bits(bits: u32) -> Self {
        match bits & FileUsage::TYPE_MASK {
            0x00 => FileType::Data,
            0x01 => FileType::SavedGame,
            0x02 => FileType::Transcript,
            0x03 => FileType::InputRecord,
            other => FileType::Other(other),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            FileType::Data => 0x00,
            FileType::SavedGame => 0x01,
            FileType::Transcript => 0x02,
            FileType::InputRecord => 0x03,
            FileType::Other(bits) => bits & FileUsage::TYPE_MASK,
        }
    }
}

/// ファイルを開くモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileMode {
    Write,
    Read,
    ReadWrite,
    WriteAppend,
}

impl FileMode {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0x01 => Some(FileMode::Write),
            0x02 => Some(FileMode::Read),
            0x03 => Some(FileMode::ReadWrite),
            0x05 => Some(FileMode::WriteAppend),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            FileMode::Write => 0x01,
            FileMode::Read => 0x02,
            FileMode::ReadWrite => 0x03,
            FileMode::WriteAppend => 0x05,
        }
    }
}

/// ファイル参照ハンドル
///
/// スロット番号と世代番号の組。削除されたハンドルは世代が一致しなくなる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrefId {
    index: u32,
    generation: u32,
}

impl FrefId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

/// ファイル参照の内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: String,
    text_mode: bool,
    file_type: FileType,
    rock: Rock,
    disprock: DispatchRock,
}

impl FileRef {
    pub(crate) fn new(path: String, usage: FileUsage, rock: Rock) -> Self {
        Self {
            path,
            text_mode: usage.is_text_mode(),
            file_type: usage.file_type(),
            rock,
            disprock: DispatchRock::default(),
        }
    }

    /// このハンドルが指すパス
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text_mode(&self) -> bool {
        self.text_mode
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn rock(&self) -> Rock {
        self.rock
    }

    /// 外部トラッカーが登録時に返した値
    pub fn disprock(&self) -> DispatchRock {
        self.disprock
    }

    pub(crate) fn set_disprock(&mut self, disprock: DispatchRock) {
        self.disprock = disprock;
    }
}
