//! ファイルの存在確認と削除

use super::registry::FilerefRegistry;
use super::FrefId;
use std::path::Path;

/// 通常ファイルとして存在するか
pub(crate) fn is_regular_file(path: &str) -> bool {
    std::fs::metadata(Path::new(path))
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

impl FilerefRegistry {
    /// ハンドルのパスに通常ファイルが存在するか
    ///
    /// ディレクトリなど通常ファイル以外や、stat の失敗は `false`。
    ///
    /// # Examples
    /// ```
    /// use glkfref::fileref::{FilerefRegistry, FileUsage};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let path = dir.path().join("sample.glkdata");
    /// let mut registry = FilerefRegistry::new();
    /// let fref = registry
    ///     .create(path.to_str().unwrap(), FileUsage::DATA, 0)
    ///     .unwrap();
    ///
    /// std::fs::write(&path, "hello").unwrap();
    /// assert!(registry.does_file_exist(fref));
    /// registry.delete_file(fref);
    /// assert!(!registry.does_file_exist(fref));
    /// ```
    pub fn does_file_exist(&mut self, fref: impl Into<Option<FrefId>>) -> bool {
        let Some(index) = self.resolve_or_warn(fref.into(), "fileref_does_file_exist") else {
            return false;
        };
        self.path_at(index).is_some_and(is_regular_file)
    }

    /// ハンドルのパスのファイルを削除（結果は報告しない）
    pub fn delete_file(&mut self, fref: impl Into<Option<FrefId>>) {
        let Some(index) = self.resolve_or_warn(fref.into(), "fileref_delete_file") else {
            return;
        };
        if let Some(path) = self.path_at(index) {
            if let Err(err) = std::fs::remove_file(path) {
                log::debug!("fileref_delete_file: {}: {}", path, err);
            }
        }
    }
}
