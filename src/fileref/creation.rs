//! ファイル参照の生成
//!
//! 一時ファイル名・既存ハンドルの複製・名前指定による生成。
//! 対話的な生成は `prompt` モジュールにある。

use super::registry::FilerefRegistry;
use super::sanitize::sanitize_filename;
use super::{FileUsage, FrefId, Rock};
use crate::error::{FrefError, Result};
use crate::session::Session;

impl FilerefRegistry {
    /// 一時ファイル名でハンドルを生成
    ///
    /// 名前はシステムの一時ディレクトリで一意に作ったファイルを即座に削除して得る。
    /// Unix の一時ファイル命名を前提にしており、名前の予約はしない。
    pub fn create_temp(&mut self, usage: FileUsage, rock: Rock) -> Result<FrefId> {
        let filename = match unique_temp_name() {
            Ok(filename) => filename,
            Err(err) => {
                self.warn(format!("fileref_create_temp: {}", err));
                return Err(err);
            }
        };
        self.create_or_warn(&filename, usage, rock, "fileref_create_temp")
    }

    /// 既存ハンドルのパスを複製して新しいハンドルを生成
    pub fn create_from_fileref(
        &mut self,
        usage: FileUsage,
        source: impl Into<Option<FrefId>>,
        rock: Rock,
    ) -> Result<FrefId> {
        let operation = "fileref_create_from_fileref";
        let source = source.into();
        if self.resolve_or_warn(source, operation).is_none() {
            return Err(FrefError::InvalidHandle { operation });
        }
        let path = source
            .and_then(|id| self.get(id))
            .map(|fref| fref.path().to_string())
            .ok_or(FrefError::InvalidHandle { operation })?;
        self.create_or_warn(&path, usage, rock, operation)
    }

    /// ユーザー指定の名前を正規化してハンドルを生成
    ///
    /// # Examples
    /// ```
    /// use glkfref::fileref::{FilerefRegistry, FileUsage};
    /// use glkfref::session::Session;
    ///
    /// let session = Session::new();
    /// let mut registry = FilerefRegistry::new();
    /// let fref = registry
    ///     .create_by_name(&session, FileUsage::SAVED_GAME, "chapter:1", 0)
    ///     .unwrap();
    /// assert_eq!(registry.get(fref).unwrap().path(), "./chapter1.glksave");
    /// ```
    pub fn create_by_name(
        &mut self,
        session: &Session,
        usage: FileUsage,
        name: &str,
        rock: Rock,
    ) -> Result<FrefId> {
        let path = session.join(&sanitize_filename(name, usage));
        self.create_or_warn(&path, usage, rock, "fileref_create_by_name")
    }

    pub(crate) fn create_or_warn(
        &mut self,
        path: &str,
        usage: FileUsage,
        rock: Rock,
        operation: &str,
    ) -> Result<FrefId> {
        self.create(path, usage, rock).map_err(|err| {
            self.warn(format!("{}: unable to create fileref.", operation));
            err
        })
    }
}

fn unique_temp_name() -> Result<String> {
    let temp_error = |message: String| FrefError::TempName { message };

    let file = tempfile::Builder::new()
        .prefix("glk")
        .tempfile()
        .map_err(|e| temp_error(e.to_string()))?;
    let path = file.into_temp_path();
    let filename = path
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| temp_error(format!("non UTF-8 path {}", path.display())))?;
    path.close().map_err(|e| temp_error(e.to_string()))?;
    Ok(filename)
}
