//! ファイル参照レジストリ
//!
//! 生存中のハンドルをスロット配列で所有する。
//! 各スロットは世代番号を持ち、削除時に世代を進めることで古いハンドルを無効化する。
//! 列挙順は生成の新しい順で、スロット間の双方向リンクで保持する。

use super::tracker::{NullTracker, ObjectClass, ObjectTracker};
use super::{FileRef, FileUsage, FrefId, Rock};
use crate::error::{FrefError, Result};
use crate::logging::StrictWarnings;

struct Entry {
    fref: FileRef,
    /// より新しいハンドル
    prev: Option<usize>,
    /// より古いハンドル
    next: Option<usize>,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// 生存中のファイル参照の集合
pub struct FilerefRegistry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
    tracker: Box<dyn ObjectTracker>,
    warnings: StrictWarnings,
}

impl FilerefRegistry {
    /// トラッカーなしでレジストリを作成
    pub fn new() -> Self {
        Self::with_tracker(Box::new(NullTracker))
    }

    /// トラッカー付きでレジストリを作成
    pub fn with_tracker(tracker: Box<dyn ObjectTracker>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            len: 0,
            tracker,
            warnings: StrictWarnings::new(),
        }
    }

    /// トラッカーを差し替える
    ///
    /// 既に生存しているハンドルは新しいトラッカーへ新しい順に登録し直す。
    pub fn set_tracker(&mut self, tracker: Box<dyn ObjectTracker>) {
        self.tracker = tracker;

        let mut cursor = self.head;
        while let Some(index) = cursor {
            let id = self.id_at(index);
            let disprock = self.tracker.register(id, ObjectClass::Fileref);
            let Some(entry) = self.slots[index].entry.as_mut() else {
                break;
            };
            entry.fref.set_disprock(disprock);
            cursor = entry.next;
        }
    }

    /// ハンドルを生成して先頭に追加
    ///
    /// メモリ確保に失敗した場合は何も登録せずに `OutOfMemory` を返す。
    pub fn create(&mut self, path: &str, usage: FileUsage, rock: Rock) -> Result<FrefId> {
        let mut owned = String::new();
        owned.try_reserve_exact(path.len())?;
        owned.push_str(path);

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                u32::try_from(index).map_err(|_| FrefError::OutOfMemory)?;
                self.slots.try_reserve(1)?;
                self.slots.push(Slot {
                    generation: 0,
                    entry: None,
                });
                index
            }
        };

        let next = self.head;
        if let Some(old_head) = next.and_then(|i| self.slots[i].entry.as_mut()) {
            old_head.prev = Some(index);
        }
        self.slots[index].entry = Some(Entry {
            fref: FileRef::new(owned, usage, rock),
            prev: None,
            next,
        });
        self.head = Some(index);
        self.len += 1;

        let id = self.id_at(index);
        let disprock = self.tracker.register(id, ObjectClass::Fileref);
        if let Some(entry) = self.slots[index].entry.as_mut() {
            entry.fref.set_disprock(disprock);
        }

        log::debug!("fileref created: {:?} -> {}", id, path);
        Ok(id)
    }

    /// ハンドルを破棄
    ///
    /// 無効なハンドルの場合は警告を記録して何もしない。
    pub fn destroy(&mut self, fref: impl Into<Option<FrefId>>) {
        let Some(index) = self.resolve_or_warn(fref.into(), "fileref_destroy") else {
            return;
        };
        self.delete(index);
    }

    fn delete(&mut self, index: usize) {
        let id = self.id_at(index);
        if let Some(entry) = self.slots[index].entry.as_ref() {
            let disprock = entry.fref.disprock();
            self.tracker.unregister(id, ObjectClass::Fileref, disprock);
        }

        let slot = &mut self.slots[index];
        let Some(entry) = slot.entry.take() else {
            return;
        };
        let retired = slot.generation == u32::MAX;
        slot.generation = slot.generation.wrapping_add(1);

        match entry.prev {
            Some(prev) => {
                if let Some(prev_entry) = self.slots[prev].entry.as_mut() {
                    prev_entry.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }
        if let Some(next_entry) = entry.next.and_then(|i| self.slots[i].entry.as_mut()) {
            next_entry.prev = entry.prev;
        }

        // 世代が一周したスロットは再利用しない
        if !retired {
            self.free.push(index);
        }
        self.len -= 1;
        log::debug!("fileref destroyed: {:?} -> {}", id, entry.fref.path());
    }

    /// 列挙カーソル
    ///
    /// `None` から始めると最も新しいハンドルを返し、以降は渡したハンドルの次
    /// （より古いもの）を返す。末尾を過ぎると `None`。
    pub fn iterate(&mut self, cursor: Option<FrefId>) -> Option<(FrefId, Rock)> {
        let next = match cursor {
            None => self.head,
            Some(id) => {
                let index = self.resolve_or_warn(Some(id), "fileref_iterate")?;
                self.slots[index].entry.as_ref().and_then(|entry| entry.next)
            }
        };

        next.and_then(|index| {
            let entry = self.slots[index].entry.as_ref()?;
            Some((self.id_at(index), entry.fref.rock()))
        })
    }

    /// 新しい順の反復子
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            registry: self,
            next: self.head,
        }
    }

    /// ハンドルのロック値を取得（無効なハンドルは 0）
    pub fn get_rock(&mut self, fref: impl Into<Option<FrefId>>) -> Rock {
        match self.resolve_or_warn(fref.into(), "fileref_get_rock") {
            Some(index) => self.slots[index]
                .entry
                .as_ref()
                .map_or(0, |entry| entry.fref.rock()),
            None => 0,
        }
    }

    /// 生存中のハンドルの内容を取得
    pub fn get(&self, fref: FrefId) -> Option<&FileRef> {
        self.resolve(fref)
            .and_then(|index| self.slots[index].entry.as_ref())
            .map(|entry| &entry.fref)
    }

    /// ハンドルが生存中かどうか
    pub fn is_valid(&self, fref: FrefId) -> bool {
        self.resolve(fref).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 記録された厳格警告
    pub fn warnings(&self) -> &StrictWarnings {
        &self.warnings
    }

    /// 記録された厳格警告を取り出す
    pub fn take_warnings(&mut self) -> Vec<String> {
        self.warnings.take()
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.warnings.warn(message);
    }

    /// 無効なハンドルなら警告を記録して `None`
    pub(crate) fn resolve_or_warn(
        &mut self,
        fref: Option<FrefId>,
        operation: &'static str,
    ) -> Option<usize> {
        let index = fref.and_then(|id| self.resolve(id));
        if index.is_none() {
            self.warn(FrefError::InvalidHandle { operation }.to_string());
        }
        index
    }

    pub(crate) fn path_at(&self, index: usize) -> Option<&str> {
        self.slots
            .get(index)
            .and_then(|slot| slot.entry.as_ref())
            .map(|entry| entry.fref.path())
    }

    fn resolve(&self, fref: FrefId) -> Option<usize> {
        let slot = self.slots.get(fref.index())?;
        if slot.generation == fref.generation() && slot.entry.is_some() {
            Some(fref.index())
        } else {
            None
        }
    }

    fn id_at(&self, index: usize) -> FrefId {
        FrefId::new(index as u32, self.slots[index].generation)
    }
}

impl Default for FilerefRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 生成の新しい順にハンドルを辿る反復子
pub struct Iter<'a> {
    registry: &'a FilerefRegistry,
    next: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (FrefId, &'a FileRef);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let entry = self.registry.slots[index].entry.as_ref()?;
        self.next = entry.next;
        Some((self.registry.id_at(index), &entry.fref))
    }
}
