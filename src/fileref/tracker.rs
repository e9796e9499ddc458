//! 外部オブジェクトトラッカー
//!
//! シリアライズ用の登録機構へ、ハンドルの生成と破棄を通知する。

use super::FrefId;

/// トラッカーが登録時に返す不透明な値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DispatchRock(pub u64);

/// 登録対象のオブジェクト種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Window,
    Stream,
    Fileref,
    SoundChannel,
}

impl ObjectClass {
    /// ディスパッチ層で使われるクラス番号
    pub fn class_id(self) -> u32 {
        match self {
            ObjectClass::Window => 0,
            ObjectClass::Stream => 1,
            ObjectClass::Fileref => 2,
            ObjectClass::SoundChannel => 3,
        }
    }
}

/// ハンドルの生成・破棄を受け取るトラッカー
pub trait ObjectTracker {
    /// 生成されたハンドルを登録し、追跡用の値を返す
    fn register(&mut self, fref: FrefId, class: ObjectClass) -> DispatchRock;

    /// 破棄直前のハンドルの登録を解除する
    fn unregister(&mut self, fref: FrefId, class: ObjectClass, disprock: DispatchRock);
}

/// トラッカー未設定時の既定実装
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTracker;

impl ObjectTracker for NullTracker {
    fn register(&mut self, _fref: FrefId, _class: ObjectClass) -> DispatchRock {
        DispatchRock::default()
    }

    fn unregister(&mut self, _fref: FrefId, _class: ObjectClass, _disprock: DispatchRock) {}
}
