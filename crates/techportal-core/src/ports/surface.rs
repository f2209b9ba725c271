//! UiSurface port - 表示面（DOM）への操作
//!
//! 要素が存在しないことはエラーではありません。`set_visible` は false を返すだけで、
//! 呼び出し側はそれを no-op として扱います。

use async_trait::async_trait;

use crate::domain::UiElement;

/// UiSurface は UI 要素の表示切り替えとブラウザ標準のダイアログ
#[async_trait(?Send)]
pub trait UiSurface {
    /// 要素の `visible` 状態を切り替える。要素が無ければ false。
    fn set_visible(&self, element: UiElement, visible: bool) -> bool;

    /// 確認ダイアログ。承諾されたら true。
    async fn confirm(&self, message: &str) -> bool;

    /// クライアント全体を再読み込みする
    fn reload(&self);
}
