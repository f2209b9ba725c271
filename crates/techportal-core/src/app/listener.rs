//! EventListener - サブ機能の共通インターフェース
//!
//! 各サブ機能は自分の Lane のイベントだけを受け取り、1 件ずつ最後まで処理します。
//! 同じリスナーが自分自身と並行して走ることはありません（`&mut self`）。

use async_trait::async_trait;

use crate::domain::{Lane, PlatformEvent, Result};

#[async_trait(?Send)]
pub trait EventListener {
    /// このリスナーが担当する Lane
    fn lane(&self) -> Lane;

    /// 1 件のイベントを処理する。他の Lane のイベントは無視してよい。
    async fn on_event(&mut self, event: PlatformEvent) -> Result<()>;
}
