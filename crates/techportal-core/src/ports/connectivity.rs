//! Connectivity port - オンライン/オフラインの現在値

/// Connectivity は接続状態を読むだけの機能（失敗しない）
pub trait Connectivity {
    fn is_online(&self) -> bool;
}
