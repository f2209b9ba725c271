//! PortalKind - ポータルリンクの分類
//!
//! ポータルカードは CSS クラスで 2 種類に分類されます。
//! `kasys` クラスを持つカードは KASYS、それ以外はすべて Telekom として扱います。

use serde::{Deserialize, Serialize};
use std::fmt;

/// PortalKind はポータルカードのカテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortalKind {
    Kasys,
    Telekom,
}

impl PortalKind {
    /// 永続化される表示ラベル
    pub fn label(self) -> &'static str {
        match self {
            PortalKind::Kasys => "KASYS",
            PortalKind::Telekom => "Telekom",
        }
    }

    /// カードに付与される CSS クラス名
    pub fn css_class(self) -> &'static str {
        match self {
            PortalKind::Kasys => "kasys",
            PortalKind::Telekom => "telekom",
        }
    }

    /// ラベルから逆引き
    pub fn from_label(label: &str) -> Option<Self> {
        [PortalKind::Kasys, PortalKind::Telekom]
            .into_iter()
            .find(|kind| kind.label() == label)
    }

    /// カードのクラス一覧からカテゴリを解決
    ///
    /// Telekom がフォールバック（`kasys` が無ければ Telekom）。
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let is_kasys = classes
            .into_iter()
            .any(|class| class.as_ref() == PortalKind::Kasys.css_class());
        if is_kasys {
            PortalKind::Kasys
        } else {
            PortalKind::Telekom
        }
    }
}

impl fmt::Display for PortalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
