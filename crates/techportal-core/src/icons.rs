//! Icon asset catalogue.
//!
//! The PNG files are produced by a separate rasterization step; this module
//! only knows their names and sizes so the manifest can reference them and a
//! deployment can be checked for completeness.

use std::path::Path;

use serde::Serialize;

use crate::domain::PortalKind;

/// Pixel sizes of the regular app icons.
pub const APP_ICON_SIZES: [u32; 8] = [72, 96, 128, 144, 152, 192, 384, 512];

/// Pixel sizes of the maskable icons (with safe-zone padding).
pub const MASKABLE_ICON_SIZES: [u32; 2] = [192, 512];

/// Pixel size of the two shortcut icons.
pub const SHORTCUT_ICON_SIZE: u32 = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconPurpose {
    Any,
    Maskable,
    Shortcut(PortalKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconAsset {
    pub file_name: String,
    pub size: u32,
    pub purpose: IconPurpose,
}

/// One entry of the manifest's `icons` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub purpose: String,
}

impl IconAsset {
    /// Every file the manifest references, in generation order.
    pub fn all() -> Vec<IconAsset> {
        let regular = APP_ICON_SIZES.iter().map(|&size| IconAsset {
            file_name: format!("icon-{size}.png"),
            size,
            purpose: IconPurpose::Any,
        });
        let maskable = MASKABLE_ICON_SIZES.iter().map(|&size| IconAsset {
            file_name: format!("icon-maskable-{size}.png"),
            size,
            purpose: IconPurpose::Maskable,
        });
        let shortcuts = [PortalKind::Kasys, PortalKind::Telekom]
            .into_iter()
            .map(|kind| IconAsset {
                file_name: format!("{}-shortcut.png", kind.css_class()),
                size: SHORTCUT_ICON_SIZE,
                purpose: IconPurpose::Shortcut(kind),
            });
        regular.chain(maskable).chain(shortcuts).collect()
    }

    /// Manifest entry with `src` relative to `base` (e.g. `icons/`).
    ///
    /// Shortcut icons belong to the manifest's `shortcuts` section and get `any`.
    pub fn manifest_entry(&self, base: &str) -> ManifestIcon {
        let purpose = match self.purpose {
            IconPurpose::Maskable => "maskable",
            IconPurpose::Any | IconPurpose::Shortcut(_) => "any",
        };
        ManifestIcon {
            src: format!("{base}{}", self.file_name),
            sizes: format!("{0}x{0}", self.size),
            mime_type: "image/png".to_string(),
            purpose: purpose.to_string(),
        }
    }
}

/// The manifest `icons` array (app and maskable icons, no shortcuts).
pub fn manifest_icons(base: &str) -> Vec<ManifestIcon> {
    IconAsset::all()
        .iter()
        .filter(|asset| !matches!(asset.purpose, IconPurpose::Shortcut(_)))
        .map(|asset| asset.manifest_entry(base))
        .collect()
}

/// Assets that are not present as files in `dir`.
pub fn missing_in(dir: &Path) -> Vec<IconAsset> {
    IconAsset::all()
        .into_iter()
        .filter(|asset| !dir.join(&asset.file_name).is_file())
        .collect()
}
