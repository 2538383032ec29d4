use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::decode::{LoadedImage, load_image};
use crate::assets::fonts::FontBook;
use crate::foundation::color::Rgba8;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{BillboardError, BillboardResult};
use crate::render::SceneMode;
use crate::text::customization::TextCustomization;
use crate::text::presets::presentation_title;

/// Built-in text blocks selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPreset {
    /// [`presentation_title`].
    PresentationTitle,
}

/// Where the text block comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextSource {
    /// `{ "preset": "presentation_title" }`
    Preset {
        /// Preset name.
        preset: TextPreset,
    },
    /// An inline customization.
    Custom(TextCustomization),
}

impl TextSource {
    /// The customization this source describes.
    pub fn customization(&self) -> TextCustomization {
        match self {
            Self::Preset {
                preset: TextPreset::PresentationTitle,
            } => presentation_title(),
            Self::Custom(t) => t.clone(),
        }
    }
}

fn default_fps() -> Fps {
    Fps { num: 144, den: 1 }
}

fn default_step_px() -> f64 {
    4.0
}

/// Everything needed to play one banner.
///
/// Relative paths (`image`, `fonts`) resolve against the directory of the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannerConfig {
    /// Surface size.
    pub canvas: Canvas,
    /// Target repaint rate.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Scene to play.
    #[serde(default)]
    pub mode: SceneMode,
    /// Bitmap (raster or SVG) that scrolls in.
    pub image: String,
    /// Scroll offset added per update, in pixels.
    #[serde(default = "default_step_px")]
    pub step_px: f64,
    /// Font files by the family name styles refer to.
    #[serde(default)]
    pub fonts: BTreeMap<String, String>,
    /// Family used for names missing from `fonts`.
    #[serde(default)]
    pub fallback_family: Option<String>,
    /// Text block for [`SceneMode::Text`]; defaults to the presentation title.
    #[serde(default)]
    pub text: Option<TextSource>,
    /// Opaque color output frames are flattened onto.
    #[serde(default)]
    pub background: Option<Rgba8>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl BannerConfig {
    /// Parse from a JSON reader; relative paths resolve against the working directory.
    pub fn from_reader<R: std::io::Read>(r: R) -> BillboardResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BillboardError::serde(format!("parse banner JSON: {e}")))
    }

    /// Parse a JSON file; relative paths resolve against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> BillboardResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BillboardError::validation(format!("open banner JSON '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        cfg.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(cfg)
    }

    /// Directory relative paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Override the directory relative paths resolve against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Check invariants that do not need any file.
    pub fn validate(&self) -> BillboardResult<()> {
        self.canvas.validate()?;
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.step_px.is_finite() || self.step_px <= 0.0 {
            return Err(BillboardError::validation("step_px must be finite and > 0"));
        }
        validate_rel_source(&self.image, "image")?;
        for (family, source) in &self.fonts {
            if family.trim().is_empty() {
                return Err(BillboardError::validation("font family names must be non-empty"));
            }
            validate_rel_source(source, &format!("fonts.{family}"))?;
        }
        if let Some(fallback) = &self.fallback_family
            && !self.fonts.contains_key(fallback)
        {
            return Err(BillboardError::validation(format!(
                "fallback_family '{fallback}' is not listed in fonts"
            )));
        }
        if let Some(text) = self.text_customization() {
            text.validate()?;
        }
        Ok(())
    }

    /// `rel` joined onto [`Self::base_dir`].
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.base_dir.join(rel)
    }

    /// Text block to lay out, if any; text mode without one plays [`presentation_title`].
    pub fn text_customization(&self) -> Option<TextCustomization> {
        match (&self.text, self.mode) {
            (Some(text), _) => Some(text.customization()),
            (None, SceneMode::Text) => Some(presentation_title()),
            (None, SceneMode::Image) => None,
        }
    }

    /// Load every configured font.
    pub fn load_fonts(&self) -> BillboardResult<FontBook> {
        let mut book = FontBook::new();
        for (family, source) in &self.fonts {
            book.load(family.clone(), &self.resolve(source))?;
        }
        if let Some(fallback) = &self.fallback_family {
            book.set_fallback(fallback.clone())?;
        }
        Ok(book)
    }

    /// Load the bitmap, rasterizing SVGs at the canvas height.
    pub fn load_image(&self) -> BillboardResult<LoadedImage> {
        load_image(&self.resolve(&self.image), Some(self.canvas.height))
    }
}

fn validate_rel_source(source: &str, field: &str) -> BillboardResult<()> {
    if source.trim().is_empty() {
        return Err(BillboardError::validation(format!(
            "{field} must be non-empty"
        )));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BillboardError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(BillboardError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/banner.rs"]
mod tests;
