use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Rgba8;
use crate::foundation::error::LayoutError;

/// A style value for a run of words: one fixed value, or a set of candidates.
///
/// In JSON a bare value is [`StyleOption::Single`]; an object is a [`StyleSet`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleOption<T> {
    /// The same value for every word.
    Single(T),
    /// Ordered candidates plus per-word overrides.
    Set(StyleSet<T>),
}

/// Ordered candidate values for one style property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleSet<T> {
    /// Candidates; word 0 always receives `options[0]`.
    pub options: Vec<T>,
    /// Keep `options[0]` for every word instead of cycling.
    #[serde(default)]
    pub first_is_default: bool,
    /// Sentinel keyword that stands for one of the options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<StyleMarker>,
    /// Literal per-word values keyed by word index; these may be the marker keyword.
    ///
    /// JSON object keys are strings, so indices are written as `"3"`.
    #[serde(
        default = "BTreeMap::new",
        skip_serializing_if = "BTreeMap::is_empty",
        with = "index_keys"
    )]
    pub overrides: BTreeMap<usize, T>,
}

mod index_keys {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S, T>(map: &BTreeMap<usize, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        map.iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<usize, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        BTreeMap::<String, T>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| {
                k.trim().parse::<usize>().map(|i| (i, v)).map_err(|_| {
                    serde::de::Error::custom(format!("override key '{k}' is not a word index"))
                })
            })
            .collect()
    }
}

/// Binds a sentinel keyword to `options[index]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleMarker {
    /// Keyword that is never a literal value.
    pub keyword: String,
    /// Index of the option the keyword resolves to.
    pub index: usize,
}

impl<T> From<T> for StyleOption<T> {
    fn from(value: T) -> Self {
        Self::Single(value)
    }
}

impl<T> StyleOption<T> {
    /// Candidate set with cycling enabled and no marker.
    pub fn set(options: Vec<T>) -> Self {
        Self::Set(StyleSet {
            options,
            first_is_default: false,
            marker: None,
            overrides: BTreeMap::new(),
        })
    }

    /// Candidate set where `options[0]` applies to every word without an override.
    pub fn first_default(options: Vec<T>) -> Self {
        Self::Set(StyleSet {
            options,
            first_is_default: true,
            marker: None,
            overrides: BTreeMap::new(),
        })
    }

    /// Set a literal value for word `index`. A single value is promoted to a one-option set.
    pub fn with_override(self, index: usize, value: T) -> Self {
        let mut set = self.into_set();
        set.overrides.insert(index, value);
        Self::Set(set)
    }

    /// Bind `keyword` to `options[index]`.
    pub fn with_marker(self, keyword: impl Into<String>, index: usize) -> Self {
        let mut set = self.into_set();
        set.marker = Some(StyleMarker {
            keyword: keyword.into(),
            index,
        });
        Self::Set(set)
    }

    fn into_set(self) -> StyleSet<T> {
        match self {
            Self::Single(v) => StyleSet {
                options: vec![v],
                first_is_default: true,
                marker: None,
                overrides: BTreeMap::new(),
            },
            Self::Set(s) => s,
        }
    }

    /// Marker bound to this option, if any.
    pub fn marker(&self) -> Option<&StyleMarker> {
        match self {
            Self::Single(_) => None,
            Self::Set(s) => s.marker.as_ref(),
        }
    }

    /// Value for word `index` before marker substitution.
    ///
    /// Overrides win; a single option applies everywhere; otherwise index 0 takes `options[0]`
    /// and later words cycle round-robin unless `first_is_default` pins them to `options[0]`.
    pub fn value_for(&self, index: usize) -> Option<&T> {
        match self {
            Self::Single(v) => Some(v),
            Self::Set(s) => {
                if let Some(v) = s.overrides.get(&index) {
                    return Some(v);
                }
                if s.options.is_empty() {
                    return None;
                }
                if s.first_is_default || s.options.len() == 1 {
                    return s.options.first();
                }
                s.options.get(index % s.options.len())
            }
        }
    }

    pub(crate) fn check(&self, option: &'static str) -> Result<(), LayoutError> {
        let Self::Set(s) = self else {
            return Ok(());
        };
        if s.options.is_empty() {
            return Err(LayoutError::InvalidStyle {
                option,
                reason: "option set must not be empty".to_string(),
            });
        }
        if let Some(m) = &s.marker
            && m.index >= s.options.len()
        {
            return Err(LayoutError::InvalidStyle {
                option,
                reason: format!(
                    "marker '{}' points at option {} but only {} exist",
                    m.keyword,
                    m.index,
                    s.options.len()
                ),
            });
        }
        Ok(())
    }
}

impl StyleOption<String> {
    /// Value for word `index` with the marker keyword replaced by the option it stands for.
    pub fn resolve_marked(&self, index: usize) -> Option<&String> {
        let value = self.value_for(index)?;
        match (self, self.marker()) {
            (Self::Set(s), Some(m)) if *value == m.keyword => s.options.get(m.index),
            _ => Some(value),
        }
    }
}

/// The four style configurations applied to a word list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StyleConfig {
    /// Font size in pixels.
    pub size: StyleOption<f32>,
    /// Fill color.
    pub color: StyleOption<Rgba8>,
    /// Font family; the only option that may carry a marker.
    pub family: StyleOption<String>,
    /// Gap in pixels added after a word (`right`) or below a line (`newline`).
    pub padding: StyleOption<f64>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            size: StyleOption::Single(32.0),
            color: StyleOption::Single(Rgba8::BLACK),
            family: StyleOption::Single("sans-serif".to_string()),
            padding: StyleOption::Single(8.0),
        }
    }
}

impl StyleConfig {
    pub(crate) fn check(&self) -> Result<(), LayoutError> {
        self.size.check("size")?;
        self.color.check("color")?;
        self.family.check("family")?;
        self.padding.check("padding")?;
        for (option, has_marker) in [
            ("size", self.size.marker().is_some()),
            ("color", self.color.marker().is_some()),
            ("padding", self.padding.marker().is_some()),
        ] {
            if has_marker {
                return Err(LayoutError::InvalidStyle {
                    option,
                    reason: "marker keywords only apply to font families".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Font family plus pixel size, the unit text is shaped and measured with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Family name as configured.
    pub family: String,
    /// Size in pixels.
    pub size_px: f32,
}

impl FontSpec {
    /// Build a font spec.
    pub fn new(family: impl Into<String>, size_px: f32) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

impl std::fmt::Display for FontSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// Where a word goes relative to the previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementDirective {
    /// Explicit top-left anchor; only valid for the first word.
    Absolute {
        /// Left edge in pixels.
        x: f64,
        /// Baseline in pixels.
        y: f64,
    },
    /// Same line, after the previous word plus padding.
    Right,
    /// New line at the left margin, one line height plus padding below the previous line.
    Newline,
}

impl PlacementDirective {
    /// Short token used in errors and JSON.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Absolute { .. } => "absolute",
            Self::Right => "right",
            Self::Newline => "newline",
        }
    }
}

impl Serialize for PlacementDirective {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Absolute { x, y } => [*x, *y].serialize(serializer),
            Self::Right | Self::Newline => serializer.serialize_str(self.token()),
        }
    }
}

impl<'de> Deserialize<'de> for PlacementDirective {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Coords([f64; 2]),
            Token(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Coords([x, y]) => Ok(Self::Absolute { x, y }),
            Repr::Token(t) => match t.as_str() {
                "right" => Ok(Self::Right),
                "newline" => Ok(Self::Newline),
                other => Err(serde::de::Error::custom(format!(
                    "unknown placement directive '{other}' (expected [x, y], \"right\" or \"newline\")"
                ))),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/style.rs"]
mod tests;
