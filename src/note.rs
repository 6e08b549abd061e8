use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const WELCOME_TITLE: &str = "This is your first note!";
pub const WELCOME_BODY: &str = "Type your text here!";
pub const UNTITLED: &str = "Untitled";

pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 72;

pub type NoteId = String;

/// Typefaces offered by the font picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FontFamily {
    #[default]
    Arial,
    TimesNewRoman,
    CourierNew,
    Georgia,
}

impl FontFamily {
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::Arial,
            FontFamily::TimesNewRoman,
            FontFamily::CourierNew,
            FontFamily::Georgia,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
            FontFamily::Georgia => "Georgia",
        }
    }

    /// Unknown names fall back to the default typeface. Quoted names, as CSS
    /// writes multi-word families, match their unquoted form.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        Self::all()
            .iter()
            .copied()
            .find(|family| family.name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    pub fn previous(&self) -> Self {
        let all = Self::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for FontFamily {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<FontFamily> for String {
    fn from(family: FontFamily) -> Self {
        family.name().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default = "default_font_size", deserialize_with = "lenient_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub last_modified: i64,
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

/// Any number is truncated to an integer size. Values that cannot be a size
/// (negative, fractional overflow, non-numeric) read as the default, so one
/// odd record never rejects the whole collection.
fn lenient_font_size<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let size = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches("px").trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(size
        .filter(|s| s.is_finite() && *s >= 0.0 && *s <= u32::MAX as f64)
        .map(|s| s.trunc() as u32)
        .unwrap_or(DEFAULT_FONT_SIZE))
}

impl Note {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            font_family: FontFamily::default(),
            font_size: DEFAULT_FONT_SIZE,
            last_modified: now_millis(),
        }
    }

    pub fn welcome() -> Self {
        Self::new(WELCOME_TITLE, WELCOME_BODY)
    }

    pub fn untitled() -> Self {
        Self::new(UNTITLED, "")
    }

    /// Copy of this note with a refreshed modification time.
    pub fn touched(&self) -> Self {
        Self {
            last_modified: now_millis(),
            ..self.clone()
        }
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
