use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Deepest nesting level the tree builder will honour.
pub const MAX_LEVEL: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub level: usize,
    pub page: u32,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub enum FitMode {
    #[default]
    Fit,
}

impl FitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "Fit",
        }
    }
}

/// Page target of a bookmark, persisted as `[page, "Fit"]`.
///
/// Reading only looks at the first element: any other fit tag, extra
/// coordinates or a missing tag are accepted, and a `dest` that is not a
/// non-empty array means page 1.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(into = "(u32, FitMode)")]
pub struct Destination {
    pub page: u32,
    pub fit: FitMode,
}

impl Destination {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            fit: FitMode::Fit,
        }
    }

    fn from_value(value: &Value) -> Self {
        let page = value
            .as_array()
            .and_then(|items| items.first())
            .and_then(page_number)
            .unwrap_or(1);
        Self::page(page)
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::page(1)
    }
}

impl From<Destination> for (u32, FitMode) {
    fn from(dest: Destination) -> Self {
        (dest.page, dest.fit)
    }
}

impl<'de> Deserialize<'de> for Destination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

// Out-of-range pages saturate here and are clamped against the PDF later.
fn page_number(value: &Value) -> Option<u32> {
    if let Some(page) = value.as_u64() {
        return Some(u32::try_from(page).unwrap_or(u32::MAX));
    }
    if value.as_i64().is_some() {
        return Some(0);
    }
    value.as_f64().map(|page| page as u32)
}

/// RGB channels kept as written: integers from our own output, floats in
/// `0.0..=1.0` from PDF tooling. Non-numeric channels read as 0.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Color {
    #[serde(rename = "0", default = "zero", deserialize_with = "lenient_channel")]
    pub red: Number,
    #[serde(rename = "1", default = "zero", deserialize_with = "lenient_channel")]
    pub green: Number,
    #[serde(rename = "2", default = "zero", deserialize_with = "lenient_channel")]
    pub blue: Number,
}

impl Default for Color {
    fn default() -> Self {
        Self {
            red: zero(),
            green: zero(),
            blue: zero(),
        }
    }
}

fn zero() -> Number {
    Number::from(0)
}

fn lenient_channel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Number, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(number) => Ok(number),
        _ => Ok(zero()),
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookmarkStyle {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(rename = "dest", default)]
    pub destination: Destination,
    #[serde(flatten)]
    pub style: BookmarkStyle,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    pub fn from_entry(entry: &TocEntry) -> Self {
        Self {
            title: entry.title.clone(),
            destination: Destination::page(entry.page),
            style: BookmarkStyle::default(),
            children: Vec::new(),
        }
    }
}

fn untitled() -> String {
    "Untitled".to_string()
}

/// One row of a pre-order outline, serialized as `[depth, title, page]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineItem(pub usize, pub String, pub u32);

impl OutlineItem {
    pub fn depth(&self) -> usize {
        self.0
    }

    pub fn title(&self) -> &str {
        &self.1
    }

    pub fn page(&self) -> u32 {
        self.2
    }
}
