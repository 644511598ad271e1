//! Heading outlines.

/// Text of an outline entry.
///
/// A heading that is nothing but a link to another document
/// (`## [Install](install.md)`) carries that document as an explicit target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Title {
    Text(String),
    Link { title: String, target: String },
}

impl Title {
    /// Display text.
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Link { title: text, .. } => text,
        }
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// One heading and the headings nested under it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleEntry {
    pub title: Title,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<TitleEntry>,
}

impl TitleEntry {
    /// Entry without children.
    pub fn leaf(title: impl Into<Title>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Entry with children.
    pub fn new(title: impl Into<Title>, children: Vec<TitleEntry>) -> Self {
        Self {
            title: title.into(),
            children,
        }
    }
}

/// Nest a flat `(level, title)` heading list.
///
/// Each heading owns the headings that follow it until the next one at the
/// same or a shallower level.
pub(crate) fn nest(headings: &[(u8, Title)]) -> Vec<TitleEntry> {
    let mut entries = Vec::new();
    let mut i = 0;

    while let Some((level, title)) = headings.get(i) {
        let end = headings[i + 1..]
            .iter()
            .position(|(l, _)| l <= level)
            .map_or(headings.len(), |offset| i + 1 + offset);

        entries.push(TitleEntry::new(title.clone(), nest(&headings[i + 1..end])));
        i = end;
    }

    entries
}
