//! Directive attribute parsing.
//!
//! Parses the `[content]{#id .class key=value flag}` part of a directive.

use std::collections::HashMap;

/// Content and attributes of a directive.
///
/// ```
/// use docs_markup::directive::DirectiveArgs;
///
/// let args = DirectiveArgs::parse("Contents", "maxdepth=3 hidden .wide");
/// assert_eq!(args.content, "Contents");
/// assert_eq!(args.get("maxdepth"), Some("3"));
/// assert!(args.has_flag("hidden"));
/// assert_eq!(args.classes, vec!["wide"]);
/// ```
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DirectiveArgs {
    /// Content from brackets (empty if absent).
    pub content: String,
    /// Id from `{#id}`.
    pub id: Option<String>,
    /// Classes from `{.a .b}`.
    pub classes: Vec<String>,
    /// `key=value` attributes.
    pub attrs: HashMap<String, String>,
    /// Bare words without a value, in order.
    pub flags: Vec<String>,
}

impl DirectiveArgs {
    /// Parse bracket content and the attribute string (without braces).
    #[must_use]
    pub fn parse(content: &str, attrs_str: &str) -> Self {
        let mut args = Self {
            content: content.to_owned(),
            ..Default::default()
        };

        let mut remaining = attrs_str.trim_start();
        while !remaining.is_empty() {
            if let Some(rest) = remaining.strip_prefix('#') {
                let (name, tail) = split_selector(rest);
                args.id = Some(name.to_owned());
                remaining = tail;
            } else if let Some(rest) = remaining.strip_prefix('.') {
                let (name, tail) = split_selector(rest);
                if !name.is_empty() {
                    args.classes.push(name.to_owned());
                }
                remaining = tail;
            } else {
                let key_end = remaining
                    .find(|c: char| c.is_whitespace() || c == '=')
                    .unwrap_or(remaining.len());
                let key = &remaining[..key_end];
                let after_key = &remaining[key_end..];

                if let Some(after_eq) = after_key.strip_prefix('=') {
                    let (value, tail) = split_value(after_eq);
                    if !key.is_empty() {
                        args.attrs.insert(key.to_owned(), value.to_owned());
                    }
                    remaining = tail;
                } else if key.is_empty() {
                    // Stray character; skip it.
                    let skip = remaining.chars().next().map_or(1, char::len_utf8);
                    remaining = &remaining[skip..];
                } else {
                    args.flags.push(key.to_owned());
                    remaining = after_key;
                }
            }
            remaining = remaining.trim_start();
        }

        args
    }

    /// Attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether `name` was given as a bare flag or as `name=true`.
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f == name)
            || self
                .get(name)
                .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// Split `#id` / `.class` names off at the next whitespace, `.` or `#`.
fn split_selector(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Split a value that is `"quoted"`, `'quoted'`, or runs to the next whitespace.
fn split_value(s: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote) {
            return match inner.find(quote) {
                Some(end) => (&inner[..end], &inner[end + 1..]),
                None => (inner, ""),
            };
        }
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}
