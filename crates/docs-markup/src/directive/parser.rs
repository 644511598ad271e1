//! Container fence recognition: `:::name[content]{attrs}` and `:::`.

use super::DirectiveArgs;

/// A line that opens or closes a container directive.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ParsedDirective {
    Start {
        name: String,
        args: DirectiveArgs,
        colon_count: usize,
    },
    End {
        colon_count: usize,
    },
}

/// Parse a whole line as a container fence.
///
/// Returns `None` if the line is ordinary text.
pub(crate) fn parse_container_line(line: &str) -> Option<ParsedDirective> {
    let trimmed = line.trim();
    if !trimmed.starts_with(":::") {
        return None;
    }

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    let after_colons = trimmed[colon_count..].trim_start();

    if after_colons.is_empty() {
        return Some(ParsedDirective::End { colon_count });
    }

    let name_end = after_colons
        .find(|c: char| c == '[' || c == '{' || c.is_whitespace())
        .unwrap_or(after_colons.len());
    let name = &after_colons[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }

    let rest = &after_colons[name_end..];
    let (content, consumed) = enclosed(rest, '[', ']');
    let rest = &rest[consumed..];
    let (attrs, _) = enclosed(rest, '{', '}');

    Some(ParsedDirective::Start {
        name: name.to_owned(),
        args: DirectiveArgs::parse(content, attrs),
        colon_count,
    })
}

fn is_valid_directive_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Take a balanced `open ... close` group from the start of `s`.
///
/// Returns the inner text and the bytes consumed, or `("", 0)` if `s` does
/// not start with a complete group.
fn enclosed(s: &str, open: char, close: char) -> (&str, usize) {
    if !s.starts_with(open) {
        return ("", 0);
    }

    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (&s[open.len_utf8()..i], i + close.len_utf8());
            }
        }
    }
    ("", 0)
}
