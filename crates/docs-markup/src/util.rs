//! Path arithmetic shared by parsing, resolution and output.

use pulldown_cmark::HeadingLevel;

/// Compute a relative URL from one page URL to another (RFC 3986).
///
/// Both URLs are root-relative without a leading slash. The last segment of
/// `from` is the current document, so only the segments before it count as
/// its directory.
///
/// ```
/// use docs_markup::relative_path;
///
/// assert_eq!(relative_path("guide/install.html", "guide/faq.html"), "faq.html");
/// assert_eq!(relative_path("a/b/c.html", "x.html"), "../../x.html");
/// assert_eq!(relative_path("index.html", "guide/install.html"), "guide/install.html");
/// ```
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    // Trailing slash means the whole of `from` is a directory.
    let from_dir = if from.ends_with('/') || from_segs.is_empty() {
        &from_segs[..]
    } else {
        &from_segs[..from_segs.len() - 1]
    };

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = "../".repeat(from_dir.len() - common);
    result.push_str(&to_segs[common..].join("/"));

    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}

/// Resolve a document reference written inside `current` to a logical path.
///
/// A leading `/` makes `target` absolute from the source root; anything else
/// is relative to the directory holding `current`. `.` and `..` segments are
/// collapsed and a trailing `.md` is dropped.
///
/// Returns `None` for an empty reference or one that climbs above the root.
///
/// ```
/// use docs_markup::join_reference;
///
/// assert_eq!(join_reference("guide/index", "install").as_deref(), Some("guide/install"));
/// assert_eq!(join_reference("guide/index", "../faq.md").as_deref(), Some("faq"));
/// assert_eq!(join_reference("guide/index", "/reference/api").as_deref(), Some("reference/api"));
/// assert_eq!(join_reference("index", "../outside"), None);
/// ```
pub fn join_reference(current: &str, target: &str) -> Option<String> {
    let target = target.trim();
    let target = target.strip_suffix(".md").unwrap_or(target);

    let (mut segments, rest): (Vec<&str>, &str) = match target.strip_prefix('/') {
        Some(absolute) => (Vec::new(), absolute),
        None => {
            let mut dir: Vec<&str> = current.split('/').filter(|s| !s.is_empty()).collect();
            dir.pop();
            (dir, target)
        }
    };

    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Heading level as a number (1-6).
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
