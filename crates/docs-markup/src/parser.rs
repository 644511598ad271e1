//! Markdown to [`ParsedPage`].
//!
//! Parsing runs in two steps. The source is first split into markdown runs
//! and `:::toc` blocks, line by line, skipping anything inside fenced code.
//! Each markdown run then goes through `pulldown-cmark`: headings are
//! collected for the outline and given slug ids, and links to `.md` files
//! are pointed at the generated `.html` pages.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use crate::directive::{DirectiveArgs, ParsedDirective, TocDirective, parse_container_line};
use crate::outline::{Title, TitleEntry, nest};
use crate::slug::slugify;
use crate::util::heading_level_to_num;

const DEFAULT_TOC_DEPTH: usize = 2;

/// Markup syntax error. Aborts the build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: `:::{name}` directive is never closed")]
    UnclosedDirective { line: usize, name: String },
    #[error("line {line}: invalid maxdepth `{value}`, expected an integer of at least 1")]
    InvalidMaxDepth { line: usize, value: String },
}

/// Piece of a page body, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Segment {
    /// Rendered HTML.
    Html(String),
    /// A TOC to be built against the metadata store at render time.
    Toc(TocDirective),
}

/// Everything later stages need from one source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedPage {
    /// Text of the first H1, if any.
    pub title: Option<String>,
    /// Heading tree.
    pub outline: Vec<TitleEntry>,
    /// Body in document order.
    pub segments: Vec<Segment>,
}

impl ParsedPage {
    /// TOC directives in document order, hidden ones included.
    pub fn toc_directives(&self) -> impl Iterator<Item = &TocDirective> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Toc(directive) => Some(directive),
            Segment::Html(_) => None,
        })
    }
}

/// Markdown parser configured once per build.
///
/// ```
/// use docs_markup::MarkupParser;
///
/// let page = MarkupParser::new()
///     .with_default_toc_depth(3)
///     .parse(":::toc\nintro\n:::\n")
///     .unwrap();
/// assert_eq!(page.toc_directives().next().unwrap().max_depth, 3);
/// ```
#[derive(Clone, Debug)]
pub struct MarkupParser {
    default_toc_depth: usize,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_toc_depth: DEFAULT_TOC_DEPTH,
        }
    }

    /// Depth for TOC directives without `maxdepth` (clamped to at least 1).
    #[must_use]
    pub fn with_default_toc_depth(mut self, depth: usize) -> Self {
        self.default_toc_depth = depth.max(1);
        self
    }

    /// Parse one markdown source.
    pub fn parse(&self, source: &str) -> Result<ParsedPage, ParseError> {
        let mut headings = Vec::new();
        let mut segments = Vec::new();

        for block in split_blocks(source, self.default_toc_depth)? {
            match block {
                Block::Markdown(text) => {
                    segments.push(Segment::Html(render_markdown(&text, &mut headings)));
                }
                Block::Toc(directive) => segments.push(Segment::Toc(directive)),
            }
        }

        let title = headings
            .iter()
            .find(|(level, _)| *level == 1)
            .map(|(_, title)| title.text().to_owned());

        Ok(ParsedPage {
            title,
            outline: nest(&headings),
            segments,
        })
    }
}

enum Block {
    Markdown(String),
    Toc(TocDirective),
}

/// Opening fence of a fenced code block.
struct Fence {
    ch: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        if line.len() - trimmed.len() > 3 {
            return None;
        }
        let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == ch).count();
        (len >= 3).then_some(Self { ch, len })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let len = trimmed.chars().take_while(|c| *c == self.ch).count();
        len >= self.len && trimmed[len * self.ch.len_utf8()..].is_empty()
    }
}

fn split_blocks(source: &str, default_depth: usize) -> Result<Vec<Block>, ParseError> {
    let mut blocks = Vec::new();
    let mut markdown = String::new();
    let mut fence: Option<Fence> = None;
    let mut lines = source.lines().enumerate();

    while let Some((idx, line)) = lines.next() {
        if let Some(open) = &fence {
            if open.closes(line) {
                fence = None;
            }
        } else if let Some(open) = Fence::open(line) {
            fence = Some(open);
        } else if let Some(ParsedDirective::Start {
            name,
            args,
            colon_count,
        }) = parse_container_line(line)
            && name == "toc"
        {
            let line_no = idx + 1;
            let mut files = Vec::new();
            let mut closed = false;

            for (_, body) in lines.by_ref() {
                if let Some(ParsedDirective::End { colon_count: n }) = parse_container_line(body)
                    && n >= colon_count
                {
                    closed = true;
                    break;
                }
                let entry = body.trim();
                if !entry.is_empty() {
                    files.push(entry.to_owned());
                }
            }

            if !closed {
                return Err(ParseError::UnclosedDirective {
                    line: line_no,
                    name,
                });
            }

            if !markdown.trim().is_empty() {
                blocks.push(Block::Markdown(std::mem::take(&mut markdown)));
            }
            markdown.clear();
            blocks.push(Block::Toc(toc_directive(
                &args,
                files,
                default_depth,
                line_no,
            )?));
            continue;
        }

        markdown.push_str(line);
        markdown.push('\n');
    }

    if !markdown.trim().is_empty() {
        blocks.push(Block::Markdown(markdown));
    }

    Ok(blocks)
}

fn toc_directive(
    args: &DirectiveArgs,
    files: Vec<String>,
    default_depth: usize,
    line: usize,
) -> Result<TocDirective, ParseError> {
    let max_depth = match args.get("maxdepth") {
        None => default_depth,
        Some(value) => match value.parse::<usize>() {
            Ok(depth) if depth >= 1 => depth,
            _ => {
                return Err(ParseError::InvalidMaxDepth {
                    line,
                    value: value.to_owned(),
                });
            }
        },
    };

    Ok(TocDirective {
        files,
        max_depth,
        hidden: args.has_flag("hidden"),
        caption: Some(args.content.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_owned),
        line,
    })
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Render one markdown run, appending its headings to `headings`.
fn render_markdown(text: &str, headings: &mut Vec<(u8, Title)>) -> String {
    let mut events: Vec<Event<'_>> = Parser::new_ext(text, parser_options()).collect();

    for i in 0..events.len() {
        if let Event::Start(Tag::Heading { level, .. }) = &events[i] {
            let level = heading_level_to_num(*level);
            let end = events[i..]
                .iter()
                .position(|e| matches!(e, Event::End(TagEnd::Heading(_))))
                .map_or(events.len(), |offset| i + offset);
            let title = heading_title(&events[i + 1..end]);
            let slug = slugify(title.text());

            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i]
                && id.is_none()
                && !slug.is_empty()
            {
                *id = Some(CowStr::from(slug));
            }
            headings.push((level, title));
        } else if let Event::Start(Tag::Link { dest_url, .. }) = &mut events[i]
            && let Some(rewritten) = rewrite_document_link(dest_url)
        {
            *dest_url = CowStr::from(rewritten);
        }
    }

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());
    out
}

/// Outline title for the events between a heading's start and end.
fn heading_title(events: &[Event<'_>]) -> Title {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    let text = text.trim().to_owned();

    if let [Event::Start(Tag::Link { dest_url, .. }), inner @ .., Event::End(TagEnd::Link)] = events
        && !inner
            .iter()
            .any(|e| matches!(e, Event::Start(Tag::Link { .. })))
        && let Some(target) = document_target(dest_url)
    {
        return Title::Link {
            title: text,
            target,
        };
    }

    Title::Text(text)
}

fn is_external(url: &str) -> bool {
    url.contains("://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with("data:")
}

/// Document reference carried by a heading link, if it points at one.
fn document_target(url: &str) -> Option<String> {
    if url.is_empty() || is_external(url) || url.contains('#') || url.contains('?') {
        return None;
    }
    Some(url.to_owned())
}

/// `install.md#usage` -> `install.html#usage`; `None` when unchanged.
fn rewrite_document_link(url: &str) -> Option<String> {
    if is_external(url) || url.starts_with('#') {
        return None;
    }
    let (path, fragment) = match url.find('#') {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    };
    let stem = path.strip_suffix(".md")?;
    Some(format!("{stem}.html{fragment}"))
}
