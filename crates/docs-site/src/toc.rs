//! Table of contents construction.
//!
//! A `:::toc` directive lists documents. For each one that resolves, its
//! outline is walked depth-first up to the directive's `max_depth`,
//! producing a tree of [`TocItem`]s with page-relative targets. Children
//! below the depth limit are never built.

use docs_markup::{Title, TitleEntry, TocDirective, slugify};
use serde::Serialize;

use crate::environment::{Environment, Reference, ReferenceKind};

/// Layout hint derived from the number of visible items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TocSize {
    Small,
    Medium,
    Large,
}

impl TocSize {
    /// `0..=9` small, `10..=19` medium, anything more large.
    pub fn from_visible_items(count: usize) -> Self {
        if count < 10 {
            Self::Small
        } else if count < 20 {
            Self::Medium
        } else {
            Self::Large
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Summary of a built TOC, shared by the HTML template and the JSON export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocOptions {
    pub max_depth: usize,
    pub num_visible_items: usize,
    pub size: TocSize,
}

/// One entry of a built TOC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocItem {
    /// Slug of the target, usable as an element id.
    pub target_id: String,
    /// Page-relative link target.
    pub target_url: String,
    pub title: String,
    /// 1-based nesting level.
    pub level: usize,
    pub children: Vec<TocItem>,
}

/// A TOC ready for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toc {
    pub caption: Option<String>,
    pub items: Vec<TocItem>,
    pub options: TocOptions,
}

/// Builds TOCs for the page an [`Environment`] is bound to.
pub struct TocBuilder<'e, 'a> {
    env: &'e Environment<'a>,
}

impl<'e, 'a> TocBuilder<'e, 'a> {
    pub fn new(env: &'e Environment<'a>) -> Self {
        Self { env }
    }

    /// Build the TOC for `directive`, or `None` if it is hidden.
    ///
    /// Files that do not resolve are skipped without a placeholder.
    pub fn build(&self, directive: &TocDirective) -> Option<Toc> {
        if directive.hidden {
            return None;
        }

        let max_depth = directive.max_depth.max(1);
        let mut items = Vec::new();

        for file in &directive.files {
            let Some(reference) = self.env.resolve(ReferenceKind::Doc, file) else {
                continue;
            };
            let url = self.env.relative_url(reference.url);
            self.build_level(&url, &reference, reference.outline, 1, max_depth, &mut items);
        }

        let num_visible_items = count_visible(&items, max_depth);

        Some(Toc {
            caption: directive.caption.clone(),
            items,
            options: TocOptions {
                max_depth,
                num_visible_items,
                size: TocSize::from_visible_items(num_visible_items),
            },
        })
    }

    fn build_level(
        &self,
        url: &str,
        reference: &Reference<'_>,
        titles: &[TitleEntry],
        level: usize,
        max_depth: usize,
        items: &mut Vec<TocItem>,
    ) {
        for (index, entry) in titles.iter().enumerate() {
            // The first top-level heading of another page stands for the page.
            let with_anchor =
                !(level == 1 && index == 0 && reference.path != self.env.current_path());

            let target = self.target(url, reference, &entry.title, with_anchor);
            let mut item = TocItem {
                target_id: slugify(&target),
                target_url: target,
                title: entry.title.text().to_owned(),
                level,
                children: Vec::new(),
            };

            if !entry.children.is_empty() && level < max_depth {
                self.build_level(
                    url,
                    reference,
                    &entry.children,
                    level + 1,
                    max_depth,
                    &mut item.children,
                );
            }

            items.push(item);
        }
    }

    fn target(
        &self,
        url: &str,
        reference: &Reference<'_>,
        title: &Title,
        with_anchor: bool,
    ) -> String {
        match title {
            Title::Text(text) if with_anchor => format!("{url}#{}", slugify(text)),
            Title::Text(_) => url.to_owned(),
            Title::Link { target, .. } => {
                match self
                    .env
                    .resolve_from(ReferenceKind::Doc, reference.path, target)
                {
                    Some(linked) => self.env.relative_url(linked.url),
                    None => target.clone(),
                }
            }
        }
    }
}

/// Count items at any depth whose level is within `max_depth`.
fn count_visible(items: &[TocItem], max_depth: usize) -> usize {
    items
        .iter()
        .filter(|item| item.level <= max_depth)
        .map(|item| 1 + count_visible(&item.children, max_depth))
        .sum()
}

#[cfg(test)]
mod tests {
    use docs_meta::{Document, MetaStore, MetaStoreBuilder};
    use pretty_assertions::assert_eq;

    use super::*;

    fn directive(files: &[&str], max_depth: usize) -> TocDirective {
        TocDirective {
            files: files.iter().map(|f| (*f).to_owned()).collect(),
            max_depth,
            hidden: false,
            caption: None,
            line: 1,
        }
    }

    fn store(documents: Vec<Document>) -> MetaStore {
        let mut builder = MetaStoreBuilder::new();
        for document in documents {
            builder.register(document);
        }
        builder.freeze()
    }

    fn scenario_store() -> MetaStore {
        store(vec![
            Document::new("index", vec![TitleEntry::leaf("Home")]),
            Document::new(
                "a",
                vec![TitleEntry::new("Intro", vec![TitleEntry::leaf("Sub1")])],
            ),
            Document::new("b", vec![TitleEntry::leaf("Start")]),
        ])
    }

    fn item(target_url: &str, title: &str, level: usize, children: Vec<TocItem>) -> TocItem {
        TocItem {
            target_id: slugify(target_url),
            target_url: target_url.to_owned(),
            title: title.to_owned(),
            level,
            children,
        }
    }

    fn flatten(items: &[TocItem]) -> Vec<&TocItem> {
        items
            .iter()
            .flat_map(|i| std::iter::once(i).chain(flatten(&i.children)))
            .collect()
    }

    #[test]
    fn test_two_files_depth_two() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&["a", "b"], 2)).unwrap();

        assert_eq!(
            toc.items,
            vec![
                item("a.html", "Intro", 1, vec![item("a.html#sub1", "Sub1", 2, vec![])]),
                item("b.html", "Start", 1, vec![]),
            ]
        );
        assert_eq!(toc.items[0].target_id, "a-html");
        assert_eq!(
            toc.options,
            TocOptions {
                max_depth: 2,
                num_visible_items: 3,
                size: TocSize::Small,
            }
        );
    }

    #[test]
    fn test_two_files_depth_one_drops_children() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&["a", "b"], 1)).unwrap();

        assert_eq!(
            toc.items,
            vec![
                item("a.html", "Intro", 1, vec![]),
                item("b.html", "Start", 1, vec![]),
            ]
        );
        assert_eq!(toc.options.num_visible_items, 2);
    }

    #[test]
    fn test_hidden_builds_nothing() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");
        let mut hidden = directive(&["a", "b"], 2);
        hidden.hidden = true;

        assert_eq!(TocBuilder::new(&env).build(&hidden), None);
    }

    #[test]
    fn test_unresolvable_file_is_skipped() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");
        let builder = TocBuilder::new(&env);

        let with_missing = builder.build(&directive(&["a", "missing", "b"], 1)).unwrap();
        let without = builder.build(&directive(&["a", "b"], 1)).unwrap();

        assert_eq!(with_missing, without);
    }

    #[test]
    fn test_one_fewer_item_per_unresolved_file() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");
        let builder = TocBuilder::new(&env);

        let all = builder.build(&directive(&["index", "b"], 1)).unwrap();
        let one_missing = builder.build(&directive(&["gone", "b"], 1)).unwrap();

        assert_eq!(all.items.len(), 2);
        assert_eq!(one_missing.items.len(), 1);
    }

    #[test]
    fn test_empty_file_list() {
        let store = scenario_store();
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&[], 3)).unwrap();

        assert!(toc.items.is_empty());
        assert_eq!(toc.options.num_visible_items, 0);
        assert_eq!(toc.options.size, TocSize::Small);
    }

    #[test]
    fn test_listing_current_page_anchors_first_heading() {
        let store = scenario_store();
        let env = Environment::new(&store, "a");

        let toc = TocBuilder::new(&env).build(&directive(&["a"], 2)).unwrap();

        assert_eq!(toc.items[0].target_url, "a.html#intro");
        assert_eq!(toc.items[0].children[0].target_url, "a.html#sub1");
    }

    #[test]
    fn test_only_first_top_level_heading_loses_anchor() {
        let store = store(vec![
            Document::new("index", vec![]),
            Document::new(
                "multi",
                vec![TitleEntry::leaf("One"), TitleEntry::leaf("Two")],
            ),
        ]);
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&["multi"], 1)).unwrap();

        assert_eq!(toc.items[0].target_url, "multi.html");
        assert_eq!(toc.items[1].target_url, "multi.html#two");
    }

    #[test]
    fn test_urls_relative_to_nested_page() {
        let store = store(vec![
            Document::new("guide/setup/index", vec![]),
            Document::new("guide/setup/linux", vec![TitleEntry::leaf("Linux")]),
            Document::new("reference/api", vec![TitleEntry::leaf("API")]),
        ]);
        let env = Environment::new(&store, "guide/setup/index");

        let toc = TocBuilder::new(&env)
            .build(&directive(&["linux", "/reference/api"], 1))
            .unwrap();

        assert_eq!(toc.items[0].target_url, "linux.html");
        assert_eq!(toc.items[1].target_url, "../../reference/api.html");
        assert_eq!(toc.items[1].target_id, "reference-api-html");
    }

    #[test]
    fn test_explicit_target_resolves_as_document() {
        let store = store(vec![
            Document::new("index", vec![]),
            Document::new(
                "guide/index",
                vec![TitleEntry::new(
                    "Guide",
                    vec![
                        TitleEntry::leaf(Title::Link {
                            title: "Installing".to_owned(),
                            target: "install".to_owned(),
                        }),
                        TitleEntry::leaf(Title::Link {
                            title: "Elsewhere".to_owned(),
                            target: "missing-page".to_owned(),
                        }),
                    ],
                )],
            ),
            Document::new("guide/install", vec![TitleEntry::leaf("Install")]),
        ]);
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&["guide/index"], 2)).unwrap();
        let children = &toc.items[0].children;

        assert_eq!(children[0].title, "Installing");
        assert_eq!(children[0].target_url, "guide/install.html");
        assert_eq!(children[1].title, "Elsewhere");
        assert_eq!(children[1].target_url, "missing-page");
        assert_eq!(children[1].target_id, "missing-page");
    }

    #[test]
    fn test_depth_is_never_exceeded() {
        let deep = TitleEntry::new(
            "L1",
            vec![TitleEntry::new(
                "L2",
                vec![TitleEntry::new("L3", vec![TitleEntry::leaf("L4")])],
            )],
        );
        let store = store(vec![Document::new("index", vec![]), Document::new("deep", vec![deep])]);
        let env = Environment::new(&store, "index");
        let builder = TocBuilder::new(&env);

        for depth in 1..=5 {
            let toc = builder.build(&directive(&["deep"], depth)).unwrap();
            let flat = flatten(&toc.items);

            assert!(flat.iter().all(|i| i.level <= depth), "depth {depth}");
            assert_eq!(flat.len(), depth.min(4));
            assert_eq!(toc.options.num_visible_items, flat.len());
        }
    }

    #[test]
    fn test_size_buckets() {
        assert_eq!(TocSize::from_visible_items(0), TocSize::Small);
        assert_eq!(TocSize::from_visible_items(9), TocSize::Small);
        assert_eq!(TocSize::from_visible_items(10), TocSize::Medium);
        assert_eq!(TocSize::from_visible_items(19), TocSize::Medium);
        assert_eq!(TocSize::from_visible_items(20), TocSize::Large);
        assert_eq!(TocSize::from_visible_items(500), TocSize::Large);
    }

    #[test]
    fn test_size_counts_nested_items() {
        let outline: Vec<TitleEntry> = (0..4)
            .map(|i| {
                TitleEntry::new(
                    format!("Section {i}").as_str(),
                    vec![TitleEntry::leaf("A"), TitleEntry::leaf("B")],
                )
            })
            .collect();
        let store = store(vec![Document::new("index", vec![]), Document::new("big", outline)]);
        let env = Environment::new(&store, "index");

        let toc = TocBuilder::new(&env).build(&directive(&["big"], 2)).unwrap();

        assert_eq!(toc.items.len(), 4);
        assert_eq!(toc.options.num_visible_items, 12);
        assert_eq!(toc.options.size, TocSize::Medium);
    }

    #[test]
    fn test_options_serialize_for_json() {
        let options = TocOptions {
            max_depth: 2,
            num_visible_items: 12,
            size: TocSize::Medium,
        };

        assert_eq!(
            serde_json::to_value(options).unwrap(),
            serde_json::json!({"maxDepth": 2, "numVisibleItems": 12, "size": "medium"})
        );
    }
}
