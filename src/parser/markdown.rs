//! Markdown → `ParsedDocument`
//!
//! Walks the pulldown-cmark event stream once with byte offsets, so every
//! heading, link, and code block carries its source line.

use super::links::{bare_url, classify_link, clean_description, is_well_formed, recover_link_syntax};
use super::types::{CodeBlock, LinkKind, ParsedDocument, ParsedLink, ParsedSection};
use crate::input::MappedDocument;
use crate::preprocess::{LineMap, PreprocessedDocument};
use crate::schema::{estimate_tokens, SectionAliases};
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag, TagEnd};
use tracing::debug;

/// Byte offset → 1-indexed line
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&s| s <= offset).max(1)
    }
}

/// In-progress list item
#[derive(Default)]
struct ItemState {
    line: usize,
    /// Text seen before the first link
    before: String,
    /// (title, destination, autolink) of the first link
    link: Option<(String, String, bool)>,
    in_link: bool,
    /// Text after the first link
    after: String,
}

impl ItemState {
    fn push_text(&mut self, text: &str) {
        match (&mut self.link, self.in_link) {
            (Some((title, _, _)), true) => title.push_str(text),
            (Some(_), false) => self.after.push_str(text),
            (None, _) => self.before.push_str(text),
        }
    }

    fn into_link(self) -> Option<ParsedLink> {
        if let Some((title, url, autolink)) = self.link {
            let url = url.trim().to_string();
            let kind = if autolink {
                LinkKind::Bare
            } else {
                classify_link(&url)
            };
            let title = title.trim().to_string();
            return Some(ParsedLink {
                title: if title.is_empty() && autolink { url.clone() } else { title },
                is_well_formed: is_well_formed(&url),
                description: clean_description(&self.after),
                line: self.line,
                kind,
                url,
            });
        }

        if let Some((title, url, rest)) = recover_link_syntax(&self.before) {
            return Some(ParsedLink {
                title: title.trim().to_string(),
                kind: classify_link(&url),
                is_well_formed: false,
                description: clean_description(&rest),
                line: self.line,
                url,
            });
        }

        bare_url(&self.before).map(|url| ParsedLink {
            title: url.to_string(),
            url: url.to_string(),
            description: None,
            line: self.line,
            kind: LinkKind::Bare,
            is_well_formed: is_well_formed(url),
        })
    }
}

/// Whether a fenced block's source span ends with a matching closing fence.
fn fence_is_closed(block: &str) -> bool {
    let strip = |l: &str| l.trim_start_matches([' ', '>']).trim_end().to_string();
    let mut lines = block.lines().map(strip);
    let Some(open) = lines.next() else {
        return false;
    };
    let fence_char = match open.chars().next() {
        Some(c @ ('`' | '~')) => c,
        _ => return true,
    };
    let fence_len = open.chars().take_while(|&c| c == fence_char).count();
    match lines.last() {
        Some(last) => last.len() >= fence_len && last.chars().all(|c| c == fence_char),
        None => false,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parser for llms.txt markdown.
pub struct DocumentParser {
    aliases: SectionAliases,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    pub fn new() -> Self {
        Self {
            aliases: SectionAliases::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: SectionAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Parse preprocessed input, attaching its front matter.
    pub fn parse_preprocessed(&self, pre: &PreprocessedDocument) -> ParsedDocument {
        let mut doc = self.parse(&pre.body, pre.line_map);
        doc.front_matter = pre
            .front_matter
            .as_ref()
            .and_then(|fm| fm.value.clone());
        doc
    }

    /// Parse normalized (LF-only) markdown. Never fails.
    pub fn parse(&self, text: &str, line_map: LineMap) -> ParsedDocument {
        let index = LineIndex::new(text);
        let line_at = |offset: usize| line_map.to_source(index.line_of(offset));
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(text, options).into_offset_iter();

        let mut doc = ParsedDocument {
            raw_content: text.to_string(),
            estimated_tokens: estimate_tokens(text),
            ..Default::default()
        };
        let mut section_starts: Vec<usize> = Vec::new();

        let mut in_heading: Option<(u8, usize)> = None;
        let mut heading_text = String::new();

        let mut expect_description = false;
        let mut quote_depth = 0usize;
        let mut capturing_description = false;
        let mut description_text = String::new();

        let mut code: Option<CodeBlock> = None;
        let mut code_fenced = false;
        let mut items: Vec<ItemState> = Vec::new();

        for (event, range) in parser {
            if expect_description && !matches!(event, Event::Start(Tag::BlockQuote)) {
                expect_description = false;
            }

            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    in_heading = Some((level as u8, range.start));
                    heading_text.clear();
                }
                Event::End(TagEnd::Heading(_)) => {
                    let Some((level, start)) = in_heading.take() else {
                        continue;
                    };
                    let text = collapse_whitespace(&heading_text);
                    let line = line_at(start);
                    match level {
                        1 => {
                            doc.h1_lines.push(line);
                            if doc.title.is_none() {
                                doc.title = Some(text);
                                doc.title_line = Some(line);
                                expect_description = true;
                            }
                        }
                        2 => {
                            section_starts.push(start);
                            doc.sections.push(ParsedSection {
                                canonical: self.aliases.resolve(&text),
                                name: text,
                                links: Vec::new(),
                                raw_content: String::new(),
                                line,
                                code_blocks: Vec::new(),
                                estimated_tokens: 0,
                            });
                        }
                        _ => {}
                    }
                }
                Event::Start(Tag::BlockQuote) => {
                    quote_depth += 1;
                    if expect_description && quote_depth == 1 {
                        expect_description = false;
                        capturing_description = true;
                        description_text.clear();
                        doc.description_line = Some(line_at(range.start));
                    }
                }
                Event::End(TagEnd::BlockQuote) => {
                    quote_depth = quote_depth.saturating_sub(1);
                    if quote_depth == 0 && capturing_description {
                        capturing_description = false;
                        let text = collapse_whitespace(&description_text);
                        if text.is_empty() {
                            doc.description_line = None;
                        } else {
                            doc.description = Some(text);
                        }
                    }
                }
                Event::End(TagEnd::Paragraph) if capturing_description => {
                    description_text.push(' ');
                }
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_fenced = matches!(kind, CodeBlockKind::Fenced(_));
                    let language = match &kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(|l| l.to_string())
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code = Some(CodeBlock {
                        language,
                        line: line_at(range.start),
                        content: String::new(),
                        closed: !code_fenced || fence_is_closed(&text[range.clone()]),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    // Indented blocks are not recorded.
                    if let Some(block) = code.take().filter(|_| code_fenced) {
                        match doc.sections.last_mut() {
                            Some(section) => section.code_blocks.push(block),
                            None => doc.preamble_code_blocks.push(block),
                        }
                    }
                }
                Event::Start(Tag::Item) => {
                    items.push(ItemState {
                        line: line_at(range.start),
                        ..Default::default()
                    });
                }
                Event::End(TagEnd::Item) => {
                    if let Some(item) = items.pop() {
                        if let (Some(link), Some(section)) = (item.into_link(), doc.sections.last_mut()) {
                            section.links.push(link);
                        }
                    }
                }
                Event::Start(Tag::Link {
                    link_type, dest_url, ..
                }) => {
                    if let Some(item) = items.last_mut() {
                        if item.link.is_none() {
                            item.link = Some((
                                String::new(),
                                dest_url.to_string(),
                                link_type == LinkType::Autolink,
                            ));
                            item.in_link = true;
                        }
                    }
                }
                Event::End(TagEnd::Link) => {
                    if let Some(item) = items.last_mut() {
                        item.in_link = false;
                    }
                }
                Event::Text(t) | Event::Code(t) => {
                    if in_heading.is_some() {
                        heading_text.push_str(&t);
                    } else if let Some(block) = code.as_mut() {
                        block.content.push_str(&t);
                    } else if capturing_description {
                        description_text.push_str(&t);
                    } else if let Some(item) = items.last_mut() {
                        item.push_text(&t);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if in_heading.is_some() {
                        heading_text.push(' ');
                    } else if capturing_description {
                        description_text.push(' ');
                    } else if let Some(item) = items.last_mut() {
                        item.push_text(" ");
                    }
                }
                _ => {}
            }
        }

        for (i, section) in doc.sections.iter_mut().enumerate() {
            let start = section_starts[i];
            let end = section_starts.get(i + 1).copied().unwrap_or(text.len());
            section.raw_content = text[start..end].to_string();
            section.estimated_tokens = estimate_tokens(&section.raw_content);
        }

        debug!(
            sections = doc.sections.len(),
            links = doc.total_links(),
            h1 = doc.h1_lines.len(),
            "parsed document"
        );
        doc
    }

    /// Build a document straight from a validated mapping.
    ///
    /// The mapping is rendered to markdown only to give every element a line
    /// number and the document a token estimate.
    pub fn parse_mapping(&self, mapped: &MappedDocument) -> ParsedDocument {
        let rendered = mapped.render();
        let lines: Vec<&str> = rendered.text.lines().collect();

        let mut sections = Vec::new();
        for (i, section) in mapped.sections.iter().enumerate() {
            let (heading_line, link_lines) = &rendered.section_lines[i];
            let end_line = rendered
                .section_lines
                .get(i + 1)
                .map(|(next, _)| next - 1)
                .unwrap_or(lines.len());
            let mut raw_content = lines[heading_line - 1..end_line].join("\n");
            raw_content.push('\n');

            let links = section
                .links
                .iter()
                .zip(link_lines)
                .map(|(link, &line)| ParsedLink {
                    title: link.title.clone(),
                    url: link.url.clone(),
                    description: link.description.as_deref().and_then(clean_description),
                    line,
                    kind: classify_link(&link.url),
                    is_well_formed: is_well_formed(&link.url),
                })
                .collect();

            sections.push(ParsedSection {
                canonical: self.aliases.resolve(&section.name),
                name: section.name.clone(),
                links,
                estimated_tokens: estimate_tokens(&raw_content),
                raw_content,
                line: *heading_line,
                code_blocks: Vec::new(),
            });
        }

        ParsedDocument {
            title: Some(mapped.title.clone()),
            title_line: Some(rendered.title_line),
            h1_lines: vec![rendered.title_line],
            description: mapped
                .description
                .as_ref()
                .map(|d| collapse_whitespace(d))
                .filter(|d| !d.is_empty()),
            description_line: rendered.description_line,
            sections,
            estimated_tokens: estimate_tokens(&rendered.text),
            raw_content: rendered.text,
            front_matter: None,
            preamble_code_blocks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MappedLink, MappedSection};
    use crate::schema::CanonicalSectionName;

    fn parse(text: &str) -> ParsedDocument {
        DocumentParser::new().parse(text, LineMap::default())
    }

    const SAMPLE: &str = "\
# Acme SDK

> Client library for the Acme API.

## Getting Started

- [Install](https://acme.dev/install): How to install the SDK
- [Auth](https://acme.dev/auth)

```python
import acme
```

## Reference Material

- https://acme.dev/raw
- [Guide](guide.md) - Local guide
";

    #[test]
    fn test_title_and_description() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.title.as_deref(), Some("Acme SDK"));
        assert_eq!(doc.title_line, Some(1));
        assert_eq!(doc.description.as_deref(), Some("Client library for the Acme API."));
        assert_eq!(doc.description_line, Some(3));
    }

    #[test]
    fn test_sections_in_order() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.section_names(), vec!["Getting Started", "Reference Material"]);
        assert_eq!(doc.sections[0].canonical, Some(CanonicalSectionName::GettingStarted));
        assert_eq!(doc.sections[1].canonical, None);
        assert_eq!(doc.sections[0].line, 5);
        assert!(doc.sections[0].raw_content.starts_with("## Getting Started"));
        assert!(doc.sections[1].raw_content.contains("guide.md"));
    }

    #[test]
    fn test_links() {
        let doc = parse(SAMPLE);
        assert_eq!(doc.total_links(), 4);
        let install = &doc.sections[0].links[0];
        assert_eq!(install.title, "Install");
        assert_eq!(install.description.as_deref(), Some("How to install the SDK"));
        assert_eq!(install.line, 7);
        assert_eq!(install.kind, LinkKind::Absolute);
        assert!(doc.sections[0].links[1].description.is_none());

        let bare = &doc.sections[1].links[0];
        assert_eq!(bare.kind, LinkKind::Bare);
        assert_eq!(bare.url, "https://acme.dev/raw");
        let guide = &doc.sections[1].links[1];
        assert_eq!(guide.kind, LinkKind::Relative);
        assert_eq!(guide.description.as_deref(), Some("Local guide"));
    }

    #[test]
    fn test_code_blocks() {
        let doc = parse(SAMPLE);
        let blocks = &doc.sections[0].code_blocks;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language.as_deref(), Some("python"));
        assert_eq!(blocks[0].line, 10);
        assert!(blocks[0].closed);
    }

    #[test]
    fn test_unclosed_fence() {
        let doc = parse("# T\n\n## Examples\n\n```bash\necho hi\n");
        assert_eq!(doc.sections[0].code_blocks.len(), 1);
        assert!(!doc.sections[0].code_blocks[0].closed);
    }

    #[test]
    fn test_multiple_h1() {
        let doc = parse("# One\n\n## A\n\n# Two\n");
        assert_eq!(doc.h1_lines, vec![1, 5]);
        assert_eq!(doc.title.as_deref(), Some("One"));
    }

    #[test]
    fn test_description_must_follow_title() {
        let doc = parse("# T\n\nIntro paragraph.\n\n> Not the lead\n");
        assert!(doc.description.is_none());
        assert!(doc.description_line.is_none());
    }

    #[test]
    fn test_empty_destination_is_malformed() {
        let doc = parse("# T\n\n## Docs\n\n- [Broken]()\n- [Spaced](a b.md)\n");
        let links = &doc.sections[0].links;
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| !l.is_well_formed));
    }

    #[test]
    fn test_line_map_applied() {
        let doc = DocumentParser::new().parse("# T\n", LineMap::new(3));
        assert_eq!(doc.title_line, Some(4));
    }

    #[test]
    fn test_odd_structure_never_fails() {
        for text in ["", "###", "> only\n", "- [x](", "```", "| a |\n|---|\n"] {
            let doc = parse(text);
            assert_eq!(doc.total_links(), doc.links().count());
        }
    }

    #[test]
    fn test_mapping_parse() {
        let mapped = MappedDocument {
            title: "Acme".into(),
            description: Some("Acme docs".into()),
            sections: vec![
                MappedSection {
                    name: "Quick Start".into(),
                    links: vec![MappedLink {
                        title: "Install".into(),
                        url: "https://acme.dev/install".into(),
                        description: Some("Setup steps".into()),
                    }],
                },
                MappedSection {
                    name: "FAQ".into(),
                    links: vec![],
                },
            ],
        };
        let doc = DocumentParser::new().parse_mapping(&mapped);
        assert_eq!(doc.title_line, Some(1));
        assert_eq!(doc.description_line, Some(3));
        assert_eq!(doc.sections[0].canonical, Some(CanonicalSectionName::GettingStarted));
        assert_eq!(doc.sections[0].line, 5);
        assert_eq!(doc.sections[0].links[0].line, 7);
        assert!(doc.sections[1].raw_content.starts_with("## FAQ"));
        assert!(doc.estimated_tokens > 0);
    }
}
