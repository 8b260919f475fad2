//! Markdown hierarchy splitter
//!
//! Splits markdown on headings; each chunk carries the heading path above it.

use pulldown_cmark::{Event, Parser, Tag};

use crate::domain::ingestion::{Chunk, ChunkingStrategy, PATH_KEY};

/// Separator between heading titles in a chunk path
pub const PATH_SEPARATOR: &str = " > ";

/// Splits markdown into one chunk per run of body text between headings
#[derive(Debug, Clone, Default)]
pub struct MarkdownHierarchySplitter;

impl MarkdownHierarchySplitter {
    pub fn new() -> Self {
        Self
    }

    /// Parse markdown into chunks with `path` metadata such as `"1 Title > 1.1 Scope"`.
    ///
    /// Only ATX (`#`) headings split; underlined setext headings stay in the body.
    /// Body text before the first heading gets an empty path. Blank lines are
    /// dropped and runs with no text produce no chunk.
    pub fn parse(&self, markdown: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut stack: Vec<(u32, String)> = Vec::new();
        let mut body_start = 0;
        let mut heading: Option<(u32, String)> = None;
        let mut in_setext = false;

        for (event, range) in Parser::new(markdown).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading(..)) if !is_atx(&markdown[range.clone()]) => {
                    in_setext = true;
                }
                Event::End(Tag::Heading(..)) if in_setext => {
                    in_setext = false;
                }
                Event::Start(Tag::Heading(level, ..)) => {
                    if let Some(chunk) = body_chunk(&markdown[body_start..range.start], &stack) {
                        chunks.push(chunk);
                    }
                    heading = Some((level as u32, String::new()));
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, title)) = heading.as_mut() {
                        title.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, title)) = heading.as_mut() {
                        title.push(' ');
                    }
                }
                Event::End(Tag::Heading(..)) => {
                    if let Some((level, title)) = heading.take() {
                        while stack.last().is_some_and(|(top, _)| *top >= level) {
                            stack.pop();
                        }
                        stack.push((level, title.trim().to_string()));
                    }
                    body_start = range.end;
                }
                _ => {}
            }
        }

        if let Some(chunk) = body_chunk(&markdown[body_start..], &stack) {
            chunks.push(chunk);
        }

        chunks
    }
}

fn is_atx(source: &str) -> bool {
    source.trim_start().starts_with('#')
}

fn body_chunk(body: &str, stack: &[(u32, String)]) -> Option<Chunk> {
    let content = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    if content.is_empty() {
        return None;
    }

    let path = stack
        .iter()
        .map(|(_, title)| title.as_str())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR);

    Some(Chunk::new(content).with_metadata(PATH_KEY, path))
}

impl ChunkingStrategy for MarkdownHierarchySplitter {
    fn chunk(&self, content: &str) -> Vec<Chunk> {
        self.parse(content)
    }

    fn name(&self) -> &'static str {
        "markdown_hierarchy"
    }
}
