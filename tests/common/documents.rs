//! Builders for llms.txt documents of a given shape

use std::fmt::Write;

/// Line-oriented markdown builder.
#[derive(Debug, Default, Clone)]
pub struct DocumentBuilder {
    out: String,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        let _ = writeln!(self.out, "# {}\n", title);
        self
    }

    pub fn lead(mut self, text: &str) -> Self {
        let _ = writeln!(self.out, "> {}\n", text);
        self
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        let _ = writeln!(self.out, "{}\n", text);
        self
    }

    pub fn section(mut self, name: &str) -> Self {
        let _ = writeln!(self.out, "## {}\n", name);
        self
    }

    pub fn link(mut self, title: &str, url: &str, description: &str) -> Self {
        let _ = writeln!(self.out, "- [{}]({}): {}", title, url, description);
        self
    }

    pub fn bare_link(mut self, title: &str, url: &str) -> Self {
        let _ = writeln!(self.out, "- [{}]({})", title, url);
        self
    }

    pub fn code(mut self, language: Option<&str>, body: &str) -> Self {
        let _ = writeln!(self.out, "\n```{}\n{}\n```\n", language.unwrap_or(""), body);
        self
    }

    /// Position of the next line to be written, 1-based.
    pub fn next_line(&self) -> usize {
        self.out.lines().count() + 1
    }

    pub fn build(self) -> String {
        self.out
    }
}

/// A well-structured index padded with prose until it exceeds `min_bytes`.
pub fn oversized_document(min_bytes: usize) -> String {
    let mut builder = DocumentBuilder::new()
        .title("Atlas")
        .lead("Atlas is a geospatial tile server.")
        .section("Master Index")
        .link("Tiles", "https://atlas.dev/tiles", "Serving vector and raster tiles")
        .link("Styles", "https://atlas.dev/styles", "Map style documents and sprites")
        .section("Core Concepts");

    let mut n = 0;
    while builder.out.len() <= min_bytes {
        n += 1;
        builder = builder.paragraph(&format!(
            "Paragraph {} describes how zoom level {} tiles are cut, cached, and expired.",
            n,
            n % 22
        ));
    }
    builder.build()
}
