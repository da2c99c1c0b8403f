//! Markdown renderer backed by `pulldown-cmark`.

use pulldown_cmark::{Event, Options, Parser, Tag, html};

/// Markdown renderer.
///
/// GitHub Flavored Markdown is enabled. Headings are emitted without `id`
/// attributes: anchors are never generated, and explicit heading
/// attributes are dropped if a parser option ever lets them through.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let events = Parser::new_ext(markdown, PARSER_OPTIONS).map(strip_heading_attrs);

        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, events);
        out
    }
}

const PARSER_OPTIONS: Options = Options::ENABLE_TABLES
    .union(Options::ENABLE_STRIKETHROUGH)
    .union(Options::ENABLE_TASKLISTS)
    .union(Options::ENABLE_GFM);

fn strip_heading_attrs(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Start(Tag::Heading { level, .. }) => Event::Start(Tag::Heading {
            level,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render(markdown)
    }

    #[test]
    fn test_heading_has_no_id() {
        assert_eq!(render("# Hi\n"), "<h1>Hi</h1>\n");
    }

    #[test]
    fn test_nested_headings_have_no_ids() {
        let html = render("# One\n\n## Two\n\n### Three\n");
        assert!(!html.contains("id="));
        assert!(html.contains("<h2>Two</h2>"));
        assert!(html.contains("<h3>Three</h3>"));
    }

    #[test]
    fn test_explicit_heading_attributes_do_not_produce_ids() {
        let html = render("# Title {#custom}\n");
        assert!(!html.contains("id=\"custom\""));
    }

    #[test]
    fn test_gfm_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_gfm_strikethrough_and_tasklist() {
        let html = render("~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn test_render_is_deterministic() {
        let markdown = "# Commands\n\n- `/play`\n- `/stats`\n";
        assert_eq!(render(markdown), render(markdown));
    }
}
