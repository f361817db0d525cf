//! Content post-processing for client delivery.
//!
//! Stored guide content references uploaded media by root-relative path
//! (`/media/...`). Before the content goes out, those references are
//! rewritten to absolute URLs so they resolve from any origin. The fragment
//! is parsed with html5ever, so broken markup degrades instead of erroring.

use scraper::{Html, Node};

/// Rewrites every root-relative `<img src>` in the fragment to an absolute
/// URL under `base_url`. Without a base URL the content passes through
/// untouched. Already-absolute and protocol-relative references are left
/// alone, which makes a second pass a no-op.
pub fn render(raw_content: &str, base_url: Option<&str>) -> String {
    let Some(base_url) = base_url else {
        return raw_content.to_string();
    };
    let base = base_url.trim_end_matches('/');

    let mut fragment = Html::parse_fragment(raw_content);
    let node_ids: Vec<_> = fragment.tree.nodes().map(|node| node.id()).collect();
    for node_id in node_ids {
        let Some(mut node) = fragment.tree.get_mut(node_id) else {
            continue;
        };
        let Node::Element(element) = node.value() else {
            continue;
        };
        if &*element.name.local != "img" {
            continue;
        }
        for (name, value) in element.attrs.iter_mut() {
            if &*name.local != "src" {
                continue;
            }
            if value.starts_with('/') && !value.starts_with("//") {
                let absolute = format!("{}{}", base, value);
                *value = absolute.as_str().into();
            }
        }
    }
    fragment.root_element().inner_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_root_relative_sources() {
        let out = render("<img src='/media/x.png'>", Some("https://ex.com"));
        assert_eq!(out, "<img src=\"https://ex.com/media/x.png\">");
    }

    #[test]
    fn no_base_url_means_no_change() {
        let raw = "<img src='/media/x.png'>";
        assert_eq!(render(raw, None), raw);
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let once = render("<p>intro</p><img src='/media/a.jpg'>", Some("https://ex.com"));
        let twice = render(&once, Some("https://ex.com"));
        assert_eq!(once, twice);
    }

    #[test]
    fn absolute_and_protocol_relative_sources_are_untouched() {
        let out = render(
            "<img src=\"https://cdn.example/pic.png\"><img src=\"//cdn.example/other.png\">",
            Some("https://ex.com"),
        );
        assert!(out.contains("src=\"https://cdn.example/pic.png\""));
        assert!(out.contains("src=\"//cdn.example/other.png\""));
    }

    #[test]
    fn trailing_slash_on_base_url_does_not_double() {
        let out = render("<img src='/media/x.png'>", Some("https://ex.com/"));
        assert_eq!(out, "<img src=\"https://ex.com/media/x.png\">");
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let out = render("<p>unclosed <img src='/m/a.png' <b>odd", Some("https://ex.com"));
        assert!(!out.is_empty());
    }

    #[test]
    fn text_without_images_survives() {
        let out = render("<h2>Steps</h2><p>First, apply.</p>", Some("https://ex.com"));
        assert_eq!(out, "<h2>Steps</h2><p>First, apply.</p>");
    }
}
