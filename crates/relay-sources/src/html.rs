//! CSS selector helpers over `scraper`.
//!
//! `scraper::Html` is not `Send`, so every scraper parses inside a plain
//! synchronous function and returns owned data before the next `.await`.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, SourceError};

/// Compiles a selector, reporting bad syntax as a parse error.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SourceError::parse(format!("selector '{}': {:?}", css, e)))
}

/// Whitespace-collapsed text content of an element.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first match inside `scope`, if any and non-empty.
pub fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope
        .select(sel)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
}

/// Attribute of the first match inside `scope`.
pub fn first_attr(scope: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    scope
        .select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Text of the first match anywhere in the document.
pub fn doc_text(doc: &Html, sel: &Selector) -> Option<String> {
    first_text(doc.root_element(), sel)
}

/// Attribute of the first match anywhere in the document.
pub fn doc_attr(doc: &Html, sel: &Selector, attr: &str) -> Option<String> {
    first_attr(doc.root_element(), sel, attr)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="card">
            <h3>  Clip
                title </h3>
            <img src="/a.jpg" data-src="">
        </div>
    "#;

    #[test]
    fn test_text_is_collapsed() {
        let doc = Html::parse_fragment(PAGE);
        let h3 = selector("h3").unwrap();
        assert_eq!(doc_text(&doc, &h3).as_deref(), Some("Clip title"));
    }

    #[test]
    fn test_empty_attr_is_none() {
        let doc = Html::parse_fragment(PAGE);
        let img = selector("img").unwrap();

        assert_eq!(doc_attr(&doc, &img, "src").as_deref(), Some("/a.jpg"));
        assert_eq!(doc_attr(&doc, &img, "data-src"), None);
        assert_eq!(doc_attr(&doc, &img, "alt"), None);
    }

    #[test]
    fn test_bad_selector_is_parse_error() {
        let err = selector("a:::").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
