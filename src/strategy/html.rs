use scraper::{ElementRef, Html, Selector};

use crate::app::{GleanerError, Result};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| GleanerError::Extraction(format!("Invalid selector '{}': {}", css, e)))
}

/// Text of an element with runs of whitespace collapsed to one space.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

pub(crate) fn collapse<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapsed text of the first match, or an empty string.
pub(crate) fn first_text(document: &Html, css: &str) -> Result<String> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default())
}

pub(crate) fn first_attr(document: &Html, css: &str, attr: &str) -> Result<String> {
    let selector = selector(css)?;
    Ok(document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(|value| value.trim().to_string())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_collapses_whitespace() {
        let doc = Html::parse_document("<h1>  Hello \n\t world </h1>");
        assert_eq!(first_text(&doc, "h1").unwrap(), "Hello world");
        assert_eq!(first_text(&doc, "h2").unwrap(), "");
    }

    #[test]
    fn test_first_attr() {
        let doc = Html::parse_document(r#"<html lang=" fa "><body></body></html>"#);
        assert_eq!(first_attr(&doc, "html", "lang").unwrap(), "fa");
        assert_eq!(first_attr(&doc, "html", "dir").unwrap(), "");
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(selector("h1[["), Err(GleanerError::Extraction(_))));
    }
}
