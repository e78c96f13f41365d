//! Generic queries over a parsed HTML tree
//!
//! The classifier only needs a handful of lookups (by tag, by id, by class,
//! text content), so they walk the tree directly instead of compiling CSS
//! selectors from configurable marker names.

use scraper::{ElementRef, Html};

/// Iterates over every element of the document in document order
pub fn elements(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
}

/// All elements with the given tag name (case-insensitive)
pub fn elements_by_tag<'a>(document: &'a Html, tag: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    elements(document).filter(move |e| e.value().name().eq_ignore_ascii_case(tag))
}

/// The first element whose `id` attribute equals `id`
pub fn first_by_id<'a>(document: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    elements(document).find(|e| e.value().id() == Some(id))
}

/// The first element carrying `class` as one of its class tokens
pub fn first_by_class<'a>(document: &'a Html, class: &str) -> Option<ElementRef<'a>> {
    elements(document).find(|e| e.value().classes().any(|c| c == class))
}

/// Concatenated text of the element and its descendants, trimmed
pub fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// The value of an attribute, if present
pub fn attribute<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
