//! Small traversal helpers over `scraper` element trees.
//!
//! The target markup changes often, so lookups here are loose: tag lists plus
//! lowercase substring tests on the class attribute or on an element's own text.

use scraper::ElementRef;

/// All element descendants of `el`, in document order, excluding `el` itself.
pub fn descendant_elements<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.descendants().skip(1).filter_map(ElementRef::wrap)
}

pub fn has_tag(el: &ElementRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&el.value().name())
}

/// True when the lowercase class attribute contains any of `terms`.
pub fn class_contains_any(el: &ElementRef<'_>, terms: &[&str]) -> bool {
    match el.value().attr("class") {
        Some(class) => {
            let class = class.to_lowercase();
            terms.iter().any(|term| class.contains(term))
        }
        None => false,
    }
}

/// First descendant with one of `tags` whose class matches one of `terms`.
pub fn find_by_class<'a>(root: ElementRef<'a>, tags: &[&str], terms: &[&str]) -> Option<ElementRef<'a>> {
    descendant_elements(root).find(|el| has_tag(el, tags) && class_contains_any(el, terms))
}

/// Text pieces, trimmed, empty pieces dropped, joined by `sep`.
pub fn joined_text(el: &ElementRef<'_>, sep: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Visible text with whitespace runs collapsed to single spaces.
pub fn clean_text(el: &ElementRef<'_>) -> String {
    joined_text(el, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of an element whose only child is a text node, like a label.
/// Elements with nested markup have no own text.
pub fn own_text(el: &ElementRef<'_>) -> Option<String> {
    let mut children = el.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    only.value().as_text().map(|t| t.trim().to_string())
}

/// First element with one of `tags` whose own text contains any of `terms`.
pub fn find_by_own_text<'a>(root: ElementRef<'a>, tags: &[&str], terms: &[&str]) -> Option<ElementRef<'a>> {
    descendant_elements(root).find(|el| {
        has_tag(el, tags)
            && own_text(el)
                .map(|t| {
                    let t = t.to_lowercase();
                    terms.iter().any(|term| t.contains(term))
                })
                .unwrap_or(false)
    })
}

pub fn next_sibling_element<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.next_siblings().find_map(ElementRef::wrap)
}

/// Next element with one of `tags` after `el` in document order, skipping
/// `el`'s own subtree.
pub fn next_in_document<'a>(el: ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    let mut node = *el;
    loop {
        for sibling in node.next_siblings() {
            let found = sibling
                .descendants()
                .filter_map(ElementRef::wrap)
                .find(|candidate| has_tag(candidate, tags));
            if found.is_some() {
                return found;
            }
        }
        node = node.parent()?;
    }
}

/// Serializes `el` with its own attributes dropped. Descendants are kept as is
/// and no indentation is added.
pub fn outer_html_without_attributes(el: &ElementRef<'_>) -> String {
    let name = el.value().name();
    format!("<{name}>{}</{name}>", el.inner_html())
}
