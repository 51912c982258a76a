//! Pure traversal helpers over a parsed manifest.
//!
//! Elements are matched on their local name, so `imsss:sequencing` and a
//! bare `sequencing` are the same element here. Unprefixed attributes carry
//! no namespace and are looked up by plain name.

use roxmltree::Node;

/// Name of the descriptor expected at the root of every package.
pub const MANIFEST_FILE_NAME: &str = "imsmanifest.xml";

/// Title used when an item declares none.
pub const UNTITLED: &str = "Untitled";

/// Spellings of the SCORM type attribute, checked in order.
const TYPE_ATTRIBUTES: [&str; 2] = ["scormType", "scormtype"];

/// Returns `true` when `node` is an element with local name `name`.
#[must_use]
pub fn is_element(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

/// All elements named `name` below `root`, in document order.
pub fn elements<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    root.descendants().filter(move |node| is_element(*node, name))
}

/// An unprefixed attribute value, treating an empty value as absent.
#[must_use]
pub fn non_empty_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name).filter(|value| !value.is_empty())
}

/// The resource type tag: the first non-empty attribute whose local name is
/// one of the accepted spellings, whatever its prefix.
#[must_use]
pub fn resource_type<'a>(resource: Node<'a, '_>) -> Option<&'a str> {
    TYPE_ATTRIBUTES.iter().find_map(|spelling| {
        resource
            .attributes()
            .find(|attribute| attribute.name() == *spelling && !attribute.value().is_empty())
            .map(|attribute| attribute.value())
    })
}

/// Concatenated text below `node`.
#[must_use]
pub fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(Node::is_text)
        .filter_map(|text| text.text())
        .collect()
}

/// The trimmed text of the item's own `title` child, or [`UNTITLED`].
#[must_use]
pub fn title_of(item: Node<'_, '_>) -> String {
    item.children()
        .find(|child| is_element(*child, "title"))
        .map(|title| text_content(title).trim().to_owned())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_owned())
}

/// Whether a sequencing declaration appears anywhere below `organization`.
#[must_use]
pub fn declares_sequencing(organization: Node<'_, '_>) -> bool {
    elements(organization, "sequencing").next().is_some()
}
