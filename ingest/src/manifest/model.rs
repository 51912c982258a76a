//! Output types produced by manifest resolution.

use serde::Serialize;

/// A resource declared by the manifest, keyed by identifier while resolving.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Identifier, unique within the manifest after last-write-wins.
    pub identifier: String,
    /// Path of the launchable asset relative to the package root. May be
    /// empty.
    pub href: String,
    /// Free-form SCORM type tag, such as `sco` or `asset`.
    pub content_type: String,
}

/// One leaf item of the chosen organization, ready to launch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchableItem {
    /// Item identifier.
    pub id: String,
    /// Trimmed item title, or `"Untitled"`.
    pub title: String,
    /// Prefix, folder, href and parameters concatenated in that order.
    pub launch_url: String,
    /// Type tag copied from the referenced resource.
    #[serde(rename = "scormType")]
    pub content_type: String,
}

/// The launchable structure of one extracted package.
///
/// # Examples
///
/// ```
/// use coursepack_ingest::manifest::ResolvedPackage;
///
/// let package = ResolvedPackage::new("demo".to_owned(), Vec::new(), false);
/// assert_eq!(package.item_count, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPackage {
    /// Display name derived from the folder name.
    pub name: String,
    /// Launchable items in document order.
    pub items: Vec<LaunchableItem>,
    /// Number of launchable items.
    pub item_count: usize,
    /// Whether the chosen organization declares sequencing rules.
    pub has_sequencing: bool,
}

impl ResolvedPackage {
    /// Builds a package, deriving the item count from `items`.
    #[must_use]
    pub fn new(name: String, items: Vec<LaunchableItem>, has_sequencing: bool) -> Self {
        Self {
            name,
            item_count: items.len(),
            items,
            has_sequencing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_player_field_names() {
        let package = ResolvedPackage::new(
            "demo".to_owned(),
            vec![LaunchableItem {
                id: "item-1".to_owned(),
                title: "Welcome".to_owned(),
                launch_url: "/uploads/1700-demo/index.html".to_owned(),
                content_type: "sco".to_owned(),
            }],
            true,
        );

        let value = serde_json::to_value(&package).expect("serialize");

        assert_eq!(
            value,
            json!({
                "name": "demo",
                "items": [{
                    "id": "item-1",
                    "title": "Welcome",
                    "launchUrl": "/uploads/1700-demo/index.html",
                    "scormType": "sco",
                }],
                "itemCount": 1,
                "hasSequencing": true,
            })
        );
    }
}
