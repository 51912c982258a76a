//! Resolution steps from descriptor text to [`ResolvedPackage`].

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use coursepack_common::display_name;
use log::{debug, trace};
use roxmltree::{Document, Node, ParsingOptions};

use super::document::{
    MANIFEST_FILE_NAME, declares_sequencing, elements, is_element, non_empty_attribute,
    resource_type, title_of,
};
use super::error::{ResolutionError, Result};
use super::model::{LaunchableItem, ResolvedPackage, ResourceEntry};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Resolve the manifest of the package extracted at `extracted_dir`.
///
/// The final component of the canonicalized directory is the folder name
/// used in launch URLs and for the display name.
///
/// # Errors
///
/// Returns [`ResolutionError::ManifestMissing`] when `imsmanifest.xml` does
/// not exist, [`ResolutionError::ManifestParse`] when it cannot be read or
/// parsed, and the remaining variants as described by [`resolve_document`].
pub fn resolve(extracted_dir: &Path, url_prefix: &str) -> Result<ResolvedPackage> {
    let manifest_path = extracted_dir.join(MANIFEST_FILE_NAME);
    let xml = fs::read_to_string(&manifest_path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            ResolutionError::ManifestMissing {
                path: manifest_path.clone(),
            }
        } else {
            ResolutionError::ManifestParse {
                reason: format!("cannot read {}: {err}", manifest_path.display()),
            }
        }
    })?;

    let folder_name = folder_name_of(extracted_dir)?;
    debug!("resolving {} for folder {folder_name}", manifest_path.display());
    resolve_document(&xml, &folder_name, url_prefix)
}

/// Final component of the canonical form of `extracted_dir`, so `.` and
/// `sub/..` name the real package folder.
fn folder_name_of(extracted_dir: &Path) -> Result<String> {
    let canonical =
        fs::canonicalize(extracted_dir).map_err(|err| ResolutionError::ManifestParse {
            reason: format!("cannot resolve {}: {err}", extracted_dir.display()),
        })?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ResolutionError::ManifestParse {
            reason: format!("{} has no folder name", canonical.display()),
        })
}

/// Resolve manifest text for the package stored in `folder_name`.
///
/// # Errors
///
/// Returns [`ResolutionError::ManifestParse`] for malformed XML,
/// [`ResolutionError::OrganizationsMissing`] or
/// [`ResolutionError::OrganizationMissing`] when no organization can be
/// chosen, and [`ResolutionError::DanglingResourceReference`] when an item
/// references an undeclared resource.
///
/// # Examples
///
/// ```
/// use coursepack_ingest::manifest::resolve_document;
///
/// let xml = r#"<manifest>
///   <organizations><organization identifier="org">
///     <item identifier="i1" identifierref="r1" parameters="?p=1"><title>Intro</title></item>
///   </organization></organizations>
///   <resources><resource identifier="r1" href="index.html"/></resources>
/// </manifest>"#;
///
/// let package = resolve_document(xml, "1700-demo", "/uploads/").expect("resolves");
/// assert_eq!(package.name, "demo");
/// assert_eq!(package.items[0].launch_url, "/uploads/1700-demo/index.html?p=1");
/// ```
pub fn resolve_document(xml: &str, folder_name: &str, url_prefix: &str) -> Result<ResolvedPackage> {
    let mut options = ParsingOptions::default();
    options.allow_dtd = true;
    let text = xml.strip_prefix(BYTE_ORDER_MARK).unwrap_or(xml);
    let document =
        Document::parse_with_options(text, options).map_err(|err| ResolutionError::ManifestParse {
            reason: err.to_string(),
        })?;

    let resources = index_resources(&document);
    let organization = select_organization(&document)?;
    let has_sequencing = declares_sequencing(organization);
    let base_url = format!("{url_prefix}{folder_name}/");
    let items = launchable_items(organization, &resources, &base_url)?;

    debug!(
        "resolved {} launchable items for {folder_name} (sequencing: {has_sequencing})",
        items.len()
    );
    Ok(ResolvedPackage::new(
        display_name(folder_name).to_owned(),
        items,
        has_sequencing,
    ))
}

/// Index every resource in the document by identifier. Later declarations
/// replace earlier ones.
fn index_resources(document: &Document<'_>) -> HashMap<String, ResourceEntry> {
    let mut index = HashMap::new();
    for resource in elements(document.root(), "resource") {
        let Some(identifier) = non_empty_attribute(resource, "identifier") else {
            trace!("skipping resource without identifier");
            continue;
        };
        let entry = ResourceEntry {
            identifier: identifier.to_owned(),
            href: resource.attribute("href").unwrap_or_default().to_owned(),
            content_type: resource_type(resource).unwrap_or_default().to_owned(),
        };
        if index.insert(identifier.to_owned(), entry).is_some() {
            trace!("resource {identifier} declared again; keeping the later declaration");
        }
    }
    index
}

/// Choose the declared default organization, falling back to the first one.
fn select_organization<'a, 'input>(document: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    let organizations = elements(document.root(), "organizations")
        .next()
        .ok_or(ResolutionError::OrganizationsMissing)?;
    let default = non_empty_attribute(organizations, "default");

    let declared = default.and_then(|wanted| {
        elements(organizations, "organization")
            .find(|candidate| candidate.attribute("identifier") == Some(wanted))
    });
    if let Some(organization) = declared {
        trace!("using default organization {}", default.unwrap_or_default());
        return Ok(organization);
    }

    let first = elements(organizations, "organization")
        .next()
        .ok_or(ResolutionError::OrganizationMissing)?;
    match default {
        Some(wanted) => trace!("default organization {wanted} not found; using the first"),
        None => trace!("no default organization declared; using the first"),
    }
    Ok(first)
}

/// Collect items carrying a resource reference in pre-order.
fn launchable_items(
    organization: Node<'_, '_>,
    resources: &HashMap<String, ResourceEntry>,
    base_url: &str,
) -> Result<Vec<LaunchableItem>> {
    organization
        .descendants()
        .filter(|node| is_element(*node, "item"))
        .filter_map(|item| {
            non_empty_attribute(item, "identifierref").map(|reference| (item, reference))
        })
        .map(|(item, reference)| -> Result<LaunchableItem> {
            let id = item.attribute("identifier").unwrap_or_default();
            let resource =
                resources
                    .get(reference)
                    .ok_or_else(|| ResolutionError::DanglingResourceReference {
                        item: id.to_owned(),
                        reference: reference.to_owned(),
                    })?;
            let parameters = item.attribute("parameters").unwrap_or_default();
            Ok(LaunchableItem {
                id: id.to_owned(),
                title: title_of(item),
                launch_url: format!("{base_url}{}{parameters}", resource.href),
                content_type: resource.content_type.clone(),
            })
        })
        .collect()
}
