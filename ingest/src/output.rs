//! Output formatting for resolved packages.
//!
//! Results are printed either as a short human-readable report or as the
//! JSON document the player consumes.

use std::io::Write;

use crate::manifest::ResolvedPackage;

/// Format a resolved package for human-readable output.
///
/// # Examples
///
/// ```
/// use coursepack_ingest::manifest::ResolvedPackage;
/// use coursepack_ingest::output::format_human;
///
/// let package = ResolvedPackage::new("demo".to_owned(), Vec::new(), false);
/// let output = format_human(&package);
/// assert!(output.contains("Package: demo"));
/// assert!(output.contains("No launchable items"));
/// ```
#[must_use]
pub fn format_human(package: &ResolvedPackage) -> String {
    let sequencing = if package.has_sequencing { "yes" } else { "no" };
    let mut output = format!(
        "Package: {}\nItems: {}\nSequencing: {sequencing}\n",
        package.name, package.item_count
    );

    if package.items.is_empty() {
        output.push_str("\nNo launchable items.\n");
        return output;
    }

    output.push('\n');
    for item in &package.items {
        let kind = if item.content_type.is_empty() {
            String::new()
        } else {
            format!(" [{}]", item.content_type)
        };
        output.push_str(&format!("  {}{kind}: {}\n", item.title, item.id));
        output.push_str(&format!("    {}\n", item.launch_url));
    }
    output
}

/// Format a resolved package as pretty-printed JSON.
#[must_use]
pub fn format_json(package: &ResolvedPackage) -> String {
    serde_json::to_string_pretty(package).unwrap_or_else(|_| "{}".to_owned())
}

/// Writes a single line to `stderr`, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::LaunchableItem;
    use rstest::{fixture, rstest};

    #[fixture]
    fn package() -> ResolvedPackage {
        ResolvedPackage::new(
            "demo".to_owned(),
            vec![
                LaunchableItem {
                    id: "item-1".to_owned(),
                    title: "Welcome".to_owned(),
                    launch_url: "/uploads/1700-demo/index.html".to_owned(),
                    content_type: "sco".to_owned(),
                },
                LaunchableItem {
                    id: "item-2".to_owned(),
                    title: "Glossary".to_owned(),
                    launch_url: "/uploads/1700-demo/glossary.html".to_owned(),
                    content_type: String::new(),
                },
            ],
            true,
        )
    }

    #[rstest]
    fn human_output_lists_items(package: ResolvedPackage) {
        let output = format_human(&package);

        assert!(output.contains("Package: demo"));
        assert!(output.contains("Items: 2"));
        assert!(output.contains("Sequencing: yes"));
        assert!(output.contains("  Welcome [sco]: item-1\n    /uploads/1700-demo/index.html"));
        assert!(output.contains("  Glossary: item-2\n"));
    }

    #[rstest]
    fn json_output_uses_player_field_names(package: ResolvedPackage) {
        let output = format_json(&package);
        let value: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");

        assert_eq!(value["itemCount"], 2);
        assert_eq!(value["hasSequencing"], true);
        assert_eq!(value["items"][0]["launchUrl"], "/uploads/1700-demo/index.html");
        assert_eq!(value["items"][0]["scormType"], "sco");
    }

    #[test]
    fn write_stderr_line_appends_newline() {
        let mut buffer = Vec::new();
        write_stderr_line(&mut buffer, "done");
        assert_eq!(buffer, b"done\n");
    }
}
