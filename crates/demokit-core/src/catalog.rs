//! Demo catalog generation.
//!
//! Turns a scan report into a machine-readable JSON document or a
//! human-readable Markdown index of every demo in a workspace.

use serde::{Deserialize, Serialize};

use crate::scan::{DemoEntry, ScanReport};

/// Catalog of all demos found in a workspace.
#[derive(Debug, Serialize, Deserialize)]
pub struct DemoCatalog {
    pub version: String,
    pub workspace: String,
    pub demos: Vec<DemoEntry>,
}

impl DemoCatalog {
    /// Build a catalog from a scan report. Entries are ordered by file
    /// path so catalog output is stable across runs.
    pub fn from_report(workspace: impl Into<String>, report: &ScanReport) -> Self {
        let mut demos = report.entries.clone();
        demos.sort_by(|a, b| a.file.cmp(&b.file));
        Self {
            version: "1.0".to_string(),
            workspace: workspace.into(),
            demos,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Demo catalog\n\n");
        out.push_str(&format!("Workspace: `{}`\n\n", self.workspace));

        if self.demos.is_empty() {
            out.push_str("No demos found.\n");
            return out;
        }

        out.push_str("## Contents\n\n");
        for demo in &self.demos {
            let title = demo_title(demo);
            out.push_str(&format!("- [{}](#{})\n", title, anchor(&title)));
        }
        out.push('\n');

        for demo in &self.demos {
            out.push_str(&format!("## {}\n\n", demo_title(demo)));
            out.push_str(&format!(
                "- File: `{}` (line {})\n- Factory: `{}`\n",
                demo.file, demo.line, demo.function
            ));
            if let Some(slug) = &demo.slug {
                out.push_str(&format!("- Slug: `{slug}`\n"));
            }
            if demo.has_precompute {
                out.push_str("- Precompute: present\n");
            }
            if demo.skip_precompute {
                out.push_str("- Precompute: skipped\n");
            }
            if !demo.variants.is_empty() {
                out.push_str("- Variants:\n");
                for variant in &demo.variants {
                    match &variant.exported_name {
                        Some(exported) => out.push_str(&format!(
                            "  - `{}` from `{}` (export `{}`)\n",
                            variant.name, variant.path, exported
                        )),
                        None => out.push_str(&format!(
                            "  - `{}` from `{}`\n",
                            variant.name, variant.path
                        )),
                    }
                }
            }
            out.push('\n');
        }

        out
    }
}

fn demo_title(demo: &DemoEntry) -> String {
    demo.name.clone().unwrap_or_else(|| demo.file.clone())
}

fn anchor(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == ' ' || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::VariantEntry;

    fn sample_entry(file: &str, name: &str) -> DemoEntry {
        DemoEntry {
            file: file.to_string(),
            function: "createDemo".to_string(),
            name: Some(name.to_string()),
            slug: None,
            variants: vec![VariantEntry {
                name: "Default".to_string(),
                path: "demos/accordion/Accordion".to_string(),
                exported_name: None,
            }],
            line: 3,
            column: 21,
            has_precompute: false,
            skip_precompute: false,
        }
    }

    #[test]
    fn test_catalog_sorted_by_file() {
        let report = ScanReport {
            entries: vec![
                sample_entry("demos/b.ts", "B"),
                sample_entry("demos/a.ts", "A"),
            ],
            ..Default::default()
        };
        let catalog = DemoCatalog::from_report("/app", &report);
        assert_eq!(catalog.demos[0].file, "demos/a.ts");
        assert_eq!(catalog.demos[1].file, "demos/b.ts");
    }

    #[test]
    fn test_json_output() {
        let report = ScanReport {
            entries: vec![sample_entry("demos/a.ts", "Accordion")],
            ..Default::default()
        };
        let catalog = DemoCatalog::from_report("/app", &report);
        let json: serde_json::Value = serde_json::from_str(&catalog.to_json()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["demos"][0]["name"], "Accordion");
        assert_eq!(json["demos"][0]["variants"][0]["name"], "Default");
    }

    #[test]
    fn test_markdown_output() {
        let report = ScanReport {
            entries: vec![sample_entry("demos/a.ts", "Accordion")],
            ..Default::default()
        };
        let markdown = DemoCatalog::from_report("/app", &report).to_markdown();
        assert!(markdown.contains("# Demo catalog"));
        assert!(markdown.contains("- [Accordion](#accordion)"));
        assert!(markdown.contains("## Accordion"));
        assert!(markdown.contains("`demos/a.ts` (line 3)"));
        assert!(markdown.contains("`Default` from `demos/accordion/Accordion`"));
    }

    #[test]
    fn test_markdown_empty() {
        let catalog = DemoCatalog::from_report("/app", &ScanReport::default());
        assert!(catalog.to_markdown().contains("No demos found."));
    }
}
