// dashtime - core/links.rs
//
// Dashboard link bar: decides for each configured link whether it renders
// as a plain anchor or a tag-driven dropdown, and filters the dashboards
// returned by a tag search into dropdown entries.
//
// The search request itself belongs to the caller; this module only builds
// the query and post-processes the hits.

use crate::util::constants::DASHBOARD_SEARCH_LIMIT;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A link as stored in the dashboard model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardLink {
    pub title: String,
    pub tags: Vec<String>,
    pub as_dropdown: bool,
    pub exclude_current: bool,
    pub target: Option<String>,
    pub tooltip: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
}

/// One dashboard returned by a tag search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub url: String,
}

/// Tag search the caller should run to populate a dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub tags: Vec<String>,
    pub limit: usize,
}

/// How one link renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkPlan {
    Anchor {
        title: String,
        href: String,
        target: Option<String>,
        icon: &'static str,
        tooltip: Option<String>,
    },
    Dropdown {
        title: String,
        query: SearchQuery,
        exclude_current: bool,
    },
}

/// One row of a populated dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownEntry {
    pub id: u64,
    pub title: String,
    pub href: String,
    /// The dashboard currently being viewed (highlighted in the list).
    pub is_current: bool,
}

/// Map a stored icon name to the icon set used by the link bar.
pub fn icon_for(name: Option<&str>) -> &'static str {
    match name.unwrap_or("external link") {
        "dashboard" => "apps",
        "question" => "question-circle",
        "info" => "info-circle",
        "bolt" => "bolt",
        "doc" => "file-alt",
        "cloud" => "cloud",
        _ => "external-link-alt",
    }
}

/// Neutralise URLs with script-capable schemes. Relative URLs and http(s)
/// and mailto links pass through; anything else becomes `about:blank`.
pub fn sanitize_url(url: &str) -> String {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME.get_or_init(|| {
        Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").expect("links: invalid scheme regex")
    });

    let cleaned: String = url.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();
    match scheme.captures(cleaned) {
        Some(caps) => match caps[1].to_lowercase().as_str() {
            "http" | "https" | "mailto" => cleaned.to_string(),
            _ => "about:blank".to_string(),
        },
        None => cleaned.to_string(),
    }
}

/// Decide how each link renders.
pub fn render_plan(links: &[DashboardLink]) -> Vec<LinkPlan> {
    links
        .iter()
        .map(|link| {
            if link.as_dropdown {
                LinkPlan::Dropdown {
                    title: link.title.clone(),
                    query: SearchQuery {
                        tags: link.tags.clone(),
                        limit: DASHBOARD_SEARCH_LIMIT,
                    },
                    exclude_current: link.exclude_current,
                }
            } else {
                LinkPlan::Anchor {
                    title: link.title.clone(),
                    href: sanitize_url(link.url.as_deref().unwrap_or_default()),
                    target: link.target.clone(),
                    icon: icon_for(link.icon.as_deref()),
                    tooltip: link.tooltip.clone().filter(|t| !t.is_empty()),
                }
            }
        })
        .collect()
}

/// Turn search hits into dropdown rows.
///
/// With `exclude_current` the dashboard being viewed is dropped. A list that
/// would hold a single entry is not worth a dropdown and comes back empty.
pub fn dropdown_entries(
    hits: &[SearchHit],
    current_id: u64,
    exclude_current: bool,
) -> Vec<DropdownEntry> {
    let entries: Vec<DropdownEntry> = hits
        .iter()
        .filter(|hit| hit.id != current_id || !exclude_current)
        .map(|hit| DropdownEntry {
            id: hit.id,
            title: hit.title.clone(),
            href: sanitize_url(&hit.url),
            is_current: hit.id == current_id,
        })
        .collect();

    if entries.len() > 1 {
        entries
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u64, title: &str) -> SearchHit {
        SearchHit {
            id,
            title: title.to_string(),
            url: format!("/d/{id}"),
        }
    }

    #[test]
    fn test_dropdown_marks_current() {
        let hits = vec![hit(1, "Plant"), hit(2, "Mill"), hit(3, "Furnace")];
        let entries = dropdown_entries(&hits, 2, false);
        assert_eq!(entries.len(), 3);
        assert!(entries[1].is_current);
        assert!(!entries[0].is_current);
    }

    #[test]
    fn test_dropdown_excludes_current() {
        let hits = vec![hit(1, "Plant"), hit(2, "Mill"), hit(3, "Furnace")];
        let entries = dropdown_entries(&hits, 2, true);
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_single_entry_dropdown_is_empty() {
        let hits = vec![hit(1, "Plant"), hit(2, "Mill")];
        assert!(dropdown_entries(&hits, 2, true).is_empty());
        assert!(dropdown_entries(&hits[..1], 9, false).is_empty());
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(sanitize_url("https://example.com/a"), "https://example.com/a");
        assert_eq!(sanitize_url("/d/abc?orgId=1"), "/d/abc?orgId=1");
        assert_eq!(sanitize_url("javascript:alert(1)"), "about:blank");
        assert_eq!(sanitize_url("java\nscript:alert(1)"), "about:blank");
        assert_eq!(sanitize_url("mailto:ops@example.com"), "mailto:ops@example.com");
    }

    #[test]
    fn test_render_plan() {
        let links = vec![
            DashboardLink {
                title: "Docs".to_string(),
                url: Some("https://docs.example.com".to_string()),
                icon: Some("doc".to_string()),
                tooltip: Some(String::new()),
                ..Default::default()
            },
            DashboardLink {
                title: "Related".to_string(),
                tags: vec!["mill".to_string()],
                as_dropdown: true,
                exclude_current: true,
                ..Default::default()
            },
        ];
        let plan = render_plan(&links);
        assert_eq!(
            plan[0],
            LinkPlan::Anchor {
                title: "Docs".to_string(),
                href: "https://docs.example.com".to_string(),
                target: None,
                icon: "file-alt",
                tooltip: None,
            }
        );
        match &plan[1] {
            LinkPlan::Dropdown {
                query,
                exclude_current,
                ..
            } => {
                assert_eq!(query.limit, DASHBOARD_SEARCH_LIMIT);
                assert_eq!(query.tags, vec!["mill".to_string()]);
                assert!(*exclude_current);
            }
            other => panic!("expected dropdown, got {other:?}"),
        }
    }

    #[test]
    fn test_link_deserialises_camel_case() {
        let link: DashboardLink =
            serde_json::from_str(r#"{"title":"x","asDropdown":true,"excludeCurrent":true}"#)
                .unwrap();
        assert!(link.as_dropdown);
        assert!(link.exclude_current);
        assert!(link.tags.is_empty());
    }
}
