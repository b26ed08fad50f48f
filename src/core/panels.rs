// dashtime - core/panels.rs
//
// Panel list statistics for the dashboard settings view: how many panels
// carry alerts, descriptions and repeats, and which data sources they use.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The subset of a dashboard panel the settings view needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Panel {
    pub id: u64,
    #[serde(rename = "type")]
    pub panel_type: String,
    pub title: String,
    pub description: Option<String>,
    pub datasource: Option<String>,
    /// Template variable this panel repeats over.
    pub repeat: Option<String>,
    /// Set on the generated copies of a repeated panel.
    pub repeat_panel_id: Option<u64>,
    /// Alert rule definition, kept opaque.
    pub alert: Option<serde_json::Value>,
}

impl Panel {
    pub fn is_row(&self) -> bool {
        self.panel_type == "row"
    }
}

/// One data source and how many listed panels query it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceUsage {
    pub name: String,
    /// Settings page link, when the data source is known.
    pub url: Option<String>,
    pub count: usize,
}

/// Aggregated panel statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelStats {
    pub alerts: usize,
    pub descriptions: usize,
    pub repeats: usize,
    /// Ids of the listed panels (repeat copies excluded), in dashboard order.
    pub panel_ids: Vec<u64>,
    /// Most used first; ties by name.
    pub datasources: Vec<DatasourceUsage>,
}

impl PanelStats {
    /// `known_datasources` maps data source names to their numeric ids.
    pub fn collect(panels: &[Panel], known_datasources: &HashMap<String, u64>) -> Self {
        let mut stats = Self::default();
        let mut usage: HashMap<&str, usize> = HashMap::new();

        for panel in panels.iter().filter(|p| p.repeat_panel_id.is_none()) {
            stats.panel_ids.push(panel.id);
            if panel.alert.is_some() {
                stats.alerts += 1;
            }
            if panel.description.as_deref().is_some_and(|d| !d.is_empty()) {
                stats.descriptions += 1;
            }
            if panel.repeat.as_deref().is_some_and(|r| !r.is_empty()) {
                stats.repeats += 1;
            }
            if let Some(ds) = panel.datasource.as_deref().filter(|d| !d.is_empty()) {
                *usage.entry(ds).or_insert(0) += 1;
            }
        }

        stats.datasources = usage
            .into_iter()
            .map(|(name, count)| DatasourceUsage {
                name: name.to_string(),
                url: known_datasources
                    .get(name)
                    .map(|id| format!("datasources/edit/{id}")),
                count,
            })
            .collect();
        stats
            .datasources
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        stats
    }
}

/// Logos a panel plugin ships with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginLogos {
    pub small: Option<String>,
    pub large: Option<String>,
}

/// Icon for a panel in the list: the plugin's small logo, then its large
/// logo, then the generic row or panel icon.
pub fn panel_icon(panel: &Panel, plugins: &HashMap<String, PluginLogos>) -> String {
    use crate::util::constants::{PANEL_ICON, ROW_ICON};

    if let Some(logos) = plugins.get(&panel.panel_type) {
        if let Some(logo) = logos.small.as_ref().or(logos.large.as_ref()) {
            return logo.clone();
        }
    }
    if panel.is_row() {
        ROW_ICON.to_string()
    } else {
        PANEL_ICON.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(id: u64, ds: Option<&str>) -> Panel {
        Panel {
            id,
            panel_type: "graph".to_string(),
            datasource: ds.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_counts_and_skips_repeat_copies() {
        let mut with_alert = panel(1, Some("influx"));
        with_alert.alert = Some(serde_json::json!({"name": "high temp"}));
        with_alert.description = Some("Furnace temperature".to_string());

        let mut repeated = panel(2, Some("influx"));
        repeated.repeat = Some("furnace".to_string());

        let mut copy = panel(3, Some("influx"));
        copy.repeat_panel_id = Some(2);

        let mut empty_desc = panel(4, Some("mysql"));
        empty_desc.description = Some(String::new());

        let panels = vec![with_alert, repeated, copy, empty_desc, panel(5, None)];
        let mut known = HashMap::new();
        known.insert("influx".to_string(), 7);

        let stats = PanelStats::collect(&panels, &known);
        assert_eq!(stats.panel_ids, vec![1, 2, 4, 5]);
        assert_eq!(stats.alerts, 1);
        assert_eq!(stats.descriptions, 1);
        assert_eq!(stats.repeats, 1);
        assert_eq!(
            stats.datasources,
            vec![
                DatasourceUsage {
                    name: "influx".to_string(),
                    url: Some("datasources/edit/7".to_string()),
                    count: 2,
                },
                DatasourceUsage {
                    name: "mysql".to_string(),
                    url: None,
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn test_panel_icon_priority() {
        let mut plugins = HashMap::new();
        plugins.insert(
            "graph".to_string(),
            PluginLogos {
                small: None,
                large: Some("img/graph_large.svg".to_string()),
            },
        );
        assert_eq!(panel_icon(&panel(1, None), &plugins), "img/graph_large.svg");

        let row = Panel {
            panel_type: "row".to_string(),
            ..Default::default()
        };
        assert_eq!(panel_icon(&row, &plugins), crate::util::constants::ROW_ICON);

        let text = Panel {
            panel_type: "text".to_string(),
            ..Default::default()
        };
        assert_eq!(panel_icon(&text, &plugins), crate::util::constants::PANEL_ICON);
    }
}
