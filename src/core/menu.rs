// dashtime - core/menu.rs
//
// Side-menu top section and the overlay navigation menu.
//
// The overlay menu is itself a dashboard: its menu-link panels hold the
// entries. Clicking an entry opens a sub-menu, jumps to a dashboard, or
// follows a plain URL.

use crate::util::constants::{DEFAULT_MENU_ID, MENU_LINK_PANEL_TYPE};
use serde::{Deserialize, Serialize};

// =============================================================================
// Side menu
// =============================================================================

/// UI colour theme currently in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Entry of the server-provided navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub hide_from_menu: bool,
}

/// What clicking a side-menu item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideMenuAction {
    OpenMenu,
    OpenSearch,
    Navigate(String),
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideMenuItem {
    pub text: String,
    pub icon: String,
    pub action: SideMenuAction,
}

impl SideMenuItem {
    fn new(text: &str, icon: &str, action: SideMenuAction) -> Self {
        Self {
            text: text.to_string(),
            icon: icon.to_string(),
            action,
        }
    }
}

/// Items of the side menu's top section, in display order: menu, search,
/// the visible navigation entries, then the theme switch.
pub fn top_section(nav_tree: &[NavItem], theme: Theme) -> Vec<SideMenuItem> {
    let mut items = vec![
        SideMenuItem::new("Menu", "bars", SideMenuAction::OpenMenu),
        SideMenuItem::new("Search", "search", SideMenuAction::OpenSearch),
    ];

    items.extend(nav_tree.iter().filter(|n| !n.hide_from_menu).map(|n| SideMenuItem {
        text: n.text.clone(),
        icon: n.icon.clone().unwrap_or_default(),
        action: SideMenuAction::Navigate(n.url.clone().unwrap_or_default()),
    }));

    items.push(match theme {
        Theme::Dark => SideMenuItem::new("Switch to light theme", "sun", SideMenuAction::ToggleTheme),
        Theme::Light => SideMenuItem::new("Switch to dark theme", "moon", SideMenuAction::ToggleTheme),
    });
    items
}

// =============================================================================
// Overlay menu
// =============================================================================

/// Options of a menu-link panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MenuLink {
    pub display_name: String,
    /// "menu", "dashboard", or anything else for a plain URL.
    pub link_type: String,
    pub menu_link: String,
    pub dashboard_link: String,
    pub url_link: String,
}

/// Panel of a menu dashboard; only menu-link panels are entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPanel {
    #[serde(rename = "type")]
    pub panel_type: String,
    #[serde(default)]
    pub options: MenuLink,
}

/// Result of clicking an overlay menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Load the menu dashboard with this uid and show its entries.
    OpenSubMenu(String),
    /// The entry points at the dashboard already open; close the overlay.
    Dismiss,
    /// Leave for this location.
    Navigate(String),
}

/// Entries of a menu dashboard.
pub fn menu_links(panels: &[MenuPanel]) -> Vec<MenuLink> {
    panels
        .iter()
        .filter(|p| p.panel_type == MENU_LINK_PANEL_TYPE)
        .map(|p| p.options.clone())
        .collect()
}

/// Decide what a click on `link` does while `current_uid` is open.
pub fn resolve_menu_click(link: &MenuLink, current_uid: Option<&str>) -> MenuAction {
    match link.link_type.as_str() {
        "menu" => MenuAction::OpenSubMenu(link.menu_link.clone()),
        "dashboard" if current_uid == Some(link.dashboard_link.as_str()) => MenuAction::Dismiss,
        "dashboard" => MenuAction::Navigate(format!("/d/{}", link.dashboard_link)),
        _ => MenuAction::Navigate(link.url_link.clone()),
    }
}

/// Overlay menu state: which menu dashboard is shown and its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMenu {
    pub current_uid: Option<String>,
    pub menu_id: String,
    pub links: Vec<MenuLink>,
}

impl OverlayMenu {
    /// Start at the dashboard's own menu if it names one, else the root menu.
    pub fn new(current_uid: Option<String>, dashboard_menu_id: Option<&str>) -> Self {
        let menu_id = dashboard_menu_id
            .filter(|id| !id.is_empty() && *id != "0")
            .unwrap_or(DEFAULT_MENU_ID)
            .to_string();
        Self {
            current_uid,
            menu_id,
            links: Vec::new(),
        }
    }

    /// Replace the entries with those of a freshly loaded menu dashboard.
    pub fn load(&mut self, menu_id: &str, panels: &[MenuPanel]) {
        self.menu_id = menu_id.to_string();
        self.links = menu_links(panels);
        tracing::debug!(menu = %self.menu_id, entries = self.links.len(), "Menu loaded");
    }

    /// True when the entry points at the dashboard being viewed.
    pub fn is_selected(&self, link: &MenuLink) -> bool {
        link.link_type == "dashboard"
            && self.current_uid.as_deref() == Some(link.dashboard_link.as_str())
    }

    pub fn click(&self, index: usize) -> Option<MenuAction> {
        self.links
            .get(index)
            .map(|link| resolve_menu_click(link, self.current_uid.as_deref()))
    }

    pub fn title(&self) -> String {
        format!(
            "Menu - {} - {}",
            self.menu_id,
            self.current_uid.as_deref().unwrap_or_default()
        )
    }
}
