//! Route table and the static content of the placeholder pages.

use crate::models::NavItem;
use serde_json::{json, Value};

pub const DEFAULT_TITLE: &str = "SalesPro Dashboard";
pub const HOME: &str = "/dashboard";

const NAVIGATION: [(&str, &str); 4] = [
    ("Dashboard", "/dashboard"),
    ("Analytics", "/analytics"),
    ("Inventory", "/inventory"),
    ("Settings", "/settings"),
];

pub fn title_for(path: &str) -> &'static str {
    match path {
        "/dashboard" => "Sales Prediction Dashboard",
        "/analytics" => "Sales Analytics",
        "/inventory" => "Inventory Management",
        "/settings" => "Settings",
        _ => DEFAULT_TITLE,
    }
}

/// Sidebar entries with the one matching `path` marked active.
pub fn nav_items(path: &str) -> Vec<NavItem> {
    NAVIGATION
        .iter()
        .map(|(name, href)| NavItem {
            name: name.to_string(),
            href: href.to_string(),
            active: *href == path,
        })
        .collect()
}

/// Unknown and empty paths land on the dashboard.
pub fn resolve(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => HOME,
        p if NAVIGATION.iter().any(|(_, href)| *href == p) => p,
        _ => HOME,
    }
}

pub fn analytics_page() -> Value {
    json!({
        "title": "No Analytics Data Yet",
        "description": "Start making sales predictions to see your analytics dashboard come to life. Your sales trends, performance metrics, and insights will appear here.",
        "action": { "label": "Make Your First Prediction", "href": HOME },
        "cards": [
            { "title": "Total Predictions", "description": "Track your prediction history", "value": 0 },
            { "title": "Accuracy Rate", "description": "Monitor prediction accuracy", "value": 0 },
            { "title": "Sales Trends", "description": "Visualize sales patterns", "value": 0 },
            { "title": "Performance", "description": "Analyze performance metrics", "value": 0 },
        ],
        "highlights": [
            { "title": "Sales Metrics", "description": "Track total predictions, accuracy rates, and performance trends" },
            { "title": "Visual Charts", "description": "Interactive charts showing sales trends and prediction patterns" },
            { "title": "Insights", "description": "AI-powered insights and recommendations based on your data" },
        ],
    })
}

pub fn inventory_page() -> Value {
    json!({
        "title": "Inventory Management",
        "description": "Manage your product inventory and stock levels",
        "cards": [
            { "title": "Total Products", "value": 0 },
            { "title": "Low Stock Items", "value": 0 },
            { "title": "Out of Stock", "value": 0 },
        ],
        "steps": ["Add Products", "Set Stock Levels", "Monitor & Update"],
    })
}

pub fn settings_page(name: &str, email: &str) -> Value {
    json!({
        "profile": {
            "name": name,
            "email": email,
            "company": "SalesPro Inc.",
            "timezone": "UTC-8",
        },
        "timezones": ["UTC-8", "UTC-5", "UTC+0", "UTC+1"],
        "notifications": { "email": true, "push": false, "sms": true },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_follow_route_table() {
        assert_eq!(title_for("/dashboard"), "Sales Prediction Dashboard");
        assert_eq!(title_for("/inventory"), "Inventory Management");
        assert_eq!(title_for("/reports"), DEFAULT_TITLE);
    }

    #[test]
    fn exactly_one_item_is_active_for_known_paths() {
        let items = nav_items("/analytics");
        let active: Vec<&str> = items
            .iter()
            .filter(|i| i.active)
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(active, vec!["Analytics"]);
        assert!(nav_items("/nowhere").iter().all(|i| !i.active));
    }

    #[test]
    fn resolve_redirects_to_dashboard() {
        assert_eq!(resolve(""), HOME);
        assert_eq!(resolve("/"), HOME);
        assert_eq!(resolve("/settings/"), "/settings");
        assert_eq!(resolve("/unknown"), HOME);
    }
}
