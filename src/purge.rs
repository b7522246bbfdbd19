//! Deletion ordering for purges.
//!
//! The order comes from a hand-maintained priority list, most dependent tables first (junction and
//! child tables before the roots they reference). It is not derived from foreign-key metadata and
//! does not detect cycles; the backend's cascading delete covers any ordering mistakes.

use std::collections::HashSet;

use crate::types::TableDescriptor;

/// Built-in priority list, children before parents.
pub const DEFAULT_PRIORITY: &[&str] = &[
    "order_item_modifiers",
    "order_items",
    "payments",
    "deliveries",
    "orders",
    "cart_items",
    "carts",
    "reviews",
    "favorites",
    "menu_item_modifiers",
    "modifiers",
    "menu_item_tags",
    "tags",
    "menu_items",
    "menu_categories",
    "menus",
    "restaurant_hours",
    "restaurant_staff",
    "restaurants",
    "addresses",
    "user_roles",
    "roles",
    "users",
];

/// Orders discovered tables for safe deletion.
#[derive(Debug, Clone)]
pub struct PurgeScheduler {
    priority: Vec<String>,
}

impl Default for PurgeScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY.iter().map(|s| s.to_string()))
    }
}

impl PurgeScheduler {
    /// Scheduler over a custom priority list.
    pub fn new(priority: impl IntoIterator<Item = String>) -> Self {
        Self {
            priority: priority.into_iter().collect(),
        }
    }

    /// Attach each table's rank in the priority list.
    pub fn describe(&self, tables: &[String]) -> Vec<TableDescriptor> {
        tables
            .iter()
            .map(|name| TableDescriptor {
                name: name.clone(),
                priority: self.priority.iter().position(|p| p == name),
            })
            .collect()
    }

    /// Deletion order for `discovered`.
    ///
    /// Listed tables come first in list order, then unlisted tables sorted by name. The output is
    /// always a permutation of the (deduplicated) input.
    pub fn schedule(&self, discovered: &[String]) -> Vec<String> {
        let mut listed: Vec<TableDescriptor> = Vec::new();
        let mut unlisted: Vec<TableDescriptor> = Vec::new();
        let mut seen = HashSet::new();
        for descriptor in self.describe(discovered) {
            if !seen.insert(descriptor.name.clone()) {
                continue;
            }
            match descriptor.priority {
                Some(_) => listed.push(descriptor),
                None => unlisted.push(descriptor),
            }
        }
        listed.sort_by_key(|d| d.priority);
        unlisted.sort_by(|a, b| a.name.cmp(&b.name));
        listed.into_iter().chain(unlisted).map(|d| d.name).collect()
    }
}
