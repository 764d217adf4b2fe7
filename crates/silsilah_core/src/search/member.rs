//! Name search in breadth-first order.

use crate::model::tree::{FamilyTree, PersonNode};

/// First person whose name contains `query`, or `None` for a blank query.
pub fn search_member<'a>(tree: &'a FamilyTree, query: &str) -> Option<&'a PersonNode> {
    let needle = normalize_query(query)?;
    tree.descendants()
        .into_iter()
        .find(|node| matches(node, &needle))
}

/// Every matching person, capped at `limit`.
pub fn search_members<'a>(tree: &'a FamilyTree, query: &str, limit: usize) -> Vec<&'a PersonNode> {
    let Some(needle) = normalize_query(query) else {
        return Vec::new();
    };
    tree.descendants()
        .into_iter()
        .filter(|node| matches(node, &needle))
        .take(limit)
        .collect()
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

fn matches(node: &PersonNode, needle: &str) -> bool {
    node.record().display_name().to_lowercase().contains(needle)
}
