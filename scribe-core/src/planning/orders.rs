//! Order planner: union of the leading diagnoses' recommended orders.

use crate::engine::EngineConfig;
use crate::ipc::view::{Diff, Order, OrderKind};
use crate::knowledge::KnowledgeBase;

use super::leading_definitions;

/// `Imaging` when `name` contains `imaging_marker` ignoring case, else `Lab`.
pub fn classify_order(name: &str, imaging_marker: &str) -> OrderKind {
    if name
        .to_lowercase()
        .contains(&imaging_marker.to_lowercase())
    {
        OrderKind::Imaging
    } else {
        OrderKind::Lab
    }
}

/// De-duplicated orders of the leading diagnoses, first-seen order.
pub fn plan_orders(kb: &KnowledgeBase, diffs: &[Diff], config: &EngineConfig) -> Vec<Order> {
    let mut names: Vec<&str> = Vec::new();
    for dx in leading_definitions(kb, diffs, config.order_depth) {
        for order in &dx.recommended_orders {
            if !names.contains(&order.as_str()) {
                names.push(order.as_str());
            }
        }
    }

    names
        .into_iter()
        .map(|name| Order {
            name: name.to_string(),
            kind: classify_order(name, &config.imaging_marker),
        })
        .collect()
}
