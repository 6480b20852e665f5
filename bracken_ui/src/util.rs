// Copyright 2026 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-link helpers shared by the builder, signal, layout, and draw walks.

use bracken_store::{KeyedStore, SlotId};

use crate::node::Node;

/// Children of `slot` in link order.
pub(crate) fn children_of(store: &KeyedStore<Node>, slot: SlotId) -> Vec<SlotId> {
    let mut out = Vec::new();
    let mut child = store.value(slot).and_then(|n| n.first);
    while let Some(c) = child {
        out.push(c);
        child = store.value(c).and_then(|n| n.next);
    }
    out
}

/// Append the subtree at `slot` to `out` in pre-order (render order).
pub(crate) fn collect_preorder(store: &KeyedStore<Node>, slot: SlotId, out: &mut Vec<SlotId>) {
    if store.value(slot).is_none() {
        return;
    }
    out.push(slot);
    for child in children_of(store, slot) {
        collect_preorder(store, child, out);
    }
}

/// Append `child` to `parent`'s child list, fixing sibling links.
pub(crate) fn link_child(store: &mut KeyedStore<Node>, parent: SlotId, child: SlotId) {
    let prev = {
        let Some(parent_node) = store.value_mut(parent) else {
            return;
        };
        let prev = parent_node.last;
        parent_node.last = Some(child);
        if parent_node.first.is_none() {
            parent_node.first = Some(child);
        }
        parent_node.child_count += 1;
        prev
    };
    if let Some(prev_slot) = prev
        && let Some(prev_node) = store.value_mut(prev_slot)
    {
        prev_node.next = Some(child);
    }
    if let Some(child_node) = store.value_mut(child) {
        child_node.prev = prev;
        child_node.parent = Some(parent);
    }
}
