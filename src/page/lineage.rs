use std::collections::{HashMap, HashSet};

use crate::metrics::color::{DEFAULT_BACKGROUND, is_transparent};
use crate::page::element_model::{AncestorNode, ElementId};

// ============================================================================
// Ancestor arena (one batched `ancestors` call per page visit)
// ============================================================================

/// Parent index and computed backgrounds for every element seen in a page
/// visit, materialized from ancestor chains instead of walked live.
///
/// An id with no entry has an unresolvable parent relation.
#[derive(Debug, Default, Clone)]
pub struct Lineage {
    parents: HashMap<ElementId, Option<ElementId>>,
    backgrounds: HashMap<ElementId, String>,
}

impl Lineage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from index-aligned chains; `None` marks an element whose chain
    /// could not be read.
    pub fn from_chains(ids: &[ElementId], chains: Vec<Option<Vec<AncestorNode>>>) -> Self {
        let mut lineage = Lineage::new();
        for (id, chain) in ids.iter().zip(chains) {
            if let Some(chain) = chain {
                lineage.record_chain(*id, &chain);
            }
        }
        lineage
    }

    /// Record `id`'s chain, nearest ancestor first, ending at the root.
    pub fn record_chain(&mut self, id: ElementId, chain: &[AncestorNode]) {
        self.parents.insert(id, chain.first().map(|a| a.id));
        for (i, node) in chain.iter().enumerate() {
            self.parents
                .entry(node.id)
                .or_insert_with(|| chain.get(i + 1).map(|a| a.id));
            self.backgrounds
                .entry(node.id)
                .or_insert_with(|| node.background_color.clone());
        }
    }

    /// Outer `None`: unknown. Inner `None`: document root reached.
    pub fn parent(&self, id: ElementId) -> Option<Option<ElementId>> {
        self.parents.get(&id).copied()
    }

    pub fn background(&self, id: ElementId) -> Option<&str> {
        self.backgrounds.get(&id).map(String::as_str)
    }

    /// Ancestors of `id`, nearest first, as far as the chain is known.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut current = id;
        while let Some(Some(parent)) = self.parent(current) {
            if out.contains(&parent) || out.len() > self.parents.len() {
                break;
            }
            out.push(parent);
            current = parent;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

// ============================================================================
// Ownership dedup
// ============================================================================

/// Elements already admitted into some style group. Only ever grows within a
/// page visit.
#[derive(Debug, Default, Clone)]
pub struct ProcessedElements {
    ids: HashSet<ElementId>,
}

impl ProcessedElements {
    pub fn insert(&mut self, id: ElementId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// True when `id` or any of its ancestors was already admitted.
///
/// Fails open: an unresolvable parent link ends the walk with `false`.
pub fn is_processed_child(id: ElementId, processed: &ProcessedElements, lineage: &Lineage) -> bool {
    if processed.contains(id) {
        return true;
    }
    if lineage.parent(id).is_none() {
        return false;
    }
    lineage
        .ancestors(id)
        .into_iter()
        .any(|ancestor| processed.contains(ancestor))
}

// ============================================================================
// Background resolution
// ============================================================================

fn is_painted(background: &str) -> bool {
    !background.trim().is_empty() && !is_transparent(background)
}

/// The background actually painted behind `id`: its own when opaque, else the
/// nearest non-transparent ancestor's, else white.
pub fn resolve_background(id: ElementId, own_background: &str, lineage: &Lineage) -> String {
    if is_painted(own_background) {
        return own_background.to_string();
    }
    lineage
        .ancestors(id)
        .into_iter()
        .filter_map(|ancestor| lineage.background(ancestor))
        .find(|bg| is_painted(bg))
        .map(str::to_string)
        .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string())
}
