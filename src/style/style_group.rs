use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::page::element_model::ElementId;

/// Font size assumed when the computed value is not in px.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// `"14.5px"` → 14.5; anything else → 16.
pub fn parse_font_size_px(font_size: &str) -> f64 {
    font_size
        .trim()
        .strip_suffix("px")
        .and_then(|n| n.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(DEFAULT_FONT_SIZE_PX)
}

/// Literal style signature shared by visually identical elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleGroupKey {
    pub font_size: Arc<str>,
    pub text_color: Arc<str>,
    pub background_color: Arc<str>,
}

impl StyleGroupKey {
    pub fn font_size_px(&self) -> f64 {
        parse_font_size_px(&self.font_size)
    }
}

/// Deduplicates the style literals a page repeats thousands of times.
#[derive(Debug, Default)]
pub struct StyleInterner {
    strings: HashSet<Arc<str>>,
}

impl StyleInterner {
    pub fn intern(&mut self, value: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(value) {
            return Arc::clone(existing);
        }
        let interned: Arc<str> = Arc::from(value);
        self.strings.insert(Arc::clone(&interned));
        interned
    }

    pub fn key(&mut self, font_size: &str, text_color: &str, background_color: &str) -> StyleGroupKey {
        StyleGroupKey {
            font_size: self.intern(font_size),
            text_color: self.intern(text_color),
            background_color: self.intern(background_color),
        }
    }

    pub fn clear(&mut self) {
        self.strings.clear();
    }
}

/// One admitted element, as stored inside its style group.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    pub id: ElementId,
    pub index: usize,
    pub text: String,
    pub is_button: bool,
    pub has_icon: bool,
    pub width: f64,
    pub height: f64,
    pub font_size_px: f64,
}

/// Style key → admitted records, iterated in first-seen key order.
#[derive(Debug, Default)]
pub struct StyleGroups {
    order: Vec<StyleGroupKey>,
    groups: HashMap<StyleGroupKey, Vec<ElementRecord>>,
}

impl StyleGroups {
    pub fn push(&mut self, key: StyleGroupKey, record: ElementRecord) {
        match self.groups.get_mut(&key) {
            Some(records) => records.push(record),
            None => {
                self.order.push(key.clone());
                self.groups.insert(key, vec![record]);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StyleGroupKey, &[ElementRecord])> {
        self.order
            .iter()
            .filter_map(|key| self.groups.get(key).map(|records| (key, records.as_slice())))
    }

    pub fn records(&self) -> impl Iterator<Item = &ElementRecord> {
        self.iter().flat_map(|(_, records)| records.iter())
    }

    /// Number of distinct style signatures.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of admitted elements across all groups.
    pub fn total_elements(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.groups.clear();
    }
}
