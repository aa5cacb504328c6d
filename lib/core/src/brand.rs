//! Brand synonym table
//!
//! Maps Korean brand names to their English (or alternate) spellings and back.
//! The reverse map is always generated from the forward entries.

use crate::text::normalize;
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use serde_json::Value;
use std::path::Path;

/// Built-in brand entries, in matching order
const DEFAULT_BRANDS: &[(&str, &[&str])] = &[
    ("비비고", &["bibigo"]),
    ("비비드", &["vivid"]),
    ("비비드키친", &["vividkitchen"]),
    ("코카콜라", &["cocacola", "cola", "coke"]),
    ("펩시", &["pepsi"]),
    ("삼양", &["samyang"]),
    ("오뚜기", &["ottogi"]),
    ("농심", &["nongshim"]),
    ("롯데", &["lotte"]),
    ("노브랜드", &["nobrand"]),
    ("마이노멀", &["mynormal"]),
    ("라라스윗", &["lalasweet"]),
    ("씨유", &["비지에프"]),
    ("시유", &["비지에프"]),
];

/// One forward entry: a Korean brand and its variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandEntry {
    pub korean: String,
    /// Never empty
    pub variants: Vec<String>,
}

/// Bidirectional Korean/English brand table
#[derive(Debug, Clone)]
pub struct BrandTable {
    entries: Vec<BrandEntry>,
    forward: AHashMap<String, usize>,
    reverse: AHashMap<String, String>,
}

impl BrandTable {
    /// Build a table from ordered entries.
    ///
    /// Entries with no variants are rejected. When two Korean keys share a
    /// variant, the later key owns it in the reverse map.
    pub fn new(entries: Vec<BrandEntry>) -> Result<Self> {
        if let Some(entry) = entries.iter().find(|e| e.variants.is_empty()) {
            return Err(Error::InvalidConfig(format!(
                "brand '{}' has no variants",
                entry.korean
            )));
        }
        Ok(Self::build(entries))
    }

    fn build(entries: Vec<BrandEntry>) -> Self {
        let mut forward = AHashMap::with_capacity(entries.len());
        let mut reverse = AHashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            forward.insert(entry.korean.clone(), idx);
            for variant in &entry.variants {
                reverse.insert(variant.to_lowercase(), entry.korean.clone());
            }
        }

        Self { entries, forward, reverse }
    }

    /// Parse a JSON object of `korean -> variant | [variants]`, keeping key order.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| Error::InvalidConfig("brand table must be a JSON object".to_string()))?;

        let mut entries = Vec::with_capacity(object.len());
        for (korean, raw) in object {
            let variants = match raw {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| {
                        item.as_str().map(str::to_string).ok_or_else(|| {
                            Error::InvalidConfig(format!(
                                "brand '{}' has a non-string variant",
                                korean
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                _ => {
                    return Err(Error::InvalidConfig(format!(
                        "brand '{}' must map to a string or a list of strings",
                        korean
                    )))
                }
            };
            entries.push(BrandEntry { korean: korean.clone(), variants });
        }

        Self::new(entries)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn entries(&self) -> &[BrandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Variants for a Korean key
    pub fn variants(&self, korean: &str) -> Option<&[String]> {
        self.forward.get(korean).map(|&idx| self.entries[idx].variants.as_slice())
    }

    /// Korean key owning a (lowercase) variant
    pub fn korean_for(&self, variant: &str) -> Option<&str> {
        self.reverse.get(variant).map(String::as_str)
    }

    /// First brand whose Korean name occurs in `product_name`, with its
    /// primary variant.
    pub fn detect(&self, product_name: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|entry| product_name.contains(entry.korean.as_str()))
            .map(|entry| (entry.korean.as_str(), entry.variants[0].as_str()))
    }

    /// All known forms of a keyword: itself plus its synonyms in both
    /// directions, every form normalized.
    pub fn expand(&self, keyword: &str) -> AHashSet<String> {
        let keyword = normalize(keyword);
        let mut expanded = AHashSet::new();

        if let Some(variants) = self.variants(&keyword) {
            expanded.extend(variants.iter().map(|v| normalize(v)));
        }
        if let Some(korean) = self.korean_for(&keyword) {
            expanded.insert(normalize(korean));
        }

        expanded.insert(keyword);
        expanded
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        let entries = DEFAULT_BRANDS
            .iter()
            .map(|(korean, variants)| BrandEntry {
                korean: korean.to_string(),
                variants: variants.iter().map(|v| v.to_string()).collect(),
            })
            .collect();
        Self::build(entries)
    }
}
