//! Per-scope, per-subject attribute storage.
//!
//! Attributes are keyed by their normalized label (trimmed, internal
//! whitespace collapsed, lowercased) while the stored label keeps the casing
//! and spacing of the most recent write. Sets keep insertion order; an
//! overwrite keeps the attribute in place.
//!
//! The `NAME` attribute is reserved for the display-name override and can
//! only be written or removed through [`AttributeStore::set_display_name`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::error::{TableError, TableResult};

/// Normalized key of the reserved display-name attribute.
pub const NAME_KEY: &str = "name";

const NAME_LABEL: &str = "NAME";
const CLEAR_NAME: &str = "clear";

static EMPTY_SET: AttributeSet = AttributeSet {
    entries: Vec::new(),
};

/// Normalize an attribute label into its lookup key.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value (characteristics, skills, derived stats).
    Int(i64),
    /// Free text (the display name).
    Text(String),
}

impl Value {
    /// The integer value, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A labelled attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Display label from the latest write.
    pub label: String,
    /// Current value.
    pub value: Value,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

/// An insertion-ordered set of attributes belonging to one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    entries: Vec<(String, Attribute)>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the set holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.entries.iter().map(|(_, attr)| attr)
    }

    /// `(normalized key, attribute)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.entries.iter().map(|(key, attr)| (key.as_str(), attr))
    }

    /// Look up an attribute by label (normalized before lookup).
    pub fn get(&self, label: &str) -> Option<&Attribute> {
        let key = normalize_label(label);
        self.position(&key).map(|i| &self.entries[i].1)
    }

    /// Insert or overwrite an attribute, keeping its position on overwrite.
    pub fn insert(&mut self, label: &str, value: Value) {
        let key = normalize_label(label);
        let attr = Attribute {
            label: label.trim().to_string(),
            value,
        };
        match self.position(&key) {
            Some(i) => self.entries[i].1 = attr,
            None => self.entries.push((key, attr)),
        }
    }

    /// Remove an attribute by label.
    pub fn remove(&mut self, label: &str) -> Option<Attribute> {
        let key = normalize_label(label);
        self.position(&key).map(|i| self.entries.remove(i).1)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

/// One applied addition: `label` went from `old` to `new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Label as written.
    pub label: String,
    /// Value before the addition (0 when absent or not an integer).
    pub old: i64,
    /// Value after the addition.
    pub new: i64,
}

/// The outcome of a batch removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    /// Stored labels of the attributes that were removed.
    pub removed: Vec<String>,
    /// Requested labels that were absent or protected.
    pub not_found: Vec<String>,
}

impl Removal {
    /// Returns true if the request tried to remove the reserved `NAME`.
    pub fn name_protected(&self) -> bool {
        self.not_found
            .iter()
            .any(|label| normalize_label(label) == NAME_KEY)
    }
}

/// Attribute sets for every `(scope, subject)` pair.
#[derive(Debug, Default)]
pub struct AttributeStore {
    scopes: HashMap<u64, HashMap<u64, AttributeSet>>,
}

impl AttributeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scopes with at least one subject.
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Number of subjects with attributes in `scope`.
    pub fn subject_count(&self, scope: u64) -> usize {
        self.scopes.get(&scope).map_or(0, HashMap::len)
    }

    /// All attributes of a subject; empty when the subject has none.
    pub fn get_all(&self, scope: u64, subject: u64) -> &AttributeSet {
        self.scopes
            .get(&scope)
            .and_then(|subjects| subjects.get(&subject))
            .unwrap_or(&EMPTY_SET)
    }

    /// A single attribute of a subject.
    pub fn get(&self, scope: u64, subject: u64, label: &str) -> Option<&Attribute> {
        self.get_all(scope, subject).get(label)
    }

    /// Set integer attributes, returning the applied `(label, value)` pairs.
    ///
    /// The whole batch is rejected if any label is empty or names `NAME`.
    pub fn set_many<I, S>(
        &mut self,
        scope: u64,
        subject: u64,
        pairs: I,
    ) -> TableResult<Vec<(String, i64)>>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let pairs = checked_labels(pairs)?;
        if pairs.is_empty() {
            return Ok(pairs);
        }
        let set = self.subject_mut(scope, subject);
        for (label, value) in &pairs {
            set.insert(label, Value::Int(*value));
        }
        tracing::debug!(scope, subject, count = pairs.len(), "attributes set");
        Ok(pairs)
    }

    /// Add deltas to integer attributes.
    ///
    /// Absent and text-valued attributes count as 0. Nothing is written if
    /// any label is invalid or any addition overflows.
    pub fn add_many<I, S>(
        &mut self,
        scope: u64,
        subject: u64,
        pairs: I,
    ) -> TableResult<Vec<AttributeChange>>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let pairs = checked_labels(pairs)?;
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let mut staged = self.get_all(scope, subject).clone();
        let mut changes = Vec::with_capacity(pairs.len());
        for (label, delta) in pairs {
            let old = staged
                .get(&label)
                .and_then(|attr| attr.value.as_int())
                .unwrap_or(0);
            let new = old
                .checked_add(delta)
                .ok_or_else(|| TableError::InvalidAttributeValue {
                    label: label.clone(),
                    reason: format!("{old} + {delta} overflows"),
                })?;
            staged.insert(&label, Value::Int(new));
            changes.push(AttributeChange { label, old, new });
        }
        *self.subject_mut(scope, subject) = staged;
        tracing::debug!(scope, subject, count = changes.len(), "attributes added");
        Ok(changes)
    }

    /// Remove attributes by label. `NAME` is never removed here.
    pub fn remove<I, S>(&mut self, scope: u64, subject: u64, labels: I) -> Removal
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut removal = Removal::default();
        for label in labels {
            let label = label.as_ref().trim();
            if normalize_label(label) == NAME_KEY {
                removal.not_found.push(label.to_string());
                continue;
            }
            let removed = self
                .scopes
                .get_mut(&scope)
                .and_then(|subjects| subjects.get_mut(&subject))
                .and_then(|set| set.remove(label));
            match removed {
                Some(attr) => removal.removed.push(attr.label),
                None => removal.not_found.push(label.to_string()),
            }
        }
        self.prune(scope, subject);
        tracing::debug!(
            scope,
            subject,
            removed = removal.removed.len(),
            "attributes removed"
        );
        removal
    }

    /// Delete every attribute of a subject. Returns whether anything existed.
    pub fn reset(&mut self, scope: u64, subject: u64) -> bool {
        let Some(subjects) = self.scopes.get_mut(&scope) else {
            return false;
        };
        let existed = subjects.remove(&subject).is_some();
        if subjects.is_empty() {
            self.scopes.remove(&scope);
        }
        existed
    }

    /// Set the display-name override, or remove it when `name` is `clear`.
    ///
    /// Returns the new name, or `None` when it was cleared.
    pub fn set_display_name(
        &mut self,
        scope: u64,
        subject: u64,
        name: &str,
    ) -> TableResult<Option<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TableError::InvalidAttributeValue {
                label: NAME_LABEL.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }
        if name.eq_ignore_ascii_case(CLEAR_NAME) {
            if let Some(set) = self
                .scopes
                .get_mut(&scope)
                .and_then(|subjects| subjects.get_mut(&subject))
            {
                set.remove(NAME_LABEL);
            }
            self.prune(scope, subject);
            return Ok(None);
        }
        self.subject_mut(scope, subject)
            .insert(NAME_LABEL, Value::Text(name.to_string()));
        Ok(Some(name.to_string()))
    }

    /// The display-name override, if one is set.
    pub fn display_name(&self, scope: u64, subject: u64) -> Option<&str> {
        match &self.get(scope, subject, NAME_LABEL)?.value {
            Value::Text(name) => Some(name),
            Value::Int(_) => None,
        }
    }

    fn subject_mut(&mut self, scope: u64, subject: u64) -> &mut AttributeSet {
        self.scopes
            .entry(scope)
            .or_default()
            .entry(subject)
            .or_default()
    }

    fn prune(&mut self, scope: u64, subject: u64) {
        let Some(subjects) = self.scopes.get_mut(&scope) else {
            return;
        };
        if subjects.get(&subject).is_some_and(AttributeSet::is_empty) {
            subjects.remove(&subject);
        }
        if subjects.is_empty() {
            self.scopes.remove(&scope);
        }
    }
}

fn checked_labels<I, S, T>(pairs: I) -> TableResult<Vec<(String, T)>>
where
    I: IntoIterator<Item = (S, T)>,
    S: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(label, value)| {
            let label = label.as_ref().trim();
            match normalize_label(label).as_str() {
                "" => Err(TableError::InvalidAttributeValue {
                    label: label.to_string(),
                    reason: "label cannot be empty".to_string(),
                }),
                NAME_KEY => Err(TableError::ProtectedAttribute),
                _ => Ok((label.to_string(), value)),
            }
        })
        .collect()
}

/// Lay out `label: value` cells column-major in `columns` columns.
///
/// Every cell but the last in its row is padded to the widest cell, measured
/// in terminal columns. Rows are joined with newlines and right-trimmed.
pub fn format_columns(set: &AttributeSet, columns: usize) -> String {
    let cells: Vec<String> = set.iter().map(ToString::to_string).collect();
    if cells.is_empty() {
        return String::new();
    }
    let columns = columns.max(1);
    let rows = cells.len().div_ceil(columns);
    let width = cells.iter().map(|c| c.width()).max().unwrap_or(0);

    (0..rows)
        .map(|row| {
            let row_cells: Vec<&String> = (0..columns)
                .filter_map(|col| cells.get(col * rows + row))
                .collect();
            let mut line = String::new();
            for (i, cell) in row_cells.iter().enumerate() {
                if i > 0 {
                    line.push_str("  ");
                }
                line.push_str(cell);
                if i + 1 < row_cells.len() {
                    line.push_str(&" ".repeat(width - cell.width()));
                }
            }
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(set: &AttributeSet) -> Vec<&str> {
        set.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_label("  Move   Rate "), "move rate");
        assert_eq!(normalize_label("STR"), "str");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn get_all_absent_is_empty() {
        let store = AttributeStore::new();
        assert!(store.get_all(1, 2).is_empty());
        assert_eq!(store.scope_count(), 0);
    }

    #[test]
    fn set_roundtrip_stores_normalized_key() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("Move Rate", 8)]).unwrap();
        let (key, attr) = store.get_all(1, 2).entries().next().unwrap();
        assert_eq!(key, "move rate");
        assert_eq!(attr.label, "Move Rate");
        assert_eq!(attr.value, Value::Int(8));
    }

    #[test]
    fn add_to_absent_starts_from_zero() {
        let mut store = AttributeStore::new();
        let changes = store.add_many(1, 2, [("Luck", -5)]).unwrap();
        assert_eq!(changes[0].new, -5);
        assert_eq!(store.get(1, 2, "luck").unwrap().value, Value::Int(-5));
    }

    #[test]
    fn remove_name_never_removes_even_when_unset() {
        let mut store = AttributeStore::new();
        let removal = store.remove(1, 2, ["NAME"]);
        assert!(removal.removed.is_empty());
        assert_eq!(removal.not_found, vec!["NAME"]);
    }

    #[test]
    fn set_then_overwrite_keeps_position_and_updates_label() {
        let mut store = AttributeStore::new();
        store
            .set_many(1, 2, [("STR", 50), ("DEX", 60), ("move rate", 8)])
            .unwrap();
        store.set_many(1, 2, [("Move  Rate", 9)]).unwrap();
        store.set_many(1, 2, [("str", 55)]).unwrap();

        let set = store.get_all(1, 2);
        assert_eq!(labels(set), vec!["str", "DEX", "Move  Rate"]);
        assert_eq!(set.get("MOVE RATE").unwrap().value, Value::Int(9));
        assert_eq!(set.get("STR").unwrap().value, Value::Int(55));
    }

    #[test]
    fn set_rejects_name_and_empty_labels_atomically() {
        let mut store = AttributeStore::new();
        assert_eq!(
            store.set_many(1, 2, [("STR", 50), ("Name", 1)]),
            Err(TableError::ProtectedAttribute)
        );
        assert!(matches!(
            store.set_many(1, 2, [("  ", 1)]),
            Err(TableError::InvalidAttributeValue { .. })
        ));
        assert!(store.get_all(1, 2).is_empty());
    }

    #[test]
    fn add_many_reports_old_and_new() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("STR", 50)]).unwrap();
        let changes = store
            .add_many(1, 2, [("str", 5), ("Luck", -3), ("STR", 1)])
            .unwrap();
        assert_eq!(
            changes,
            vec![
                AttributeChange {
                    label: "str".into(),
                    old: 50,
                    new: 55
                },
                AttributeChange {
                    label: "Luck".into(),
                    old: 0,
                    new: -3
                },
                AttributeChange {
                    label: "STR".into(),
                    old: 55,
                    new: 56
                },
            ]
        );
        assert_eq!(store.get(1, 2, "str").unwrap().value, Value::Int(56));
    }

    #[test]
    fn add_many_treats_text_as_zero() {
        let mut set = AttributeSet::new();
        set.insert("Notes", Value::Text("scarred".into()));
        let mut store = AttributeStore::new();
        *store.subject_mut(1, 2) = set;
        let changes = store.add_many(1, 2, [("notes", 4)]).unwrap();
        assert_eq!(changes[0].old, 0);
        assert_eq!(changes[0].new, 4);
    }

    #[test]
    fn add_many_overflow_writes_nothing() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("A", 1), ("B", i64::MAX)]).unwrap();
        let err = store.add_many(1, 2, [("A", 1), ("B", 1)]).unwrap_err();
        assert!(matches!(err, TableError::InvalidAttributeValue { ref label, .. } if label == "B"));
        assert_eq!(store.get(1, 2, "A").unwrap().value, Value::Int(1));
    }

    #[test]
    fn remove_reports_missing_and_protects_name() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("STR", 50), ("DEX", 60)]).unwrap();
        store.set_display_name(1, 2, "Harvey").unwrap();

        let removal = store.remove(1, 2, ["dex", "POW", "name"]);
        assert_eq!(removal.removed, vec!["DEX"]);
        assert_eq!(removal.not_found, vec!["POW", "name"]);
        assert!(removal.name_protected());
        assert_eq!(store.display_name(1, 2), Some("Harvey"));
    }

    #[test]
    fn removing_last_attribute_drops_subject_and_scope() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("STR", 50)]).unwrap();
        store.set_many(1, 3, [("STR", 40)]).unwrap();
        store.remove(1, 2, ["STR"]);
        assert_eq!(store.subject_count(1), 1);
        store.remove(1, 3, ["STR"]);
        assert_eq!(store.scope_count(), 0);
    }

    #[test]
    fn reset() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("STR", 50)]).unwrap();
        assert!(store.reset(1, 2));
        assert!(!store.reset(1, 2));
        assert_eq!(store.scope_count(), 0);
    }

    #[test]
    fn scopes_are_isolated() {
        let mut store = AttributeStore::new();
        store.set_many(1, 2, [("STR", 50)]).unwrap();
        assert!(store.get(9, 2, "STR").is_none());
        assert!(store.get(1, 9, "STR").is_none());
    }

    #[test]
    fn display_name_set_and_clear() {
        let mut store = AttributeStore::new();
        assert_eq!(
            store.set_display_name(1, 2, " Harvey Walters ").unwrap(),
            Some("Harvey Walters".to_string())
        );
        assert_eq!(store.display_name(1, 2), Some("Harvey Walters"));
        assert_eq!(store.set_display_name(1, 2, "CLEAR").unwrap(), None);
        assert_eq!(store.display_name(1, 2), None);
        assert_eq!(store.scope_count(), 0);
        assert!(store.set_display_name(1, 2, "  ").is_err());
    }

    #[test]
    fn format_columns_column_major() {
        let mut set = AttributeSet::new();
        for (label, value) in [("STR", 50), ("DEX", 60), ("Move Rate", 8), ("SAN", 55)] {
            set.insert(label, Value::Int(value));
        }
        let out = format_columns(&set, 3);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], format!("{:<12}  {}", "STR: 50", "Move Rate: 8"));
        assert_eq!(lines[1], format!("{:<12}  {}", "DEX: 60", "SAN: 55"));
    }

    #[test]
    fn format_columns_single_column_and_empty() {
        let mut set = AttributeSet::new();
        assert_eq!(format_columns(&set, 3), "");
        set.insert("STR", Value::Int(50));
        set.insert("Luck", Value::Int(45));
        assert_eq!(format_columns(&set, 1), "STR: 50\nLuck: 45");
        assert_eq!(format_columns(&set, 0), "STR: 50\nLuck: 45");
    }

    #[test]
    fn format_columns_pads_by_display_width() {
        let mut set = AttributeSet::new();
        set.insert("理智", Value::Int(50));
        set.insert("STR", Value::Int(60));
        let out = format_columns(&set, 2);
        // CJK labels are two columns per character
        assert_eq!(out, "理智: 50  STR: 60");

        set.insert("DEX", Value::Int(70));
        let out = format_columns(&set, 2);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "理智: 50  DEX: 70");
        assert_eq!(lines[1], "STR: 60");
    }
}
