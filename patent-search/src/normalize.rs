//! Mapping of raw backend payloads onto [`Record`].
//!
//! Every backend has one [`FieldMap`] naming where each field lives in its
//! payloads. [`normalize`] is total: a missing key, a `null`, or a value of
//! the wrong JSON type all become the field's sentinel.

use serde_json::Value;

use crate::types::{is_sentinel, BackendKind, RawPayload, Record, UNKNOWN};

/// Where a backend keeps its inventor names.
#[derive(Debug, Clone, Copy)]
pub enum InventorPath {
    /// Array of objects, each carrying the name under `name`.
    Objects {
        /// Key of the array.
        array: &'static str,
        /// Key of the name inside each object.
        name: &'static str,
    },
    /// Array of plain strings.
    Strings(&'static str),
    /// One comma-separated string.
    CommaSeparated(&'static str),
}

/// Per-backend field locations.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    /// Identifier key, if the backend has one.
    pub id: Option<&'static str>,
    /// Title key.
    pub title: &'static str,
    /// Abstract key.
    pub abstract_text: &'static str,
    /// Inventor names.
    pub inventors: InventorPath,
    /// Date key.
    pub filing_date: &'static str,
    /// Artifact link key, if the backend links to one.
    pub artifact_link: Option<&'static str>,
}

const GOOGLE_PATENTS_MAP: FieldMap = FieldMap {
    id: None,
    title: "title",
    abstract_text: "abstract",
    inventors: InventorPath::CommaSeparated("inventors"),
    filing_date: "filing_date",
    artifact_link: Some("link"),
};

const PATENTSVIEW_MAP: FieldMap = FieldMap {
    id: Some("patent_id"),
    title: "patent_title",
    abstract_text: "patent_abstract",
    inventors: InventorPath::Objects {
        array: "inventors",
        name: "inventor_name",
    },
    filing_date: "patent_date",
    artifact_link: None,
};

const USPTO_SEARCH_MAP: FieldMap = FieldMap {
    id: Some("patentNumber"),
    title: "patentTitle",
    abstract_text: "abstractText",
    inventors: InventorPath::Strings("inventors"),
    filing_date: "filingDate",
    artifact_link: None,
};

impl BackendKind {
    /// Field locations for this backend's payloads.
    pub fn field_map(&self) -> &'static FieldMap {
        match self {
            Self::GooglePatents => &GOOGLE_PATENTS_MAP,
            Self::PatentsView => &PATENTSVIEW_MAP,
            Self::UsptoSearch => &USPTO_SEARCH_MAP,
        }
    }
}

/// Map one raw payload onto a [`Record`]. Never fails.
pub fn normalize(raw: &RawPayload, kind: BackendKind) -> Record {
    let map = kind.field_map();
    Record {
        id: map.id.map_or_else(|| UNKNOWN.to_owned(), |key| text_or_unknown(raw, key)),
        title: text_or_unknown(raw, map.title),
        abstract_text: text_or_unknown(raw, map.abstract_text),
        inventors: inventors(raw, map.inventors),
        filing_date: text_or_unknown(raw, map.filing_date),
        artifact_link: map.artifact_link.and_then(|key| text(raw, key)),
    }
}

/// Normalize a batch, preserving backend order.
pub fn normalize_all(raws: &[RawPayload], kind: BackendKind) -> Vec<Record> {
    raws.iter().map(|raw| normalize(raw, kind)).collect()
}

/// Trimmed text at `key`, or `None` when absent, sentinel or not scalar.
fn text(raw: &Value, key: &str) -> Option<String> {
    scalar_text(raw.get(key)?)
}

fn scalar_text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!is_sentinel(&s)).then_some(s)
}

fn text_or_unknown(raw: &Value, key: &str) -> String {
    text(raw, key).unwrap_or_else(|| UNKNOWN.to_owned())
}

fn inventors(raw: &Value, path: InventorPath) -> Vec<String> {
    match path {
        InventorPath::Objects { array, name } => match raw.get(array) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.get(name).and_then(scalar_text))
                .collect(),
            _ => Vec::new(),
        },
        InventorPath::Strings(key) => match raw.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(single @ Value::String(_)) => scalar_text(single).into_iter().collect(),
            _ => Vec::new(),
        },
        InventorPath::CommaSeparated(key) => text(raw, key)
            .map(|joined| {
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !is_sentinel(name))
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patentsview_payload_maps_every_field() {
        let raw = json!({
            "patent_id": "10123456",
            "patent_title": "Cyclonic separating apparatus",
            "patent_abstract": "A separator.",
            "inventors": [
                { "inventor_name": "James Dyson" },
                { "inventor_name": "Peter Gammack" }
            ],
            "patent_date": "2019-03-04"
        });
        let record = normalize(&raw, BackendKind::PatentsView);
        assert_eq!(record.id, "10123456");
        assert_eq!(record.title, "Cyclonic separating apparatus");
        assert_eq!(record.abstract_text, "A separator.");
        assert_eq!(record.inventors, vec!["James Dyson", "Peter Gammack"]);
        assert_eq!(record.filing_date, "2019-03-04");
        assert!(record.artifact_link.is_none());
    }

    #[test]
    fn uspto_payload_maps_flat_inventors() {
        let raw = json!({
            "patentNumber": "US20200001A1",
            "patentTitle": "Cleaner head",
            "abstractText": "A head.",
            "inventors": ["A. Inventor", "B. Inventor"],
            "filingDate": "03-04-2019"
        });
        let record = normalize(&raw, BackendKind::UsptoSearch);
        assert_eq!(record.id, "US20200001A1");
        assert_eq!(record.inventors, vec!["A. Inventor", "B. Inventor"]);
        assert_eq!(record.filing_date, "03-04-2019");
    }

    #[test]
    fn google_payload_splits_inventors_and_keeps_link() {
        let raw = json!({
            "title": "Handheld vacuum",
            "link": "https://patentimages.example.com/US1.pdf",
            "inventors": "James Dyson, , Peter Gammack,",
            "filing_date": "2019-03-04"
        });
        let record = normalize(&raw, BackendKind::GooglePatents);
        assert_eq!(record.id, UNKNOWN);
        assert_eq!(record.abstract_text, UNKNOWN);
        assert_eq!(record.inventors, vec!["James Dyson", "Peter Gammack"]);
        assert_eq!(
            record.artifact_link.as_deref(),
            Some("https://patentimages.example.com/US1.pdf")
        );
    }

    #[test]
    fn legacy_placeholder_is_absent() {
        let raw = json!({ "title": "N/A", "link": "N/A" });
        let record = normalize(&raw, BackendKind::GooglePatents);
        assert_eq!(record.title, UNKNOWN);
        assert!(record.artifact_link.is_none());
    }

    #[test]
    fn wrong_shapes_become_sentinels() {
        let raw = json!({
            "patent_id": 42,
            "patent_title": ["not", "a", "string"],
            "patent_abstract": null,
            "inventors": { "inventor_name": "not an array" },
            "patent_date": { "y": 2019 }
        });
        let record = normalize(&raw, BackendKind::PatentsView);
        assert_eq!(record.id, "42");
        assert_eq!(record.title, UNKNOWN);
        assert_eq!(record.abstract_text, UNKNOWN);
        assert!(record.inventors.is_empty());
        assert_eq!(record.filing_date, UNKNOWN);
    }

    #[test]
    fn non_object_payloads_are_all_sentinel() {
        for raw in [json!(null), json!(7), json!("text"), json!([1, 2])] {
            for kind in BackendKind::all() {
                assert_eq!(normalize(&raw, *kind), Record::default());
            }
        }
    }

    #[test]
    fn mixed_inventor_entries_keep_valid_ones_in_order() {
        let raw = json!({
            "inventors": [
                { "inventor_name": "First" },
                { "other": "x" },
                "bare string",
                { "inventor_name": null },
                { "inventor_name": "Second" }
            ]
        });
        let record = normalize(&raw, BackendKind::PatentsView);
        assert_eq!(record.inventors, vec!["First", "Second"]);
    }

    #[test]
    fn normalize_all_preserves_order() {
        let raws = vec![
            json!({ "patentNumber": "1" }),
            json!({ "patentNumber": "2" }),
            json!({ "patentNumber": "3" }),
        ];
        let ids: Vec<String> = normalize_all(&raws, BackendKind::UsptoSearch)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
