//! Readers for archive shapes that predate the current format.
//!
//! Every reader decodes strictly into one shape and either returns the whole
//! value or a [`JotError::Decode`]; nothing is ever partially populated.
//!
//! | shape            | on disk                                               |
//! |------------------|-------------------------------------------------------|
//! | [`FlatArchive`]  | YAML `book: [raw note, ...]`                          |
//! | [`LegacyArchive`]| JSON `{"book": [{"uid", "content", "added_on"}]}`      |
//! | [`NamedArchive`] | JSON `{"book": {"name", "notes": [Note]}}` (v2)       |
//! | [`LegacyRc`]     | YAML rc with `book` and `apikey`                      |

use crate::error::{JotError, Result};
use crate::keyed::Keyed;
use crate::model::Note;
use crate::store::DataFile;
use serde::{Deserialize, Serialize};

/// The earliest archive: book name to raw note strings, no metadata.
pub type FlatArchive = Keyed<Vec<String>>;

/// A note from the unversioned JSON archive. `uid` is the short legacy
/// identifier, when one was ever assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyNote {
    #[serde(default, alias = "UID")]
    pub uid: String,
    #[serde(alias = "Content")]
    pub content: String,
    #[serde(default, alias = "AddedOn")]
    pub added_on: i64,
}

pub type LegacyArchive = Keyed<Vec<LegacyNote>>;

/// A book in the v2 archive, still keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedBook {
    pub name: String,
    pub notes: Vec<Note>,
}

pub type NamedArchive = Keyed<NamedBook>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LegacyRc {
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default, alias = "api_key")]
    pub apikey: Option<String>,
    #[serde(default)]
    pub editor: Option<String>,
}

/// What the archive file can hold before the first migration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreV1Archive {
    Missing,
    Flat(FlatArchive),
    Json(LegacyArchive),
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(|b| b.is_ascii_whitespace())
}

pub fn decode_flat_yaml(bytes: &[u8]) -> Result<FlatArchive> {
    if is_blank(bytes) {
        return Ok(FlatArchive::new());
    }
    serde_yaml::from_slice(bytes).map_err(|e| JotError::decode(DataFile::Archive, e))
}

pub fn decode_legacy_json(bytes: &[u8]) -> Result<LegacyArchive> {
    if is_blank(bytes) {
        return Ok(LegacyArchive::new());
    }
    serde_json::from_slice(bytes).map_err(|e| JotError::decode(DataFile::Archive, e))
}

pub fn decode_named_json(bytes: &[u8]) -> Result<NamedArchive> {
    if is_blank(bytes) {
        return Ok(NamedArchive::new());
    }
    let archive: NamedArchive =
        serde_json::from_slice(bytes).map_err(|e| JotError::decode(DataFile::Archive, e))?;
    if let Some((key, book)) = archive.iter().find(|(key, book)| *key != book.name) {
        return Err(JotError::decode(
            DataFile::Archive,
            format!("book `{}` is stored under key `{}`", book.name, key),
        ));
    }
    Ok(archive)
}

pub fn decode_rc(bytes: &[u8]) -> Result<LegacyRc> {
    if is_blank(bytes) {
        return Ok(LegacyRc::default());
    }
    serde_yaml::from_slice(bytes).map_err(|e| JotError::decode(DataFile::LegacyRc, e))
}

/// JSON is tried first; a document that is not the unversioned JSON shape
/// must then be the flat YAML shape, or the archive is rejected.
pub fn decode_pre_v1(bytes: Option<&[u8]>) -> Result<PreV1Archive> {
    let Some(bytes) = bytes else {
        return Ok(PreV1Archive::Missing);
    };
    if is_blank(bytes) {
        return Ok(PreV1Archive::Json(LegacyArchive::new()));
    }

    let json_err = match serde_json::from_slice::<LegacyArchive>(bytes) {
        Ok(archive) => return Ok(PreV1Archive::Json(archive)),
        Err(e) => e,
    };
    match serde_yaml::from_slice::<FlatArchive>(bytes) {
        Ok(flat) => Ok(PreV1Archive::Flat(flat)),
        Err(yaml_err) => Err(JotError::decode(
            DataFile::Archive,
            format!(
                "neither a legacy JSON archive ({}) nor a flat YAML archive ({})",
                json_err, yaml_err
            ),
        )),
    }
}

/// Lift raw strings into legacy notes with no identifier. `added_on` is 0
/// when nothing is known about when the notes were written.
pub fn flat_to_legacy(flat: FlatArchive, added_on: i64) -> LegacyArchive {
    flat.into_iter()
        .map(|(book, notes)| {
            let notes = notes
                .into_iter()
                .map(|content| LegacyNote {
                    uid: String::new(),
                    content,
                    added_on,
                })
                .collect();
            (book, notes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT_YAML: &str = "algorithm:\n  - in-place means no extra space required\n  - quick sort is O(n log n)\nlinux:\n  - grep -r pattern .\n";

    const LEGACY_JSON: &str = r#"{
  "js": [
    {"uid": "a1b2c3d4", "content": "const is block scoped", "added_on": 1515199943},
    {"uid": "e5f6g7h8", "content": "arrow functions bind this lexically", "added_on": 1515199951}
  ],
  "css": []
}"#;

    #[test]
    fn decodes_flat_yaml_in_order() {
        let flat = decode_flat_yaml(FLAT_YAML.as_bytes()).unwrap();
        let books: Vec<&str> = flat.keys().collect();
        assert_eq!(books, vec!["algorithm", "linux"]);
        assert_eq!(flat.get("algorithm").unwrap().len(), 2);
    }

    #[test]
    fn flat_yaml_rejects_structured_notes() {
        let err = decode_flat_yaml(b"js:\n  - content: foo\n").unwrap_err();
        assert!(matches!(err, JotError::Decode { .. }));
    }

    #[test]
    fn decodes_legacy_json() {
        let archive = decode_legacy_json(LEGACY_JSON.as_bytes()).unwrap();
        let js = archive.get("js").unwrap();
        assert_eq!(js[0].uid, "a1b2c3d4");
        assert_eq!(js[1].added_on, 1515199951);
        assert!(archive.get("css").unwrap().is_empty());
    }

    #[test]
    fn legacy_json_accepts_capitalized_fields() {
        let archive =
            decode_legacy_json(br#"{"js": [{"UID": "abcdefgh", "Content": "x", "AddedOn": 5}]}"#)
                .unwrap();
        assert_eq!(archive.get("js").unwrap()[0].added_on, 5);
    }

    #[test]
    fn legacy_json_requires_content() {
        let err = decode_legacy_json(br#"{"js": [{"uid": "abcdefgh"}]}"#).unwrap_err();
        assert!(matches!(err, JotError::Decode { .. }));
    }

    #[test]
    fn pre_v1_detects_shape() {
        assert_eq!(decode_pre_v1(None).unwrap(), PreV1Archive::Missing);
        assert!(matches!(
            decode_pre_v1(Some(LEGACY_JSON.as_bytes())).unwrap(),
            PreV1Archive::Json(_)
        ));
        assert!(matches!(
            decode_pre_v1(Some(FLAT_YAML.as_bytes())).unwrap(),
            PreV1Archive::Flat(_)
        ));
        assert!(matches!(
            decode_pre_v1(Some(&b"  \n"[..])).unwrap(),
            PreV1Archive::Json(a) if a.is_empty()
        ));
    }

    #[test]
    fn pre_v1_rejects_unknown_shapes() {
        let err = decode_pre_v1(Some(&b"[1, 2, 3]"[..])).unwrap_err();
        assert!(matches!(err, JotError::Decode { .. }));
    }

    #[test]
    fn named_archive_rejects_current_shape() {
        let current = r#"{"b9a6e1d2-4d0e-4a57-9a8c-000000000001": {
            "uuid": "b9a6e1d2-4d0e-4a57-9a8c-000000000001", "name": "js", "notes": []}}"#;
        assert!(decode_named_json(current.as_bytes()).is_err());
    }

    #[test]
    fn named_archive_rejects_mismatched_keys() {
        let err = decode_named_json(br#"{"js": {"name": "css", "notes": []}}"#).unwrap_err();
        assert!(err.to_string().contains("stored under key"));
    }

    #[test]
    fn flat_to_legacy_keeps_content_and_order() {
        let flat = decode_flat_yaml(FLAT_YAML.as_bytes()).unwrap();
        let legacy = flat_to_legacy(flat, 0);
        let algo = legacy.get("algorithm").unwrap();
        assert_eq!(algo[0].content, "in-place means no extra space required");
        assert_eq!(algo[0].uid, "");
        assert_eq!(algo[0].added_on, 0);
        assert_eq!(legacy.keys().collect::<Vec<_>>(), vec!["algorithm", "linux"]);
    }

    #[test]
    fn decodes_rc() {
        let rc = decode_rc(b"book: js\napikey: abc\n").unwrap();
        assert_eq!(rc.book.as_deref(), Some("js"));
        assert_eq!(rc.apikey.as_deref(), Some("abc"));
        assert_eq!(rc.editor, None);
        assert_eq!(decode_rc(b"").unwrap(), LegacyRc::default());
    }
}
