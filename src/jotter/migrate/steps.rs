//! The migration step registry.
//!
//! Each [`Migration`] pairs a strict decoder (what the step expects to find on
//! disk) with a pure transform. Transforms never touch storage: they return a
//! [`StepOutput`] that the orchestrator persists.

use super::{IdSource, NextState, RawState, StepEnv, StepOutput};
use crate::actions;
use crate::archive;
use crate::config::JotConfig;
use crate::error::{JotError, Result};
use crate::legacy::{self, NamedArchive, NamedBook, PreV1Archive};
use crate::model::{Action, ActionKind, Archive, Book, Note};
use crate::store::{DataFile, StorageBackend};
use std::collections::HashSet;
use uuid::Uuid;

/// How many identifiers are drawn before giving up on finding an unused one.
pub const MAX_ID_ATTEMPTS: usize = 8;

pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub decode: fn(&dyn StorageBackend) -> Result<RawState>,
    pub apply: fn(RawState, &mut StepEnv<'_>) -> Result<StepOutput>,
}

static MIGRATIONS: [Migration; 4] = [
    Migration {
        version: 1,
        description: "Convert the YAML archive to JSON and drop the archived YAML copy",
        decode: decode_pre_v1,
        apply: to_v1,
    },
    Migration {
        version: 2,
        description: "Assign UUIDs and timestamps to every note",
        decode: decode_v1,
        apply: to_v2,
    },
    Migration {
        version: 3,
        description: "Key books by UUID and record an insert action for every note",
        decode: decode_v2,
        apply: to_v3,
    },
    Migration {
        version: 4,
        description: "Fold the legacy rc file into config.json",
        decode: decode_rc,
        apply: to_v4,
    },
];

/// All migrations, in ascending version order starting at 1.
pub fn registry() -> &'static [Migration] {
    &MIGRATIONS
}

fn unexpected(version: u32, state: &RawState) -> JotError {
    JotError::decode(
        DataFile::Archive,
        format!("step {} cannot apply to {} input", version, state.shape()),
    )
}

/// Draw identifiers until one is neither nil nor already taken.
pub fn draw_unique<I: IdSource + ?Sized>(ids: &mut I, taken: &HashSet<Uuid>) -> Result<Uuid> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = ids.next_uuid();
        if !id.is_nil() && !taken.contains(&id) {
            return Ok(id);
        }
    }
    Err(JotError::IdentifierExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}

// --- v1 ---

fn decode_pre_v1(backend: &dyn StorageBackend) -> Result<RawState> {
    let bytes = backend.read(DataFile::Archive)?;
    let archive = legacy::decode_pre_v1(bytes.as_deref())?;
    let modified = backend.modified(DataFile::Archive)?;
    let yaml_archive = backend.exists(DataFile::LegacyYamlArchive)?;
    Ok(RawState::PreV1 {
        archive,
        modified,
        yaml_archive,
    })
}

fn to_v1(state: RawState, _env: &mut StepEnv<'_>) -> Result<StepOutput> {
    let (archive, modified, yaml_archive) = match state {
        RawState::PreV1 {
            archive,
            modified,
            yaml_archive,
        } => (archive, modified, yaml_archive),
        other => return Err(unexpected(1, &other)),
    };

    let mut output = StepOutput::default();
    // Rewriting the file resets its mtime, so carry it into the notes now.
    if let PreV1Archive::Flat(flat) = archive {
        let added_on = modified.unwrap_or(0);
        output.state = Some(NextState::Legacy(legacy::flat_to_legacy(flat, added_on)));
    }
    if yaml_archive {
        output.removals.push(DataFile::LegacyYamlArchive);
    }
    Ok(output)
}

// --- v2 ---

fn decode_v1(backend: &dyn StorageBackend) -> Result<RawState> {
    let archive = match backend.read(DataFile::Archive)? {
        Some(bytes) => match legacy::decode_legacy_json(&bytes) {
            Ok(archive) => archive,
            Err(err) => {
                return match legacy::decode_named_json(&bytes) {
                    Ok(_) => Ok(RawState::AlreadyApplied),
                    Err(_) => Err(err),
                };
            }
        },
        None => legacy::LegacyArchive::new(),
    };
    let modified = backend.modified(DataFile::Archive)?;
    Ok(RawState::V1 { archive, modified })
}

fn to_v2(state: RawState, env: &mut StepEnv<'_>) -> Result<StepOutput> {
    let (archive, modified) = match state {
        RawState::V1 { archive, modified } => (archive, modified),
        other => return Err(unexpected(2, &other)),
    };

    let fallback_added_on = modified.filter(|t| *t > 0).unwrap_or(env.now);
    let mut taken: HashSet<Uuid> = HashSet::new();
    let mut named = NamedArchive::new();

    for (name, notes) in archive {
        let mut converted = Vec::with_capacity(notes.len());
        for note in notes {
            let uuid = match Uuid::parse_str(&note.uid) {
                Ok(id) if !id.is_nil() && !taken.contains(&id) => id,
                _ => draw_unique(&mut *env.ids, &taken)?,
            };
            taken.insert(uuid);

            let added_on = if note.added_on > 0 {
                note.added_on
            } else {
                fallback_added_on
            };
            converted.push(Note {
                uuid,
                content: note.content,
                added_on,
                edited_on: 0,
            });
        }
        named.insert(
            name.clone(),
            NamedBook {
                name,
                notes: converted,
            },
        );
    }

    Ok(StepOutput {
        state: Some(NextState::Named(named)),
        ..StepOutput::default()
    })
}

// --- v3 ---

fn decode_v2(backend: &dyn StorageBackend) -> Result<RawState> {
    let archive = match backend.read(DataFile::Archive)? {
        Some(bytes) => match legacy::decode_named_json(&bytes) {
            Ok(archive) => archive,
            Err(err) => {
                return match archive::decode(&bytes) {
                    Ok(_) => Ok(RawState::AlreadyApplied),
                    Err(_) => Err(err),
                };
            }
        },
        None => NamedArchive::new(),
    };
    let logged = actions::load(backend)?
        .into_iter()
        .filter(|a| a.kind == ActionKind::Insert)
        .map(|a| a.note_uuid)
        .collect();
    Ok(RawState::V2 { archive, logged })
}

fn to_v3(state: RawState, env: &mut StepEnv<'_>) -> Result<StepOutput> {
    let (named, logged) = match state {
        RawState::V2 { archive, logged } => (archive, logged),
        other => return Err(unexpected(3, &other)),
    };

    let mut taken: HashSet<Uuid> = HashSet::new();
    let mut archive = Archive::new();
    let mut actions = Vec::new();

    for (_, book) in named {
        let uuid = draw_unique(&mut *env.ids, &taken)?;
        taken.insert(uuid);

        // No history exists before this version: every note is an insert,
        // unless an interrupted run already logged it.
        actions.extend(
            book.notes
                .iter()
                .filter(|note| !logged.contains(&note.uuid))
                .map(|note| Action::insert(&book.name, note, note.added_on)),
        );
        archive.insert(
            uuid.to_string(),
            Book {
                uuid,
                name: book.name,
                notes: book.notes,
            },
        );
    }

    Ok(StepOutput {
        state: Some(NextState::Current(archive)),
        actions,
        removals: Vec::new(),
    })
}

// --- v4 ---

fn decode_rc(backend: &dyn StorageBackend) -> Result<RawState> {
    let rc = match backend.read(DataFile::LegacyRc)? {
        Some(bytes) => Some(legacy::decode_rc(&bytes)?),
        None => None,
    };
    let config = JotConfig::load(backend)?;
    Ok(RawState::Rc { rc, config })
}

fn to_v4(state: RawState, _env: &mut StepEnv<'_>) -> Result<StepOutput> {
    let (rc, config) = match state {
        RawState::Rc { rc, config } => (rc, config),
        other => return Err(unexpected(4, &other)),
    };
    let Some(rc) = rc else {
        return Ok(StepOutput::default());
    };

    let mut config = config;
    if let Some(book) = rc.book.filter(|b| !b.trim().is_empty()) {
        config.book = book;
    }
    if let Some(editor) = rc.editor.filter(|e| !e.trim().is_empty()) {
        config.editor = editor;
    }
    if let Some(key) = rc.apikey.filter(|k| !k.is_empty()) {
        config.api_key = Some(key);
    }

    Ok(StepOutput {
        state: Some(NextState::Config(config)),
        actions: Vec::new(),
        removals: vec![DataFile::LegacyRc],
    })
}
