//! # Migration Engine
//!
//! Brings the on-disk archive from whatever schema version it was left at up
//! to [`latest_version`], one step at a time.
//!
//! ## Algorithm
//!
//! 1. Read the persisted version (absent schema = version 0).
//! 2. A version above the newest known step is rejected with
//!    [`JotError::Version`]; the newest version is a no-op.
//! 3. For every pending step, in ascending order:
//!    - decode the on-disk state strictly into the shape the step expects,
//!    - run the pure transform,
//!    - commit one [`WriteBatch`]: appended actions, the new state, removals,
//!      and finally the schema record for this step.
//! 4. The first error aborts the run. The schema still names the last step
//!    whose batch was committed, so running again resumes right after it.
//!
//! A crash can land between the renames of one batch. Decoders therefore
//! also accept their own step's output shape and report it as
//! [`RawState::AlreadyApplied`]; only the schema record is then written.
//! Step 3 skips inserts already present in the log.
//!
//! ## Shapes
//!
//! ```text
//!  v0  archive: flat YAML | legacy JSON | absent, maybe archive-yaml-archived
//!  v1  archive: {name: [{uid, content, added_on}]}
//!  v2  archive: {name: {name, notes: [{uuid, content, added_on, edited_on}]}}
//!  v3  archive: {uuid: {uuid, name, notes}}        + actions log
//!  v4  jotrc folded into config.json
//! ```

use crate::actions;
use crate::archive;
use crate::config::JotConfig;
use crate::error::{JotError, Result};
use crate::legacy::{LegacyArchive, LegacyRc, NamedArchive, PreV1Archive};
use crate::model::{Action, Archive, SchemaRecord};
use crate::schema;
use crate::store::{DataFile, StorageBackend, WriteBatch};
use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod steps;

pub use steps::{registry, Migration, MAX_ID_ATTEMPTS};

/// What a step reads, tagged by schema version.
#[derive(Debug, Clone, PartialEq)]
pub enum RawState {
    PreV1 {
        archive: PreV1Archive,
        modified: Option<i64>,
        yaml_archive: bool,
    },
    V1 {
        archive: LegacyArchive,
        /// Archive file mtime, used for notes that never had a timestamp
        modified: Option<i64>,
    },
    V2 {
        archive: NamedArchive,
        /// Notes that already have an insert in the action log
        logged: HashSet<Uuid>,
    },
    Rc {
        rc: Option<LegacyRc>,
        config: JotConfig,
    },
    /// The data is already in the shape this step produces.
    AlreadyApplied,
}

impl RawState {
    pub fn shape(&self) -> &'static str {
        match self {
            RawState::PreV1 { .. } => "pre-v1 archive",
            RawState::V1 { .. } => "unversioned JSON archive",
            RawState::V2 { .. } => "name-keyed archive",
            RawState::Rc { .. } => "rc file",
            RawState::AlreadyApplied => "already migrated data",
        }
    }
}

/// What a step hands back to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum NextState {
    Legacy(LegacyArchive),
    Named(NamedArchive),
    Current(Archive),
    Config(JotConfig),
}

impl NextState {
    pub fn encode(&self) -> Result<(DataFile, Vec<u8>)> {
        match self {
            NextState::Legacy(a) => Ok((DataFile::Archive, serde_json::to_vec_pretty(a)?)),
            NextState::Named(a) => Ok((DataFile::Archive, serde_json::to_vec_pretty(a)?)),
            NextState::Current(a) => Ok((DataFile::Archive, archive::encode(a)?)),
            NextState::Config(c) => Ok((DataFile::Config, c.encode()?)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub state: Option<NextState>,
    pub actions: Vec<Action>,
    pub removals: Vec<DataFile>,
}

pub trait IdSource {
    fn next_uuid(&mut self) -> Uuid;
}

/// Random v4 identifiers.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Hands out a fixed sequence, then falls back to random identifiers.
#[derive(Debug, Default)]
pub struct SequenceIds {
    queue: VecDeque<Uuid>,
}

impl SequenceIds {
    pub fn new(ids: Vec<Uuid>) -> Self {
        Self { queue: ids.into() }
    }

    pub fn random() -> Self {
        Self::default()
    }
}

impl IdSource for SequenceIds {
    fn next_uuid(&mut self) -> Uuid {
        self.queue.pop_front().unwrap_or_else(Uuid::new_v4)
    }
}

/// The non-pure inputs a step may consult.
pub struct StepEnv<'a> {
    /// Current time, epoch seconds
    pub now: i64,
    pub ids: &'a mut dyn IdSource,
}

impl<'a> StepEnv<'a> {
    pub fn new(now: i64, ids: &'a mut dyn IdSource) -> Self {
        Self { now, ids }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStep {
    pub version: u32,
    pub description: &'static str,
    pub actions: usize,
    /// Only the schema record was written; the data had already been moved
    /// by an interrupted earlier run.
    pub recovered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
    pub applied: Vec<AppliedStep>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn actions_synthesized(&self) -> usize {
        self.applied.iter().map(|s| s.actions).sum()
    }
}

pub fn latest_version() -> u32 {
    registry().last().map_or(0, |m| m.version)
}

/// Run every pending migration with the real clock and random identifiers.
pub fn migrate<S: StorageBackend>(backend: &S) -> Result<MigrationReport> {
    let mut ids = RandomIds;
    let mut env = StepEnv::new(Utc::now().timestamp(), &mut ids);
    run(backend, registry(), &mut env)
}

/// Run the pending subset of `migrations` against `backend`.
pub fn run<S: StorageBackend>(
    backend: &S,
    migrations: &[Migration],
    env: &mut StepEnv<'_>,
) -> Result<MigrationReport> {
    let latest = migrations.last().map_or(0, |m| m.version);
    let current = schema::current_version(backend)?;

    if current > latest {
        return Err(JotError::Version {
            found: current,
            latest,
        });
    }

    let mut report = MigrationReport {
        from_version: current,
        to_version: current,
        applied: Vec::new(),
    };
    if current == latest {
        debug!(version = current, "schema is up to date");
        return Ok(report);
    }

    for migration in migrations.iter().filter(|m| m.version > current) {
        debug!(version = migration.version, "decoding migration input");
        let input = (migration.decode)(backend)?;
        debug!(version = migration.version, shape = input.shape(), "applying migration");
        let recovered = matches!(input, RawState::AlreadyApplied);
        let output = if recovered {
            warn!(
                version = migration.version,
                "data already migrated by an interrupted run, recording version only"
            );
            StepOutput::default()
        } else {
            (migration.apply)(input, env)?
        };

        let mut batch = WriteBatch::new();
        actions::stage_append(backend, &mut batch, &output.actions)?;
        if let Some(state) = &output.state {
            let (file, bytes) = state.encode()?;
            batch.write(file, bytes);
        }
        for file in &output.removals {
            batch.remove(*file);
        }
        schema::stage_write(
            backend,
            &mut batch,
            SchemaRecord {
                current_version: migration.version,
            },
        )?;
        backend.commit(batch)?;

        info!(
            version = migration.version,
            actions = output.actions.len(),
            "{}",
            migration.description
        );
        report.to_version = migration.version;
        report.applied.push(AppliedStep {
            version: migration.version,
            description: migration.description,
            actions: output.actions.len(),
            recovered,
        });
    }

    Ok(report)
}
