use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::migrate::{self, MigrationReport};
use crate::store::StorageBackend;

pub fn run<S: StorageBackend>(backend: &S) -> Result<CmdResult> {
    let report = migrate::migrate(backend)?;
    Ok(summarize(report))
}

fn summarize(report: MigrationReport) -> CmdResult {
    let mut result = CmdResult::default();
    if report.is_noop() {
        result.add_message(CmdMessage::info(format!(
            "Already at schema version {}",
            report.to_version
        )));
        return result.with_report(report);
    }

    for step in &report.applied {
        if step.recovered {
            result.add_message(CmdMessage::warning(format!(
                "Schema version {} was already applied by an interrupted run; recorded the version",
                step.version
            )));
        } else {
            result.add_message(CmdMessage::success(format!(
                "Migrated to schema version {}: {}",
                step.version, step.description
            )));
        }
    }
    let actions = report.actions_synthesized();
    if actions > 0 {
        result.add_message(CmdMessage::info(format!(
            "Recorded {} action{} for existing notes",
            actions,
            if actions == 1 { "" } else { "s" }
        )));
    }
    result.with_report(report)
}
