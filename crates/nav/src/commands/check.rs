//! `check` command implementation.

use clap::Args;
use nav_repo::{RequestContext, SnapshotRepository};
use nav_tree::{NavError, NavSettings, TreeLinker};

use super::common::{self, CommonArgs};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) common: CommonArgs,
}

/// Outcome of linking every navigation item of a snapshot.
#[derive(Debug, Default)]
struct CheckReport {
    checked: usize,
    failures: Vec<(u64, NavError)>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the snapshot cannot be
    /// loaded, or any navigation item fails to link.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config()?;
        let settings = common::nav_settings(&config);
        let repo = common::open_snapshot(&config)?;

        output.highlight(&format!(
            "Checking {}",
            config.repository_resolved.snapshot.display()
        ));
        let report = check(&repo, &settings);

        for (id, err) in &report.failures {
            output.warning(&format!("  {id}: {err}"));
        }

        if report.failures.is_empty() {
            output.success(&format!(
                "All {} navigation items link cleanly",
                report.checked
            ));
            Ok(())
        } else {
            output.info(&format!(
                "{} of {} navigation items failed",
                report.failures.len(),
                report.checked
            ));
            Err(CliError::Validation(format!(
                "{} navigation items failed to link",
                report.failures.len()
            )))
        }
    }
}

/// Link the tree of every navigation item in `repo`.
fn check(repo: &SnapshotRepository, settings: &NavSettings) -> CheckReport {
    let linker = TreeLinker::new(repo, settings);
    let request = RequestContext::new();

    let mut ids = repo.ids_of_type(settings.navtree_type);
    ids.extend(repo.ids_of_type(settings.navon_type));

    let mut report = CheckReport::default();
    for id in ids {
        report.checked += 1;
        if let Err(err) = linker.link(id, &request) {
            tracing::debug!(content_id = %id, error = %err, "Navigation item failed to link");
            report.failures.push((id.0, err));
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use nav_tree::StructureError;

    use super::*;

    #[test]
    fn test_check_clean_snapshot() {
        let repo = SnapshotRepository::from_yaml_str(
            r"
nodes:
  - { id: 1, name: Home, content_type: 311, children: [2, 3] }
  - { id: 2, name: Products, content_type: 310 }
  - { id: 3, name: About, content_type: 310 }
",
        )
        .unwrap();

        let report = check(&repo, &NavSettings::default());

        assert_eq!(report.checked, 3);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_check_reports_multiple_navons() {
        let repo = SnapshotRepository::from_yaml_str(
            r"
nodes:
  - { id: 1, name: Home, content_type: 311, children: [2, 3] }
  - { id: 2, name: Products, content_type: 310, folder: 9 }
  - { id: 3, name: Products Copy, content_type: 310, folder: 9 }
",
        )
        .unwrap();

        let report = check(&repo, &NavSettings::default());

        assert_eq!(report.checked, 3);
        assert_eq!(report.failures.len(), 3);
        assert!(report.failures.iter().all(|(_, err)| matches!(
            err,
            NavError::InvalidStructure(StructureError::MultipleNavons { .. })
        )));
    }
}
