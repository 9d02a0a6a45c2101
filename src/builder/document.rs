use super::{BuildSummary, Phase, PhaseStatus};
use std::fmt::Write;

/// Renders `application_setup.md` for a finished pipeline run
///
/// Phases that never ran list the commands that were planned for them.
pub fn render_setup_document(summary: &BuildSummary) -> String {
    let mut md = String::from("# Application Setup Documentation\n\n");
    let _ = writeln!(md, "Working directory: `{}`\n", summary.working_dir.display());

    for phase in Phase::ALL {
        let status = summary.status(phase);
        let report = summary.report(phase);

        let _ = writeln!(md, "## {}\n", phase.title());
        let _ = writeln!(md, "Status: {}\n", status.label());

        if status == PhaseStatus::Skipped {
            md.push_str("This step was skipped as it was not applicable.\n\n");
        }

        if let Some(report) = report {
            if !report.env.is_empty() {
                md.push_str("### Environment Variables\n\n");
                for (key, value) in &report.env {
                    let _ = writeln!(md, "- `{}={}`", key, value);
                }
                md.push('\n');
            }
        }

        let commands: Vec<String> = match (phase, report) {
            (Phase::Environment, Some(r)) => r.notes.clone(),
            (_, Some(r)) if !r.commands.is_empty() => r.commands.iter().map(ToString::to_string).collect(),
            _ => phase.planned(&summary.instructions).iter().map(ToString::to_string).collect(),
        };
        if !commands.is_empty() && status != PhaseStatus::Skipped {
            md.push_str("### Commands\n\n```bash\n");
            for command in &commands {
                let _ = writeln!(md, "{}", command);
            }
            md.push_str("```\n\n");
        }

        if status == PhaseStatus::Failed {
            if let Some(report) = report.filter(|r| !r.stderr.trim().is_empty()) {
                md.push_str("### Error Output\n\n```text\n");
                let _ = writeln!(md, "{}", report.stderr.trim_end());
                md.push_str("```\n\n");
            }
        }

        if phase == Phase::Run {
            if let Some(url) = summary.access_url() {
                md.push_str("### Access URL\n\n");
                let _ = writeln!(md, "Once the application is running, access it at: {}\n", url);
            }
        }
    }

    if let Some(error) = &summary.error {
        let _ = writeln!(md, "---\n\nThe pipeline stopped: {}", error);
    }
    md
}
