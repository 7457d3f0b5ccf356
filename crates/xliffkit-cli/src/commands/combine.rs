use std::path::PathBuf;

use super::{ok_line, ConflictPolicyArg};
use xliffkit_core::ConflictPolicy;

pub fn run_combine(
    input_dir: PathBuf,
    out: PathBuf,
    policy: Option<ConflictPolicyArg>,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "combine_args", input_dir = ?input_dir, out = ?out, policy = ?policy);
    let cfg = xliffkit_config::load_config().unwrap_or_default();

    let policy: ConflictPolicy = policy
        .map(Into::into)
        .or_else(|| cfg.combine.as_ref().and_then(|c| c.policy))
        .unwrap_or_default();

    let (store, report) = xliffkit_services::combine_dir(&input_dir, policy)?;
    xliffkit_xliff::save_store(&out, &store)?;

    tracing::info!(
        event = "combine_saved",
        path = %out.display(),
        groups = store.group_count(),
        units = store.total_units(),
        skipped = report.total_skipped(),
    );
    if !quiet {
        ok_line(
            use_color,
            &format!(
                "combined {} unit(s) across {} group(s) into {} ({} duplicate(s) skipped, {} conflicting)",
                store.total_units(),
                store.group_count(),
                out.display(),
                report.total_skipped(),
                report.total_conflicting(),
            ),
        );
    }
    Ok(())
}
