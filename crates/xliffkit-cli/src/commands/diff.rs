use std::path::PathBuf;

use super::ok_line;

pub fn run_diff(
    baseline: PathBuf,
    comparison: PathBuf,
    out: PathBuf,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "diff_args", baseline = ?baseline, comparison = ?comparison, out = ?out);

    let baseline_store = xliffkit_xliff::load_store(&baseline)?;
    let comparison_store = xliffkit_xliff::load_store(&comparison)?;

    let (missing, report) = xliffkit_services::diff(&baseline_store, &comparison_store);
    xliffkit_xliff::save_store(&out, &missing)?;

    tracing::info!(
        event = "diff_saved",
        path = %out.display(),
        missing = report.total_missing(),
    );
    if !quiet {
        if missing.is_empty() {
            ok_line(
                use_color,
                &format!("nothing missing; wrote empty document to {}", out.display()),
            );
        } else {
            ok_line(
                use_color,
                &format!(
                    "{} missing unit(s) in {} group(s) written to {}",
                    report.total_missing(),
                    missing.group_count(),
                    out.display(),
                ),
            );
        }
    }
    Ok(())
}
