use std::path::PathBuf;

use super::ok_line;
use xliffkit_core::CLASSIC_SLOT;

pub fn run_enrich(
    primary: PathBuf,
    secondary: PathBuf,
    out: PathBuf,
    slot: Option<String>,
    use_color: bool,
    quiet: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "enrich_args", primary = ?primary, secondary = ?secondary, out = ?out, slot = ?slot);
    let cfg = xliffkit_config::load_config().unwrap_or_default();

    let slot = slot
        .or_else(|| cfg.enrich.as_ref().and_then(|e| e.slot.clone()))
        .unwrap_or_else(|| CLASSIC_SLOT.to_string());

    let primary_store = xliffkit_xliff::load_store(&primary)?;
    let secondary_store = xliffkit_xliff::load_store(&secondary)?;

    let (enriched, report) = xliffkit_services::enrich(&primary_store, &secondary_store, &slot);
    xliffkit_xliff::save_store(&out, &enriched)?;

    tracing::info!(
        event = "enrich_saved",
        path = %out.display(),
        slot = %slot,
        matched = report.matched,
        unmatched = report.unmatched,
        skipped_empty = report.skipped_empty,
    );
    if !quiet {
        ok_line(
            use_color,
            &format!(
                "enriched {} unit(s) with slot \"{}\" into {} ({} without match, {} empty skipped)",
                report.matched,
                slot,
                out.display(),
                report.unmatched,
                report.skipped_empty,
            ),
        );
    }
    Ok(())
}
