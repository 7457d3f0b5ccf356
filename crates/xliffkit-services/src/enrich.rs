use xliffkit_core::{ConflictPolicy, EnrichReport, FileGroup, UnitStore, TARGET_SLOT};

/// Cross-store join: copy the secondary store's own translation into an
/// extra named slot on every matching primary unit.
///
/// Best-effort by design: primary units without a counterpart pass through
/// untouched, and no unit is ever dropped or reordered. A matched unit whose
/// translation is empty or whitespace-only counts as not found — the slot is
/// left absent rather than written as an empty string, so a blind export
/// never pairs a translation against a blank cell.
pub fn enrich(primary: &UnitStore, secondary: &UnitStore, slot: &str) -> (UnitStore, EnrichReport) {
    let mut out = UnitStore::new();
    out.doc_attrs = primary.doc_attrs.clone();
    let mut report = EnrichReport::default();

    for group in primary.groups() {
        let mut enriched = FileGroup::new(group.original.clone(), group.meta.clone());
        for unit in group.units() {
            let mut unit = unit.clone();
            match secondary
                .lookup(&group.original, &unit.id)
                .and_then(|m| m.slot(TARGET_SLOT))
            {
                Some(text) if !text.trim().is_empty() => {
                    unit.set_slot(slot, text);
                    report.matched += 1;
                }
                Some(_) => report.skipped_empty += 1,
                None => report.unmatched += 1,
            }
            enriched.insert(unit, ConflictPolicy::KeepFirst);
        }
        out.insert_group(enriched);
    }

    tracing::debug!(
        event = "enrich_done",
        slot = slot,
        matched = report.matched,
        unmatched = report.unmatched,
        skipped_empty = report.skipped_empty,
    );
    (out, report)
}
