use xliffkit_core::{ConflictPolicy, DiffReport, FileGroup, UnitStore};

/// Set difference: for every baseline group, the units whose id has no match
/// in the same-path comparison group. A path absent from `comparison` counts
/// as entirely untranslated. Groups that end up empty are omitted, so
/// `diff(a, a)` is a store with no groups at all.
///
/// Matching is exact on `original` path and id; this is the "what has not
/// been translated yet" primitive behind incremental work batches.
pub fn diff(baseline: &UnitStore, comparison: &UnitStore) -> (UnitStore, DiffReport) {
    let mut out = UnitStore::new();
    out.doc_attrs = baseline.doc_attrs.clone();
    let mut report = DiffReport::default();

    for group in baseline.groups() {
        let mut missing = FileGroup::new(group.original.clone(), group.meta.clone());
        for unit in group.units() {
            if comparison.lookup(&group.original, &unit.id).is_none() {
                missing.insert(unit.clone(), ConflictPolicy::KeepFirst);
            }
        }
        if !missing.is_empty() {
            report.groups.insert(group.original.clone(), missing.len());
            out.insert_group(missing);
        }
    }

    tracing::debug!(
        event = "diff_done",
        groups = out.group_count(),
        missing = report.total_missing(),
    );
    (out, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::combine;
    use crate::testutil::{ids_by_path, store, unit};

    #[test]
    fn reports_units_missing_from_comparison() {
        let baseline = store(&[(
            "Menu.strings",
            vec![unit("ok", "OK", None), unit("cancel", "Cancel", None)],
        )]);
        let comparison = store(&[("Menu.strings", vec![unit("ok", "OK", Some("OK"))])]);

        let (missing, report) = diff(&baseline, &comparison);
        let ids = ids_by_path(&missing);
        assert_eq!(ids.len(), 1);
        assert_eq!(ids["Menu.strings"], ["cancel"]);
        assert_eq!(report.groups["Menu.strings"], 1);
        assert_eq!(report.total_missing(), 1);
    }

    #[test]
    fn diff_is_anti_reflexive() {
        let a = store(&[
            ("F", vec![unit("x", "X", None)]),
            ("G", vec![unit("y", "Y", None)]),
        ]);
        let (empty, report) = diff(&a, &a);
        assert!(empty.is_empty());
        assert_eq!(report.total_missing(), 0);
    }

    #[test]
    fn absent_comparison_group_means_all_missing() {
        let baseline = store(&[("F", vec![unit("a", "A", None), unit("b", "B", None)])]);
        let comparison = store(&[("G", vec![unit("a", "A", None)])]);
        let (missing, report) = diff(&baseline, &comparison);
        assert_eq!(ids_by_path(&missing)["F"], ["a", "b"]);
        assert_eq!(report.groups["F"], 2);
    }

    #[test]
    fn groups_with_nothing_missing_are_omitted() {
        let baseline = store(&[
            ("F", vec![unit("a", "A", None)]),
            ("G", vec![unit("b", "B", None)]),
        ]);
        let comparison = store(&[("F", vec![unit("a", "A", Some("a"))])]);
        let (missing, _) = diff(&baseline, &comparison);
        assert!(missing.group("F").is_none());
        assert_eq!(ids_by_path(&missing)["G"], ["b"]);
    }

    #[test]
    fn diff_then_combine_restores_baseline_ids() {
        let baseline = store(&[(
            "F",
            vec![
                unit("a", "A", None),
                unit("b", "B", None),
                unit("c", "C", None),
            ],
        )]);
        let partial = store(&[("F", vec![unit("b", "B", Some("b")) ])]);

        let (missing, _) = diff(&baseline, &partial);
        let (restored, _) = combine(&[missing, partial]);

        let mut restored_ids = ids_by_path(&restored)["F"].clone();
        let mut baseline_ids = ids_by_path(&baseline)["F"].clone();
        restored_ids.sort();
        baseline_ids.sort();
        assert_eq!(restored_ids, baseline_ids);
    }
}
