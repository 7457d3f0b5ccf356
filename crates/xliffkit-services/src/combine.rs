use std::path::{Path, PathBuf};

use color_eyre::eyre::bail;
use walkdir::WalkDir;
use xliffkit_core::{CombineReport, ConflictPolicy, InsertOutcome, Result, UnitStore};

/// Union with keep-first deduplication.
///
/// Stores are processed in input order; the earliest store that introduces a
/// given (path, id) wins, so re-combining already-merged output with one of
/// its inputs is a no-op. Group metadata and the document envelope likewise
/// come from the first store carrying them. Groups with no units are not
/// carried over.
pub fn combine(stores: &[UnitStore]) -> (UnitStore, CombineReport) {
    combine_with_policy(stores, ConflictPolicy::KeepFirst)
}

/// [`combine`] with an explicit conflict policy. Under
/// [`ConflictPolicy::Overwrite`] the latest store wins instead; duplicate
/// encounters are still classified the same way in the report.
pub fn combine_with_policy(
    stores: &[UnitStore],
    policy: ConflictPolicy,
) -> (UnitStore, CombineReport) {
    let mut acc = UnitStore::new();
    let mut report = CombineReport::default();

    for store in stores {
        if acc.doc_attrs.is_empty() {
            acc.doc_attrs = store.doc_attrs.clone();
        }
        for group in store.groups() {
            if group.is_empty() {
                continue;
            }
            let stat = report.groups.entry(group.original.clone()).or_default();
            for unit in group.units() {
                let identical = acc
                    .lookup(&group.original, &unit.id)
                    .map(|existing| existing.same_content(unit));
                match acc.insert_or_skip(&group.original, unit.clone(), &group.meta, policy) {
                    InsertOutcome::Inserted => stat.added += 1,
                    InsertOutcome::SkippedDuplicate | InsertOutcome::Replaced => {
                        if identical == Some(true) {
                            stat.skipped_identical += 1;
                        } else {
                            stat.skipped_conflicting += 1;
                        }
                    }
                }
            }
        }
    }

    tracing::debug!(
        event = "combine_done",
        stores = stores.len(),
        groups = acc.group_count(),
        added = report.total_added(),
        skipped = report.total_skipped(),
    );
    (acc, report)
}

/// Load every `.xliff` file directly under `dir` and combine them.
///
/// File names are sorted before processing so conflict resolution does not
/// depend on directory enumeration order.
pub fn combine_dir(dir: &Path, policy: ConflictPolicy) -> Result<(UnitStore, CombineReport)> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("xliff"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();

    if files.is_empty() {
        bail!("no .xliff files found in {}", dir.display());
    }

    let mut stores = Vec::with_capacity(files.len());
    for file in &files {
        tracing::info!(event = "combine_load", file = %file.display());
        stores.push(xliffkit_xliff::load_store(file)?);
    }
    Ok(combine_with_policy(&stores, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ids_by_path, store, unit};

    #[test]
    fn keep_first_wins_and_conflict_is_reported() {
        let a = store(&[("F", vec![unit("id1", "first", None)])]);
        let b = store(&[(
            "F",
            vec![unit("id1", "second", None), unit("id2", "two", None)],
        )]);

        let (merged, report) = combine(&[a, b]);
        let ids = ids_by_path(&merged);
        assert_eq!(ids["F"], ["id1", "id2"]);
        assert_eq!(
            merged.lookup("F", "id1").unwrap().source.as_deref(),
            Some("first")
        );

        let stat = &report.groups["F"];
        assert_eq!(stat.added, 2);
        assert_eq!(stat.skipped_conflicting, 1);
        assert_eq!(stat.skipped_identical, 0);
    }

    #[test]
    fn exact_duplicates_are_counted_separately() {
        let a = store(&[("F", vec![unit("id1", "same", Some("uguale"))])]);
        let b = store(&[("F", vec![unit("id1", "same", Some("uguale"))])]);
        let (_, report) = combine(&[a, b]);
        let stat = &report.groups["F"];
        assert_eq!(stat.skipped_identical, 1);
        assert_eq!(stat.skipped_conflicting, 0);
    }

    #[test]
    fn combine_is_idempotent() {
        let a = store(&[("F", vec![unit("id1", "one", None)])]);
        let b = store(&[("F", vec![unit("id1", "uno", None), unit("id2", "two", None)])]);

        let (once, _) = combine(&[a.clone(), b.clone()]);
        let (twice, _) = combine(&[once.clone(), b]);
        assert_eq!(ids_by_path(&once), ids_by_path(&twice));
        assert_eq!(
            once.lookup("F", "id1").unwrap(),
            twice.lookup("F", "id1").unwrap()
        );
    }

    #[test]
    fn disjoint_stores_commute() {
        let a = store(&[("F", vec![unit("a1", "A", None)])]);
        let b = store(&[("F", vec![unit("b1", "B", None)]), ("G", vec![unit("g1", "G", None)])]);

        let (ab, _) = combine(&[a.clone(), b.clone()]);
        let (ba, _) = combine(&[b, a]);
        // Same id sets per group; insertion order differs by construction.
        for (path, ids) in ids_by_path(&ab) {
            let mut lhs = ids;
            let mut rhs = ids_by_path(&ba).remove(&path).unwrap();
            lhs.sort();
            rhs.sort();
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn metadata_comes_from_first_store_introducing_the_path() {
        use xliffkit_core::{ConflictPolicy, GroupMeta, UnitStore};

        let mut a = UnitStore::new();
        a.insert_or_skip(
            "F",
            unit("id1", "one", None),
            &GroupMeta {
                attrs: vec![("original".into(), "F".into()), ("datatype".into(), "plaintext".into())],
                header_xml: Some("<tool tool-id=\"a\"/>".into()),
            },
            ConflictPolicy::KeepFirst,
        );
        let mut b = UnitStore::new();
        b.insert_or_skip(
            "F",
            unit("id2", "two", None),
            &GroupMeta {
                attrs: vec![("original".into(), "F".into())],
                header_xml: Some("<tool tool-id=\"b\"/>".into()),
            },
            ConflictPolicy::KeepFirst,
        );

        let (merged, _) = combine(&[a, b]);
        assert_eq!(
            merged.group("F").unwrap().meta.header_xml.as_deref(),
            Some("<tool tool-id=\"a\"/>")
        );
    }

    #[test]
    fn combine_dir_reads_sorted_xliff_files() {
        let tmp = tempfile::tempdir().unwrap();
        let doc = |path: &str, id: &str, src: &str| {
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff xmlns=\"urn:oasis:names:tc:xliff:document:1.2\" version=\"1.2\">\n<file original=\"{path}\" source-language=\"en\" datatype=\"plaintext\"><body>\n<trans-unit id=\"{id}\"><source>{src}</source></trans-unit>\n</body></file></xliff>"
            )
        };
        // "a.xliff" sorts before "b.xliff", so its id1 wins.
        std::fs::write(tmp.path().join("b.xliff"), doc("F", "id1", "from-b")).unwrap();
        std::fs::write(tmp.path().join("a.xliff"), doc("F", "id1", "from-a")).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let (merged, report) = combine_dir(tmp.path(), ConflictPolicy::KeepFirst).unwrap();
        assert_eq!(
            merged.lookup("F", "id1").unwrap().source.as_deref(),
            Some("from-a")
        );
        assert_eq!(report.groups["F"].skipped_conflicting, 1);
    }

    #[test]
    fn combine_dir_without_inputs_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(combine_dir(tmp.path(), ConflictPolicy::KeepFirst).is_err());
    }

    #[test]
    fn overwrite_policy_lets_later_stores_win() {
        let a = store(&[("F", vec![unit("id1", "first", None)])]);
        let b = store(&[("F", vec![unit("id1", "second", None)])]);
        let (merged, report) = combine_with_policy(&[a, b], ConflictPolicy::Overwrite);
        assert_eq!(
            merged.lookup("F", "id1").unwrap().source.as_deref(),
            Some("second")
        );
        assert_eq!(report.groups["F"].skipped_conflicting, 1);
    }
}
