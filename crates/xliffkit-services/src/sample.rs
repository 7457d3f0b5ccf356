use rand::Rng;
use serde::{Deserialize, Serialize};
use xliffkit_core::{ConflictPolicy, FileGroup, SampleReport, UnitStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplePolicy {
    /// Every unit in the flattened population is equally likely. Not
    /// reproducible across runs; tests inject an rng via [`sample_with_rng`].
    #[default]
    UniformRandom,
    /// The first `n` units in path order; deterministic.
    FirstN,
}

/// Select up to `n` units across all groups. Groups that keep no unit are
/// dropped; surviving groups retain their metadata and the original relative
/// order of the selected units. A population of `n` or fewer is returned
/// unchanged.
pub fn sample(store: &UnitStore, n: usize, policy: SamplePolicy) -> (UnitStore, SampleReport) {
    match policy {
        SamplePolicy::UniformRandom => sample_with_rng(store, n, &mut rand::thread_rng()),
        SamplePolicy::FirstN => {
            let population = store.total_units();
            if population <= n {
                return whole_store(store, n, population);
            }
            let mut selected = vec![false; population];
            for flag in selected.iter_mut().take(n) {
                *flag = true;
            }
            rebuild(store, &selected, n)
        }
    }
}

/// Uniform sampling without replacement with a caller-supplied source of
/// randomness.
pub fn sample_with_rng<R: Rng + ?Sized>(
    store: &UnitStore,
    n: usize,
    rng: &mut R,
) -> (UnitStore, SampleReport) {
    let population = store.total_units();
    if population <= n {
        return whole_store(store, n, population);
    }
    let mut selected = vec![false; population];
    for i in rand::seq::index::sample(rng, population, n).iter() {
        selected[i] = true;
    }
    rebuild(store, &selected, n)
}

fn whole_store(store: &UnitStore, requested: usize, population: usize) -> (UnitStore, SampleReport) {
    (
        store.clone(),
        SampleReport { population, requested, selected: population },
    )
}

fn rebuild(store: &UnitStore, selected: &[bool], requested: usize) -> (UnitStore, SampleReport) {
    let mut out = UnitStore::new();
    out.doc_attrs = store.doc_attrs.clone();
    let mut kept = 0;
    let mut idx = 0;
    for group in store.groups() {
        let mut g = FileGroup::new(group.original.clone(), group.meta.clone());
        for unit in group.units() {
            if selected[idx] {
                g.insert(unit.clone(), ConflictPolicy::KeepFirst);
                kept += 1;
            }
            idx += 1;
        }
        if !g.is_empty() {
            out.insert_group(g);
        }
    }
    tracing::debug!(event = "sample_done", requested, selected = kept, population = selected.len());
    (
        out,
        SampleReport { population: selected.len(), requested, selected: kept },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ids_by_path, store, unit};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn population() -> UnitStore {
        store(&[
            ("A", vec![unit("a1", "1", None), unit("a2", "2", None)]),
            ("B", vec![unit("b1", "3", None), unit("b2", "4", None), unit("b3", "5", None)]),
        ])
    }

    #[test]
    fn requesting_at_least_population_returns_everything() {
        let s = population();
        let (out, report) = sample(&s, 5, SamplePolicy::UniformRandom);
        assert_eq!(ids_by_path(&out), ids_by_path(&s));
        assert_eq!(report.selected, 5);

        let (out, _) = sample(&s, 100, SamplePolicy::FirstN);
        assert_eq!(ids_by_path(&out), ids_by_path(&s));
    }

    #[test]
    fn first_n_is_deterministic() {
        let s = population();
        let (one, report) = sample(&s, 3, SamplePolicy::FirstN);
        let (two, _) = sample(&s, 3, SamplePolicy::FirstN);
        assert_eq!(ids_by_path(&one), ids_by_path(&two));
        assert_eq!(ids_by_path(&one)["A"], ["a1", "a2"]);
        assert_eq!(ids_by_path(&one)["B"], ["b1"]);
        assert_eq!(report.selected, 3);
        assert_eq!(report.population, 5);
    }

    #[test]
    fn uniform_selects_exactly_n_in_original_order() {
        let s = population();
        let mut rng = StdRng::seed_from_u64(7);
        let (out, report) = sample_with_rng(&s, 2, &mut rng);
        assert_eq!(report.selected, 2);
        assert_eq!(out.total_units(), 2);
        // Selected units keep their original relative order within a group.
        for (path, ids) in ids_by_path(&out) {
            let original = ids_by_path(&s)[&path].clone();
            let positions: Vec<_> = ids
                .iter()
                .map(|id| original.iter().position(|o| o == id).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn empty_groups_are_dropped_from_the_sample() {
        let s = population();
        let (out, _) = sample(&s, 2, SamplePolicy::FirstN);
        // First two units both live in group A.
        assert!(out.group("B").is_none());
        assert_eq!(ids_by_path(&out)["A"], ["a1", "a2"]);
    }

    #[test]
    fn sampling_zero_yields_empty_store() {
        let s = population();
        let (out, report) = sample(&s, 0, SamplePolicy::FirstN);
        assert!(out.is_empty());
        assert_eq!(report.selected, 0);
    }
}
