//! Property-based testing for versa
//!
//! Uses proptest to check history invariants across randomly generated
//! sequences of adds and removals.

use ::versa::*;
use proptest::prelude::*;

/// One step applied to a service
#[derive(Debug, Clone)]
pub enum HistoryOperation {
    Add(String),
    /// Remove the stored version at this index modulo the history length
    Remove(usize),
}

/// Small alphabet so duplicates and shared lines come up often
fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[abc]{0,3}", 1..5).prop_map(|lines| lines.join("\n"))
}

fn operation_strategy() -> impl Strategy<Value = HistoryOperation> {
    prop_oneof![
        3 => content_strategy().prop_map(HistoryOperation::Add),
        1 => any::<usize>().prop_map(HistoryOperation::Remove),
    ]
}

/// Lines as the diff sees them, with one trailing newline implied
fn lines(text: &str) -> Vec<&str> {
    text.strip_suffix('\n').unwrap_or(text).split('\n').collect()
}

/// Apply operations to a service and to a plain list model side by side
fn apply(operations: &[HistoryOperation]) -> (VersioningService, Vec<(u64, String)>) {
    let mut service = VersioningService::new();
    let mut model: Vec<(u64, String)> = Vec::new();
    let mut counter = 0;

    for operation in operations {
        match operation {
            HistoryOperation::Add(content) => {
                let duplicate = model.iter().any(|(_, c)| c == content);
                match service.add(content.clone()) {
                    Ok(version) => {
                        assert!(!duplicate);
                        counter += 1;
                        assert_eq!(version, counter);
                        model.push((version, content.clone()));
                    }
                    Err(VersaError::DuplicateContent) => assert!(duplicate),
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
            HistoryOperation::Remove(idx) => {
                if model.is_empty() {
                    continue;
                }
                let (version, content) = model.remove(idx % model.len());
                let removed = service.remove(version).unwrap();
                assert_eq!(removed.content(), content);
            }
        }
    }

    (service, model)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The service matches the list model after any sequence of operations
    #[test]
    fn prop_history_matches_model(operations in prop::collection::vec(operation_strategy(), 0..40)) {
        let (service, model) = apply(&operations);

        let history: Vec<(u64, String)> = service
            .list_all()
            .map(|s| (s.version(), s.content().to_string()))
            .collect();
        prop_assert_eq!(&history, &model);
        prop_assert_eq!(service.len(), model.len());

        // Versions are strictly increasing
        prop_assert!(history.windows(2).all(|w| w[0].0 < w[1].0));
    }

    /// Adding stored content again is rejected and consumes no number
    #[test]
    fn prop_dedup_is_idempotent(operations in prop::collection::vec(operation_strategy(), 1..30)) {
        let (mut service, model) = apply(&operations);
        let latest = service.latest_version();

        for (_, content) in &model {
            prop_assert!(matches!(service.add(content.clone()), Err(VersaError::DuplicateContent)));
        }
        prop_assert_eq!(service.latest_version(), latest);
        prop_assert_eq!(service.len(), model.len());
    }

    /// Removed versions are gone, everything else is still loadable
    #[test]
    fn prop_remove_then_lookup(
        contents in prop::collection::hash_set(content_strategy(), 1..15),
        picks in prop::collection::vec(any::<usize>(), 0..10),
    ) {
        let mut service = VersioningService::new();
        let mut alive: Vec<u64> = contents
            .iter()
            .map(|c| service.add(c.clone()).unwrap())
            .collect();

        let mut removed = Vec::new();
        for pick in picks {
            if alive.is_empty() {
                break;
            }
            let version = alive.remove(pick % alive.len());
            service.remove(version).unwrap();
            removed.push(version);
        }

        for version in &removed {
            prop_assert!(service.load(*version).unwrap_err().is_not_found());
            prop_assert!(service.remove(*version).unwrap_err().is_not_found());

            // Comparing against a removed version fails from either side
            for other in alive.iter().chain(removed.iter()) {
                prop_assert!(service.compare(*version, *other).unwrap_err().is_not_found());
                prop_assert!(service.compare(*other, *version).unwrap_err().is_not_found());
            }
        }
        for version in &alive {
            prop_assert_eq!(service.load(*version).unwrap().version(), *version);
        }
        prop_assert_eq!(
            service.store().head().map(Snapshot::version),
            alive.first().copied()
        );
    }

    /// A version compared with itself is identical on every line
    #[test]
    fn prop_self_compare_is_identical(content in content_strategy()) {
        let mut service = VersioningService::new();
        let version = service.add(content.clone()).unwrap();

        let diff = service.compare(version, version).unwrap();
        prop_assert!(diff.is_identical());
        prop_assert_eq!(diff.len(), lines(&content).len());
    }

    /// Diff length is the longer side, divergent lines really differ and
    /// swapping the versions mirrors the result
    #[test]
    fn prop_compare_pairs_lines(left in content_strategy(), right in content_strategy()) {
        prop_assume!(left != right);
        let mut service = VersioningService::new();
        let first = service.add(left.clone()).unwrap();
        let second = service.add(right.clone()).unwrap();

        let left_lines = lines(&left);
        let right_lines = lines(&right);
        let diff = service.compare(first, second).unwrap();
        prop_assert_eq!(diff.len(), left_lines.len().max(right_lines.len()));

        for record in &diff {
            let idx = record.number - 1;
            let expected_same = left_lines.get(idx) == right_lines.get(idx);
            prop_assert_eq!(record.is_identical(), expected_same);
        }

        // Swapping the sides swaps every divergent pair
        let swapped = service.compare(second, first).unwrap();
        prop_assert_eq!(swapped.len(), diff.len());
        for (a, b) in diff.iter().zip(swapped.iter()) {
            match (&a.status, &b.status) {
                (LineStatus::Identical(x), LineStatus::Identical(y)) => prop_assert_eq!(x, y),
                (
                    LineStatus::Divergent { left, right },
                    LineStatus::Divergent { left: swapped_left, right: swapped_right },
                ) => {
                    prop_assert_eq!(left, swapped_right);
                    prop_assert_eq!(right, swapped_left);
                }
                _ => prop_assert!(false, "line {} changed status when swapped", a.number),
            }
        }
    }

    /// Search returns exactly the versions containing the keyword, in order
    #[test]
    fn prop_search_is_exact(
        operations in prop::collection::vec(operation_strategy(), 0..30),
        keyword in "[abc]{1,2}",
    ) {
        let (service, model) = apply(&operations);

        let hits: Vec<u64> = service.search(&keyword).iter().map(|h| h.version).collect();
        let expected: Vec<u64> = model
            .iter()
            .filter(|(_, c)| c.contains(keyword.as_str()))
            .map(|(v, _)| *v)
            .collect();
        prop_assert_eq!(service.has_keyword(&keyword), !expected.is_empty());
        prop_assert_eq!(hits, expected);
    }
}
