//! Property tests for eligibility and completion over random catalogs

use std::collections::BTreeSet;

use curriculum_cli::domain::{
    AttemptOutcome, CatalogError, Classification, CompletionState, CompletionStateMachine, Course,
    CourseCatalog, EligibilityEvaluator, PersistenceAdapter, Prerequisites,
};
use curriculum_cli::storage::{MemoryStore, SnapshotStore};
use proptest::prelude::*;
use tempfile::TempDir;

const CAPSTONE: &str = "CAP";

fn code(i: usize) -> String {
    format!("C{}", i)
}

// Acyclic by construction: course i may only require courses 0..i. With
// `name_capstone`, some courses may also list the capstone explicitly.
fn courses_strategy(max_courses: usize, name_capstone: bool) -> impl Strategy<Value = Vec<Course>> {
    (1..=max_courses, any::<bool>()).prop_flat_map(move |(num_courses, with_capstone)| {
        (
            proptest::collection::vec(
                proptest::collection::vec(any::<usize>(), 0..num_courses),
                num_courses,
            ),
            proptest::collection::vec(any::<bool>(), num_courses),
        )
            .prop_map(move |(raw_deps, capstone_refs)| {
                let mut courses = Vec::new();
                for (i, potential) in raw_deps.into_iter().enumerate() {
                    let deps: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    let mut reqs: Vec<String> = deps.into_iter().map(code).collect();
                    if with_capstone && name_capstone && capstone_refs[i] {
                        reqs.push(CAPSTONE.to_string());
                    }

                    courses.push(
                        Course::new(code(i).parse().unwrap(), format!("Course {}", i), (i / 3 + 1) as u32)
                            .with_prerequisites(Prerequisites::explicit(&reqs).unwrap()),
                    );
                }

                if with_capstone {
                    let semester = (num_courses / 3 + 2) as u32;
                    courses.push(
                        Course::new(CAPSTONE.parse().unwrap(), "Capstone", semester)
                            .with_prerequisites(Prerequisites::RequiresAll),
                    );
                }

                courses
            })
    })
}

fn catalog_strategy(max_courses: usize) -> impl Strategy<Value = CourseCatalog> {
    courses_strategy(max_courses, false).prop_map(|courses| CourseCatalog::new(courses).unwrap())
}

/// Arbitrary (not necessarily reachable) state from a mask over the catalog
fn state_from_mask(catalog: &CourseCatalog, mask: &[bool]) -> CompletionState {
    let codes: Vec<&str> = catalog
        .iter()
        .zip(mask.iter().cycle())
        .filter(|(_, keep)| **keep)
        .map(|(course, _)| course.code.as_str())
        .collect();
    CompletionState::from_codes(catalog, codes).unwrap()
}

fn union(catalog: &CourseCatalog, a: &CompletionState, b: &CompletionState) -> CompletionState {
    CompletionState::from_codes(catalog, a.iter().chain(b.iter())).unwrap()
}

/// Completes every course in prerequisite order, returning the final machine state
fn complete_all(catalog: &CourseCatalog) -> CompletionState {
    let mut machine = CompletionStateMachine::open(catalog, MemoryStore::new());
    for code in catalog.topological_order() {
        let outcome = machine.attempt_complete(code.as_str()).unwrap();
        assert!(outcome.is_success(), "{} was blocked in topological order", code);
    }
    machine.state().clone()
}

proptest! {
    #[test]
    fn courses_without_prerequisites_are_never_blocked(
        catalog in catalog_strategy(10),
        mask in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let state = state_from_mask(&catalog, &mask);
        let evaluator = EligibilityEvaluator::new(&catalog);

        for course in catalog.iter() {
            if course.prerequisites.is_empty() {
                let cls = evaluator.classify(course, &state);
                prop_assert!(!cls.is_blocked(), "{} blocked with no prerequisites", course.code);
                prop_assert_eq!(cls.is_completed(), state.contains(course.code.as_str()));
            }
        }
    }

    #[test]
    fn classification_is_monotonic(
        catalog in catalog_strategy(10),
        first in proptest::collection::vec(any::<bool>(), 1..12),
        more in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let state1 = state_from_mask(&catalog, &first);
        let state2 = union(&catalog, &state1, &state_from_mask(&catalog, &more));
        prop_assert!(state1.is_subset(&state2));

        let evaluator = EligibilityEvaluator::new(&catalog);
        for course in catalog.iter() {
            let before = evaluator.classify(course, &state1);
            let after = evaluator.classify(course, &state2);

            match (&before, &after) {
                (Classification::Completed, other) => {
                    prop_assert_eq!(other, &Classification::Completed);
                }
                (Classification::Available, Classification::Blocked { .. }) => {
                    prop_assert!(false, "{} went from available to blocked", course.code);
                }
                (Classification::Blocked { missing: m1 }, Classification::Blocked { missing: m2 }) => {
                    prop_assert!(m2.iter().all(|c| m1.contains(c)));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn capstone_available_iff_everything_else_completed(
        catalog in catalog_strategy(8),
        mask in proptest::collection::vec(any::<bool>(), 1..10),
    ) {
        let state = state_from_mask(&catalog, &mask);
        let evaluator = EligibilityEvaluator::new(&catalog);

        if let Some(capstone) = catalog.capstone() {
            if !state.contains(capstone.code.as_str()) {
                let others_done = catalog.all_codes().all(|c| state.contains(c.as_str()));
                let cls = evaluator.classify(capstone, &state);
                prop_assert_eq!(cls.is_available(), others_done);
            }
        }
    }

    #[test]
    fn completing_twice_equals_completing_once(
        catalog in catalog_strategy(10),
        picks in proptest::collection::vec(any::<usize>(), 1..20),
    ) {
        let store = MemoryStore::new();
        let mut machine = CompletionStateMachine::open(&catalog, &store);
        let codes: Vec<String> = catalog.iter().map(|c| c.code.to_string()).collect();

        for pick in picks {
            let code = &codes[pick % codes.len()];
            let first = machine.attempt_complete(code).unwrap();
            let state = machine.state().clone();
            let saves = store.save_count();

            let second = machine.attempt_complete(code).unwrap();
            prop_assert_eq!(machine.state(), &state);
            prop_assert_eq!(store.save_count(), saves);

            if first.is_success() {
                prop_assert!(matches!(second, AttemptOutcome::AlreadyCompleted));
            } else {
                prop_assert_eq!(second.missing(), first.missing());
            }
        }
    }

    #[test]
    fn reachable_states_respect_prerequisites(
        catalog in catalog_strategy(10),
        picks in proptest::collection::vec(any::<usize>(), 0..30),
    ) {
        let mut machine = CompletionStateMachine::open(&catalog, MemoryStore::new());
        let codes: Vec<String> = catalog.iter().map(|c| c.code.to_string()).collect();

        for pick in picks {
            let before = machine.state().clone();
            let outcome = machine.attempt_complete(&codes[pick % codes.len()]).unwrap();

            prop_assert!(before.is_subset(machine.state()));
            if !outcome.is_success() {
                prop_assert_eq!(machine.state(), &before);
            }
        }

        // Every completed course had all its prerequisites completed
        let state = machine.state();
        for code in state.iter() {
            let course = catalog.lookup(code.as_str()).unwrap();
            match &course.prerequisites {
                Prerequisites::Explicit(reqs) => {
                    prop_assert!(reqs.iter().all(|r| state.contains(r.as_str())));
                }
                Prerequisites::RequiresAll => {
                    prop_assert!(catalog.all_codes().all(|c| state.contains(c.as_str())));
                }
            }
        }
    }

    #[test]
    fn unlocked_courses_are_available(
        catalog in catalog_strategy(10),
        picks in proptest::collection::vec(any::<usize>(), 1..30),
    ) {
        let mut machine = CompletionStateMachine::open(&catalog, MemoryStore::new());
        let codes: Vec<String> = catalog.iter().map(|c| c.code.to_string()).collect();

        for pick in picks {
            if let AttemptOutcome::Completed { unlocked, .. } =
                machine.attempt_complete(&codes[pick % codes.len()]).unwrap()
            {
                for code in unlocked {
                    prop_assert!(machine.classify(code.as_str()).unwrap().is_available());
                }
            }
        }
    }

    #[test]
    fn memory_store_round_trip(
        catalog in catalog_strategy(10),
        mask in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let state = state_from_mask(&catalog, &mask);
        let store = MemoryStore::new();

        store.save(&state).unwrap();
        prop_assert_eq!(store.load(&catalog), state);
    }

    #[test]
    fn snapshot_store_round_trip(
        catalog in catalog_strategy(10),
        mask in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let dir = TempDir::new().unwrap();
        let state = state_from_mask(&catalog, &mask);
        let store = SnapshotStore::new(dir.path().join("progress.json"));

        store.save(&state).unwrap();
        prop_assert_eq!(store.load(&catalog), state);
    }

    #[test]
    fn catalogs_naming_the_capstone_are_rejected(courses in courses_strategy(10, true)) {
        let names_capstone = courses.iter().any(|c| {
            c.prerequisites.explicit_codes().iter().any(|r| r.as_str() == CAPSTONE)
        });

        match CourseCatalog::new(courses) {
            Ok(catalog) => {
                prop_assert!(!names_capstone);

                let order = catalog.topological_order();
                let pos = |code: &str| order.iter().position(|c| c.as_str() == code).unwrap();
                for course in catalog.iter() {
                    for req in course.prerequisites.explicit_codes() {
                        prop_assert!(pos(req.as_str()) < pos(course.code.as_str()));
                    }
                }
                if let Some(capstone) = catalog.capstone() {
                    prop_assert_eq!(pos(capstone.code.as_str()), order.len() - 1);
                }
            }
            Err(err) => {
                prop_assert!(names_capstone);
                let is_capstone_error = matches!(err, CatalogError::RequiresCapstone { .. });
                prop_assert!(is_capstone_error, "unexpected error: {}", err);
            }
        }
    }

    #[test]
    fn every_course_completes_in_topological_order(catalog in catalog_strategy(12)) {
        let state = complete_all(&catalog);
        prop_assert_eq!(state.len(), catalog.len());

        let progress = EligibilityEvaluator::new(&catalog).progress(&state);
        prop_assert_eq!(progress.percent(), 100);
    }
}

// =============================================================================
// Worked scenarios
// =============================================================================

fn course(code: &str, reqs: &[&str]) -> Course {
    Course::new(code.parse().unwrap(), format!("Course {}", code), 1)
        .with_prerequisites(Prerequisites::explicit(reqs).unwrap())
}

#[test]
fn prerequisite_chain_scenario() {
    let catalog = CourseCatalog::new(vec![course("A", &[]), course("B", &["A"])]).unwrap();
    let evaluator = EligibilityEvaluator::new(&catalog);
    let b = catalog.lookup("B").unwrap();

    assert_eq!(
        evaluator.classify(b, &CompletionState::new()),
        Classification::Blocked {
            missing: vec!["A".parse().unwrap()]
        }
    );

    let mut machine = CompletionStateMachine::open(&catalog, MemoryStore::new());

    let outcome = machine.attempt_complete("B").unwrap();
    assert!(!outcome.is_success());
    assert!(machine.state().is_empty());

    assert!(machine.attempt_complete("A").unwrap().is_success());
    assert_eq!(machine.state(), &CompletionState::from_codes(&catalog, ["A"]).unwrap());
    assert_eq!(machine.classify("B").unwrap(), Classification::Available);

    assert!(machine.attempt_complete("B").unwrap().is_success());
    assert_eq!(
        machine.state(),
        &CompletionState::from_codes(&catalog, ["A", "B"]).unwrap()
    );
}

#[test]
fn capstone_scenario() {
    let catalog = CourseCatalog::new(vec![
        course("A", &[]),
        course("B", &[]),
        Course::new("C".parse().unwrap(), "Capstone", 2).with_prerequisites(Prerequisites::RequiresAll),
    ])
    .unwrap();
    let evaluator = EligibilityEvaluator::new(&catalog);
    let capstone = catalog.lookup("C").unwrap();

    let only_a = CompletionState::from_codes(&catalog, ["A"]).unwrap();
    assert_eq!(
        evaluator.classify(capstone, &only_a),
        Classification::Blocked {
            missing: vec!["B".parse().unwrap()]
        }
    );

    let both = CompletionState::from_codes(&catalog, ["A", "B"]).unwrap();
    assert_eq!(evaluator.classify(capstone, &both), Classification::Available);
}

#[test]
fn snapshot_survives_a_new_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("progress.json");
    let catalog = CourseCatalog::new(vec![course("A", &[]), course("B", &["A"])]).unwrap();

    {
        let mut machine = CompletionStateMachine::open(&catalog, SnapshotStore::new(&path));
        machine.attempt_complete("A").unwrap();
    }

    let machine = CompletionStateMachine::open(&catalog, SnapshotStore::new(&path));
    assert!(machine.state().contains("A"));
    assert_eq!(machine.classify("B").unwrap(), Classification::Available);
}
