//! End-to-end run on the four-node "vierer" pattern.

use lifting_core::cayley::CayleyGraph;
use lifting_core::codes::{self, CodeRecord};
use lifting_core::nfa::{cofinite_path_condition, third_path_condition};
use lifting_core::{
    check, iterate_lifting, Certificate, CheckConfig, LiftingConfig, LiftingOutcome, Outcome,
    Pattern,
};
use num_bigint::BigUint;

const VIERER_CODE: u64 = 1176775189;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn vierer() -> Pattern {
    Pattern::from_edge_lists(
        4,
        &[(0, 0), (0, 1), (1, 2), (1, 3), (2, 0), (3, 2)],
        &[(1, 1), (1, 2), (2, 0), (2, 2), (2, 3)],
    )
}

#[test]
fn test_code() {
    let (n, code) = codes::encode(&vierer());
    assert_eq!(n, 4);
    assert_eq!(code, BigUint::from(VIERER_CODE));
    let record: CodeRecord = "4,1176775189\n".parse().unwrap();
    assert_eq!(record.decode().unwrap(), vierer());
    assert_eq!(record.to_string(), "4,1176775189");
}

#[test]
fn test_path_conditions_hold() {
    init_tracing();
    let p = vierer();
    let graph = CayleyGraph::new(&p);
    assert_eq!(graph.len(), 29);
    assert!(graph.check_first_path_condition());
    assert!(graph.check_second_path_condition());
    assert!(third_path_condition(&p));
    // every word of length four or more sends some single node onto all nodes
    assert!(cofinite_path_condition(&p).unwrap());
}

#[test]
fn test_lifting_generations() {
    init_tracing();
    let p = vierer();
    assert!(!p.has_double_selfloop());

    let mut by_hand = p.clone();
    by_hand.remove_useless_edges();
    assert_eq!(by_hand, p);

    let mut sizes = vec![by_hand.size()];
    for _ in 0..3 {
        by_hand = by_hand.lifting();
        by_hand.remove_useless_nodes();
        assert!(!by_hand.has_double_selfloop());
        sizes.push(by_hand.size());
    }
    assert_eq!(sizes, vec![(4, 6, 5), (4, 7, 8), (5, 10, 14), (5, 10, 14)]);

    let report = iterate_lifting(p, &LiftingConfig::default());
    assert_eq!(report.outcome, LiftingOutcome::Fixpoint { generation: 3 });
    assert_eq!(report.pattern, by_hand);
}

#[test]
fn test_check() {
    init_tracing();
    let outcome = check(4, &BigUint::from(VIERER_CODE), &CheckConfig::default()).unwrap();
    assert_eq!(
        outcome,
        Outcome::NoHomomorphism(Certificate::LiftingFixpoint { generation: 3 })
    );
}

#[test]
fn test_bounds_are_respected() {
    let config = LiftingConfig {
        max_nodes: 1000,
        max_generations: Some(6),
    };
    let report = iterate_lifting(vierer(), &config);
    assert_eq!(report.outcome, LiftingOutcome::Fixpoint { generation: 3 });
    assert_eq!(report.generations.len(), 4);
}
