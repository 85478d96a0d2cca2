//! Property-based tests using proptest.
//!
//! These tests check invariants over randomly drawn inputs instead of
//! specific numerical values:
//!   - permutation rows are bijections with an identity first row
//!   - projection matrices are symmetric and idempotent
//!   - Gower-centered matrices have zero margins
//!   - MDMR p-values stay on the permutation grid
//!   - empirical power stays in [0, 1]

use proptest::prelude::*;
use rand::{Rng, SeedableRng};

use permtest_core::independence::DistanceCorrelation;
use permtest_core::mdmr::{DistanceColumns, Mdmr, MdmrConfig};
use permtest_core::permutation::PermutationIndexes;
use permtest_core::power::PowerEstimator;
use permtest_core::simulation::{Simulation, SimulationArgs};
use permtest_linalg::distance::pairwise_distances;
use permtest_linalg::projection::{gower_center, hatify};
use permtest_linalg::{DenseMatrix, DistanceMetric};

fn random_matrix(n: usize, k: usize, rng: &mut rand_chacha::ChaCha8Rng) -> DenseMatrix {
    DenseMatrix::from_fn(n, k, |_, _| rng.gen_range(-2.0..2.0))
}

// ---------------------------------------------------------------------------
// 1. Permutation rows are bijections, row 0 is the identity
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_permutation_rows_are_bijections(
        n in 1usize..40,
        p in 0usize..30,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let perms = PermutationIndexes::generate(n, p, &mut rng);

        prop_assert_eq!(perms.n_rows(), p + 1);
        prop_assert!(perms.row(0).iter().enumerate().all(|(i, &v)| i == v));
        for row in perms.rows() {
            let mut sorted = row.to_vec();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..n).collect::<Vec<_>>());
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Projection matrices are symmetric and idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_hatify_symmetric_idempotent(
        n in 4usize..20,
        k in 1usize..4,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let x = random_matrix(n, k, &mut rng);
        let h = hatify(&x).unwrap();

        prop_assert!(h.max_abs_diff(&h.transpose()) < 1e-10);
        prop_assert!(h.max_abs_diff(&h.mat_mul(&h)) < 1e-8);
    }
}

// ---------------------------------------------------------------------------
// 3. Gower-centered distances have zero row and column sums
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn prop_gower_zero_margins(
        n in 2usize..20,
        d in 1usize..4,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let y = random_matrix(n, d, &mut rng);
        let sq = pairwise_distances(&y, DistanceMetric::SquaredEuclidean);
        let g = gower_center(&sq).unwrap();

        for s in g.row_sums().into_iter().chain(g.col_sums()) {
            prop_assert!(s.abs() < 1e-9, "margin = {}", s);
        }
    }
}

// ---------------------------------------------------------------------------
// 4. MDMR p-values lie in [1/(P+1), 1] on the 1/(P+1) grid
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_mdmr_pvalue_bounds(
        n in 6usize..14,
        p in 1usize..40,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let design = random_matrix(n, 1, &mut rng);
        let outcome = random_matrix(n, 2, &mut rng);
        let distances =
            DistanceColumns::from_outcomes(&[outcome], DistanceMetric::Euclidean).unwrap();

        let table = Mdmr::new(MdmrConfig { permutations: p })
            .run(&distances, &design, &mut rng)
            .unwrap();

        let grid = (p + 1) as f64;
        for row in &table.rows {
            prop_assert!(row.p_value >= 1.0 / grid - 1e-12);
            prop_assert!(row.p_value <= 1.0);
            let count = row.p_value * grid;
            prop_assert!((count - count.round()).abs() < 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// 5. Empirical power lies in [0, 1]
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_power_in_unit_interval(
        repeats in 1usize..25,
        alpha in 0.01f64..0.99,
        n in 4usize..12,
        seed in 0u64..1000,
    ) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
        let est = PowerEstimator::new(repeats, alpha)
            .unwrap()
            .power(
                &DistanceCorrelation::default(),
                &Simulation::Independent,
                n,
                1,
                &SimulationArgs::Noise { noise: 1.0 },
                &mut rng,
            )
            .unwrap();

        prop_assert!((0.0..=1.0).contains(&est.power));
        prop_assert_eq!(est.null_statistics.len(), repeats);
    }
}
