use std::collections::HashMap;

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::*;

use winsig_core::models::{GenomicInterval, IntervalSet};
use winsig_model::diagnostics::RecordingDiagnostics;
use winsig_model::{Algorithm, WindowModel, WindowResult};

const TOLERANCE: f64 = 1e-9;

fn intervals(bounds: &[(i64, i64)]) -> Vec<GenomicInterval> {
    bounds
        .iter()
        .map(|&(begin, end)| GenomicInterval::new("chr1", begin, end))
        .collect()
}

struct Scenario {
    windows: Vec<GenomicInterval>,
    refs: Vec<GenomicInterval>,
    queries: Vec<GenomicInterval>,
    length: i64,
}

impl Scenario {
    fn run(&self, algorithm: Algorithm) -> Vec<WindowResult> {
        let sizes = HashMap::from([("chr1".to_string(), self.length)]);
        WindowModel::new(
            self.windows.clone(),
            self.refs.clone(),
            self.queries.clone(),
            &sizes,
            algorithm,
        )
        .run(&RecordingDiagnostics::default())
        .unwrap()
    }
}

fn assert_equivalent(naive: &[WindowResult], fast: &[WindowResult]) {
    assert_eq!(naive.len(), fast.len());
    for (n, f) in naive.iter().zip(fast) {
        assert_eq!(n.window, f.window);
        assert_eq!(n.overlap_count, f.overlap_count, "window {}", n.window);
        assert_eq!(n.probs.len(), f.probs.len(), "window {}", n.window);
        for (k, (x, y)) in n.probs.iter().zip(&f.probs).enumerate() {
            assert!(
                (x.exp() - y.exp()).abs() < TOLERANCE,
                "window {} k={}: naive {} fast {}",
                n.window,
                k,
                x.exp(),
                y.exp()
            );
        }
    }
}

fn assert_valid(results: &[WindowResult]) {
    for result in results {
        let total: f64 = result.probs.iter().map(|p| p.exp()).sum();
        assert!((total - 1.0).abs() < TOLERANCE, "window {}: sum {}", result.window, total);

        let m = result.probs.len() as i64 - 1;
        assert!((0..=m).contains(&result.overlap_count), "window {}", result.window);
    }
}

fn base_refs() -> Vec<GenomicInterval> {
    intervals(&[
        (1909, 2009),
        (2694, 2794),
        (5124, 5224),
        (6333, 6433),
        (9299, 9399),
        (9629, 9729),
    ])
}

fn overflowing_refs() -> Vec<GenomicInterval> {
    intervals(&[
        (1909, 2009),
        (2694, 2794),
        (3000, 7000),
        (9299, 9399),
        (9629, 9729),
    ])
}

fn base_queries() -> Vec<GenomicInterval> {
    intervals(&[
        (40, 140),
        (213, 313),
        (505, 605),
        (638, 738),
        (859, 959),
        (996, 1096),
        (1135, 1235),
        (1328, 1428),
        (1448, 1548),
        (1728, 1828),
        (1863, 1963),
        (2159, 2259),
        (2278, 2378),
        (2472, 2572),
        (2652, 2752),
        (2783, 2883),
        (2935, 3035),
        (3102, 3202),
        (3207, 3307),
        (3311, 3411),
        (3468, 3568),
        (3572, 3672),
        (3780, 3880),
        (3935, 4035),
        (4331, 4431),
        (4582, 4682),
        (4854, 4954),
        (5079, 5179),
        (5218, 5318),
        (5443, 5543),
        (5650, 5750),
        (6050, 6150),
        (6198, 6298),
        (6590, 6690),
        (6739, 6839),
        (6898, 6998),
        (7288, 7388),
        (7428, 7528),
        (7682, 7782),
        (8166, 8266),
        (8399, 8499),
        (8548, 8648),
        (8755, 8855),
        (9140, 9240),
        (9242, 9342),
        (9388, 9488),
        (9647, 9747),
        (9749, 9849),
        (9914, 10000),
    ])
}

fn g24_queries() -> Vec<GenomicInterval> {
    intervals(&[
        (42, 142),
        (297, 397),
        (547, 647),
        (874, 974),
        (1151, 1251),
        (1263, 1363),
        (1434, 1534),
        (1587, 1687),
        (1733, 1833),
        (1861, 1961),
        (2079, 2179),
        (2325, 2425),
        (2486, 2586),
        (2678, 2778),
        (2899, 2999),
    ])
}

#[fixture]
fn non_overlapping() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 2000), (2000, 4000), (4000, 6000), (6000, 8000), (8000, 10000)]),
        refs: base_refs(),
        queries: base_queries(),
        length: 10000,
    }
}

#[fixture]
fn empty_section_merge() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 10000), (5000, 15000)]),
        refs: base_refs(),
        queries: base_queries(),
        length: 15000,
    }
}

#[fixture]
fn empty_window() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 5000), (5000, 10000), (10000, 15000)]),
        refs: base_refs(),
        queries: base_queries(),
        length: 15000,
    }
}

#[fixture]
fn overflowing() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 4000), (2000, 6000), (4000, 8000), (6000, 10000)]),
        refs: overflowing_refs(),
        queries: base_queries(),
        length: 10000,
    }
}

#[fixture]
fn nested() -> Scenario {
    Scenario {
        windows: intervals(&[(2000, 6000), (2700, 5400)]),
        refs: overflowing_refs(),
        queries: base_queries(),
        length: 10000,
    }
}

#[fixture]
fn long_overflow() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 6000), (2000, 8000), (4000, 10000)]),
        refs: intervals(&[
            (1909, 2009),
            (2694, 2794),
            (3000, 9000),
            (9299, 9399),
            (9629, 9729),
        ]),
        queries: base_queries(),
        length: 10000,
    }
}

#[fixture]
fn g24() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 2000), (1000, 3000)]),
        refs: intervals(&[(223, 323), (956, 1056), (2146, 2246), (2678, 2778)]),
        queries: g24_queries(),
        length: 3000,
    }
}

#[fixture]
fn small() -> Scenario {
    Scenario {
        windows: intervals(&[(0, 1000), (1000, 2000)]),
        refs: intervals(&[(956, 1056)]),
        queries: g24_queries().into_iter().take(10).collect(),
        length: 2000,
    }
}

#[rstest]
#[case::non_overlapping(non_overlapping())]
#[case::empty_section_merge(empty_section_merge())]
#[case::empty_window(empty_window())]
#[case::overflowing(overflowing())]
#[case::nested(nested())]
#[case::long_overflow(long_overflow())]
#[case::g24(g24())]
#[case::small(small())]
fn test_naive_and_fast_agree(#[case] scenario: Scenario) {
    let naive = scenario.run(Algorithm::Naive);
    let fast = scenario.run(Algorithm::Fast);

    assert_eq!(naive.len(), scenario.windows.len());
    assert_valid(&naive);
    assert_valid(&fast);
    assert_equivalent(&naive, &fast);
}

#[rstest]
fn test_non_overlapping_counts(non_overlapping: Scenario) {
    let results = non_overlapping.run(Algorithm::Fast);

    // [1909,2009) crosses 2000: its left fragment is hit by [1863,1963), its right
    // fragment by nothing. [6333,6433) sits in a gap of the queries.
    assert_eq!(
        results.iter().map(|r| r.overlap_count).collect::<Vec<_>>(),
        vec![1, 1, 1, 0, 2]
    );
    assert_eq!(
        results.iter().map(|r| r.probs.len()).collect::<Vec<_>>(),
        vec![2, 3, 2, 2, 3]
    );
}

#[rstest]
fn test_empty_window_past_sequence_data(empty_window: Scenario) {
    let results = empty_window.run(Algorithm::Fast);

    // no reference interval past 10000: zero hits with certainty
    assert_eq!(results[2].overlap_count, 0);
    assert_eq!(results[2].probs.len(), 1);
    assert!(results[2].probs[0].abs() < TOLERANCE);
}

#[rstest]
fn test_split_interval_matches_unsplit_window(overflowing: Scenario) {
    // [3000,7000) is cut by the sections at 4000 and 6000 inside [2000,6000)
    let split = overflowing.run(Algorithm::Fast);
    let whole = Scenario {
        windows: intervals(&[(2000, 6000)]),
        ..overflowing
    }
    .run(Algorithm::Fast);

    assert_equivalent(&split[1..2], &whole);
}

#[rstest]
fn test_empty_windows_are_degenerate() {
    let scenario = Scenario {
        windows: intervals(&[(0, 100), (50, 50), (100, 200)]),
        refs: intervals(&[(10, 20), (120, 130)]),
        queries: intervals(&[(15, 25)]),
        length: 200,
    };

    for algorithm in [Algorithm::Naive, Algorithm::Fast] {
        let results = scenario.run(algorithm);
        assert_eq!(results[1].window, GenomicInterval::new("chr1", 50, 50));
        assert_eq!(results[1].probs, vec![0.0]);
        assert_eq!(results[1].overlap_count, 0);
    }
}

fn random_disjoint(rng: &mut StdRng, length: i64, count: usize, max_width: i64) -> Vec<GenomicInterval> {
    let mut set = IntervalSet::from(
        (0..count)
            .map(|_| {
                let begin = rng.gen_range(0..length - 1);
                let end = (begin + rng.gen_range(1..=max_width)).min(length);
                GenomicInterval::new("chr1", begin, end)
            })
            .collect::<Vec<_>>(),
    );
    set.merge_non_disjoint();
    set.intervals
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(42)]
#[case(2024)]
fn test_random_windows_agree(#[case] seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let length = 5000;

    let windows = (0..12)
        .map(|_| {
            let begin = rng.gen_range(0..length);
            let end = (begin + rng.gen_range(0..1500)).min(length);
            GenomicInterval::new("chr1", begin, end)
        })
        .collect();

    let scenario = Scenario {
        windows,
        refs: random_disjoint(&mut rng, length, 30, 400),
        queries: random_disjoint(&mut rng, length, 40, 60),
        length,
    };

    let naive = scenario.run(Algorithm::Naive);
    let fast = scenario.run(Algorithm::Fast);

    assert_valid(&naive);
    assert_equivalent(&naive, &fast);
}
