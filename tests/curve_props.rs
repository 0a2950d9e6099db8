//! Property tests for the curve algebra, driven through the public API.

use deltacurve::Curve;
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn breakpoints() -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec(
        (
            (0i32..200).prop_map(|k| k as f64 * 0.5),
            (-100i32..100).prop_map(|d| d as f64 * 0.25),
        ),
        1..24,
    )
}

fn build(points: &[(f64, f64)]) -> Curve {
    let mut curve = Curve::new();
    for &(x, delta_y) in points {
        if !curve.contains(x) {
            curve.insert(x, delta_y);
        }
    }
    curve
}

fn sample_grid(curve: &Curve) -> Vec<f64> {
    let mut xs: Vec<f64> = curve.to_deltas().iter().map(|bp| bp.x).collect();
    let extra: Vec<f64> = xs.iter().map(|x| x + 0.13).collect();
    xs.extend(extra);
    xs.push(-1.0);
    xs.push(1000.0);
    xs
}

proptest! {
    #[test]
    fn eval_past_last_breakpoint_is_total_delta(points in breakpoints()) {
        let curve = build(&points);
        let total: f64 = curve.to_deltas().iter().map(|bp| bp.delta_y).sum();
        prop_assert!((curve.eval(1e6) - total).abs() < EPS);
    }

    #[test]
    fn sum_with_negation_is_additive_inverse(points in breakpoints()) {
        let mut curve = build(&points);
        let mut negated = curve.clone();
        negated.negate();

        let grid = sample_grid(&curve);
        curve.sum(&negated);
        for x in grid {
            prop_assert!(curve.eval(x).abs() < EPS, "nonzero at {x}: {}", curve.eval(x));
        }
    }

    #[test]
    fn sum_matches_pointwise_addition(a in breakpoints(), b in breakpoints()) {
        let f = build(&a);
        let g = build(&b);
        let mut merged = f.clone();
        merged.sum(&g);

        let mut grid = sample_grid(&f);
        grid.extend(sample_grid(&g));
        for x in grid {
            let want = f.eval(x) + g.eval(x);
            prop_assert!(
                (merged.eval(x) - want).abs() < EPS,
                "at {x}: merged {} vs pointwise {want}",
                merged.eval(x)
            );
        }
    }

    #[test]
    fn min_clamp_is_bounded_and_idempotent(points in breakpoints(), level in -50i32..50) {
        let c = level as f64 * 0.5;
        let curve = build(&points);

        let once = curve.min_with(c);
        for x in sample_grid(&once) {
            prop_assert!(once.eval(x) <= c + EPS, "clamp exceeded at {x}: {}", once.eval(x));
        }

        let mut twice = once.clone();
        twice.min_assign(c);
        for x in sample_grid(&once) {
            prop_assert!((twice.eval(x) - once.eval(x)).abs() < EPS);
        }
    }

    #[test]
    fn max_clamp_is_bounded(points in breakpoints(), level in -50i32..50) {
        let c = level as f64 * 0.5;
        let clamped = build(&points).max_with(c);
        for x in sample_grid(&clamped) {
            prop_assert!(clamped.eval(x) >= c - EPS, "clamp undershot at {x}: {}", clamped.eval(x));
        }
    }

    #[test]
    fn clamped_curve_is_dominated(points in breakpoints(), level in -50i32..50) {
        let c = level as f64 * 0.5;
        let curve = build(&points);
        prop_assert!(curve.min_with(c).is_less_or_equal(&curve));
        prop_assert!(curve.is_less_or_equal(&curve.max_with(c)));
    }

    #[test]
    fn eval_is_continuous_between_breakpoints(points in breakpoints()) {
        let curve = build(&points);
        let keys: Vec<f64> = curve.to_deltas().iter().map(|bp| bp.x).collect();
        for pair in keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let step = (b - a) / 16.0;
            let mut prev = curve.eval(a);
            for i in 1..=16 {
                let y = curve.eval(a + step * i as f64);
                let slope_bound = (curve.eval(b) - curve.eval(a)).abs() / 16.0 + EPS;
                prop_assert!((y - prev).abs() <= slope_bound + EPS);
                prev = y;
            }
        }
    }
}
