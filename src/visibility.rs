use std::f64::consts::TAU;
use std::fmt::Display;

use ordered_float::OrderedFloat;

use crate::{
    polar::{self, PolarSector},
    scene::Point,
};

/// Ray angles of all points around an observer.
#[derive(Debug, Clone)]
pub struct AngleSet {
    /// Ray angles in [0, TAU), sorted ascending. Points on the observer are excluded.
    pub angles: Vec<f64>,
    /// Number of points coinciding with the observer (always visible)
    pub num_origin: usize,
}

impl AngleSet {
    pub fn new(points: &[Point], observer: Point) -> AngleSet {
        let mut angles = Vec::with_capacity(points.len());
        let mut num_origin = 0;
        for &pt in points {
            match polar::ray_angle(pt, observer) {
                Some(a) => angles.push(a),
                None => num_origin += 1,
            }
        }
        angles.sort_by_key(|&a| OrderedFloat(a));
        AngleSet { angles, num_origin }
    }

    /// Number of directional points.
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Angle at position `i` of the sequence unrolled over two turns, so a window may run
    /// past the end of `angles` and continue from the start one turn later.
    fn unrolled(&self, i: usize) -> f64 {
        let n = self.angles.len();
        if i >= n {
            TAU + self.angles[i % n]
        } else {
            self.angles[i]
        }
    }

    /// Combines the best residual window with the origin points and the full turns.
    fn total(&self, best: usize, turns: usize) -> usize {
        let all = self.len() + self.num_origin;
        (best + self.num_origin).saturating_add(turns.saturating_mul(all))
    }

    /// Result when a single orientation sees every point.
    fn total_all(&self, turns: usize) -> usize {
        let all = self.len() + self.num_origin;
        turns.saturating_add(1).saturating_mul(all)
    }
}

/// Returns the maximum number of `points` a camera at `observer` with a field of view of
/// `angle` radians sees at once, over all orientations of the camera.
///
/// Points on the observer are always visible, and points on the same ray are all visible
/// together. The sign of `angle` is ignored. Every full turn contained in `angle` sees
/// every point once more, and the residual below one turn is placed to see as many points
/// as possible. Boundaries of the field of view are inclusive.
///
/// `angle` must be finite.
pub fn max_visible(points: &[Point], angle: f64, observer: Point) -> usize {
    let set = AngleSet::new(points, observer);
    let (turns, residual) = polar::split_turns(angle);
    let n = set.len();

    let mut best = 0;
    let mut size = 1;
    // Window [left, left + size) holds every angle within `residual` of angles[left]; it
    // only shrinks from the left, so its right end never moves back.
    for (left, &theta) in set.angles.iter().enumerate() {
        while size < n && set.unrolled(left + size) - theta <= residual {
            size += 1;
        }
        if size == n {
            log::trace!("All {} directional points fit in one window at {:.6}", n, theta);
            return set.total_all(turns);
        }
        best = best.max(size);
        size -= 1;
    }
    set.total(best, turns)
}

/// Same as [`max_visible`], but finds the right end of each window by a binary search
/// over the angles unrolled to two turns instead of a sliding window.
pub fn max_visible_binary(points: &[Point], angle: f64, observer: Point) -> usize {
    let set = AngleSet::new(points, observer);
    let (turns, residual) = polar::split_turns(angle);
    let n = set.len();
    let unrolled = (0..2 * n).map(|i| set.unrolled(i)).collect::<Vec<_>>();

    let mut best = 0;
    for (left, &theta) in set.angles.iter().enumerate() {
        let size = unrolled[left..left + n].partition_point(|&a| a - theta <= residual);
        if size == n {
            return set.total_all(turns);
        }
        best = best.max(size);
    }
    set.total(best, turns)
}

/// Reference counter: tests every point against a sector anchored at every point.
pub fn max_visible_brute(points: &[Point], angle: f64, observer: Point) -> usize {
    let set = AngleSet::new(points, observer);
    let (turns, residual) = polar::split_turns(angle);

    let best = set
        .angles
        .iter()
        .map(|&theta| {
            let sector = PolarSector::new(theta, residual);
            set.angles.iter().filter(|&&a| sector.encloses(a)).count()
        })
        .max()
        .unwrap_or(0);
    set.total(best, turns)
}

/// Available counting algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    TwoPointer,
    Binary,
    Brute,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::TwoPointer, Method::Binary, Method::Brute];

    pub fn count(self, points: &[Point], angle: f64, observer: Point) -> usize {
        match self {
            Method::TwoPointer => max_visible(points, angle, observer),
            Method::Binary => max_visible_binary(points, angle, observer),
            Method::Brute => max_visible_brute(points, angle, observer),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::TwoPointer => write!(f, "two-pointer"),
            Method::Binary => write!(f, "binary"),
            Method::Brute => write!(f, "brute"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use proptest::prelude::*;
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    use super::*;
    use crate::scene::Scene;

    const ORIGIN: Point = Point { x: 0., y: 0. };

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    /// Runs every method and checks they agree.
    fn count(points: &[Point], angle: f64) -> usize {
        count_at(points, angle, ORIGIN)
    }

    fn count_at(points: &[Point], angle: f64, observer: Point) -> usize {
        let res = max_visible(points, angle, observer);
        for method in Method::ALL {
            assert_eq!(method.count(points, angle, observer), res, "{method} disagrees for angle {angle}");
        }
        res
    }

    #[test]
    fn single() {
        assert_eq!(count(&pts(&[(1., 2.)]), FRAC_PI_2), 1);
    }

    #[test]
    fn double() {
        assert_eq!(count(&pts(&[(1., 2.), (2., 1.)]), FRAC_PI_2), 2);
    }

    #[test]
    fn split() {
        assert_eq!(count(&pts(&[(1., 1.), (-1., -1.)]), FRAC_PI_2), 1);
    }

    #[test]
    fn multiple_in_arc() {
        let points = pts(&[(1., 1.), (1., 2.), (1., 3.), (1., 4.), (1., 5.)]);
        assert_eq!(count(&points, FRAC_PI_2), 5);
    }

    #[test]
    fn mixture() {
        let points = pts(&[
            (1., 1.),
            (1., 2.),
            (1., 3.),
            (1., 4.),
            (-1., -1.),
            (-1., -2.),
            (-1., -3.),
            (-1., -4.),
            (-1., -5.),
        ]);
        assert_eq!(count(&points, FRAC_PI_2), 5);
    }

    #[test]
    fn tight_mixture() {
        let points = pts(&[
            (1., 1.1),
            (1., 1.2),
            (1., 1.3),
            (1., 1.4),
            (-1., -1.),
            (-1., -2.),
            (-1., -3.),
            (-1., -4.),
            (-1., -5.),
        ]);
        assert_eq!(count(&points, PI / 12.), 4);
    }

    #[test]
    fn empty() {
        for angle in [0., 1., -1., TAU, 10. * TAU + 0.5] {
            assert_eq!(count(&[], angle), 0);
        }
    }

    #[test]
    fn negative_angle() {
        let points = pts(&[(1., 1.), (1., 2.), (-1., -1.)]);
        assert_eq!(count(&points, -FRAC_PI_2), 2);
        assert_eq!(count(&points, FRAC_PI_2), 2);
    }

    #[test]
    fn single_point_zero_angle() {
        assert_eq!(count(&pts(&[(1., 1.)]), 0.), 1);
    }

    #[test]
    fn line_zero_angle() {
        let mut points = (1..10).map(|i| Point::new(i as f64, i as f64)).collect::<Vec<_>>();
        points.push(Point::new(-1., -1.));
        assert_eq!(count(&points, 0.), 9);
    }

    #[test]
    fn duplicates_counted_separately() {
        let points = pts(&[(2., 0.), (2., 0.), (0., 3.)]);
        assert_eq!(count(&points, 0.), 2);
        assert_eq!(count(&points, FRAC_PI_2), 3);
    }

    #[test]
    fn origin_points_always_visible() {
        let points = pts(&[(0., 0.), (0., 0.), (1., 0.), (-1., 0.)]);
        assert_eq!(count(&points, 0.), 3);
        assert_eq!(count(&pts(&[(0., 0.), (0., 0.)]), 1.), 2);
        // Each full turn repeats the origin points too
        assert_eq!(count(&pts(&[(0., 0.), (0., 0.)]), 2. * TAU), 6);
    }

    #[test]
    fn shifted_observer() {
        let observer = Point::new(10., 10.);
        let points = pts(&[(11., 11.), (9., 9.), (10., 10.), (12., 11.)]);
        assert_eq!(count_at(&points, FRAC_PI_2, observer), 3);
        // Seen from the origin all points lie in one narrow cone
        assert_eq!(count_at(&points, FRAC_PI_2, ORIGIN), 4);
    }

    #[test]
    fn boundary_is_inclusive() {
        // Exactly a right angle apart
        let points = pts(&[(1., 0.), (0., 1.)]);
        assert_eq!(count(&points, FRAC_PI_2), 2);
        assert_eq!(count(&points, FRAC_PI_2 - 1e-9), 1);
    }

    #[test]
    fn window_wraps_past_full_turn() {
        // Just below and just above the positive x axis
        let points = pts(&[(1., -0.1), (1., 0.1), (-1., 0.5)]);
        assert_eq!(count(&points, 0.5), 2);
    }

    #[test]
    fn full_turns() {
        let points = pts(&[(1., 1.), (-1., -1.), (0., 0.)]);
        assert_eq!(count(&points, FRAC_PI_2), 2);
        assert_eq!(count(&points, TAU), 5);
        assert_eq!(count(&points, TAU + FRAC_PI_2), 5);
        assert_eq!(count(&points, 2. * TAU + FRAC_PI_2), 8);
        // Half a turn covers both opposite points
        assert_eq!(count(&points, PI + 0.01), 3);
        assert_eq!(count(&points, TAU + PI + 0.01), 6);
    }

    #[test]
    fn huge_angle_saturates() {
        let points = pts(&[(1., 1.), (-1., -1.)]);
        assert_eq!(max_visible(&points, f64::MAX, ORIGIN), usize::MAX);
    }

    #[test]
    fn input_not_mutated() {
        let points = pts(&[(3., 1.), (-2., 5.), (1., -1.)]);
        let copy = points.clone();
        count(&points, 1.);
        assert_eq!(points, copy);
    }

    #[test]
    fn random_scenes_agree() {
        let mut rng = SmallRng::seed_from_u64(0);
        for i in 0..2_000 {
            let scene = Scene::random(&mut rng, format!("r{i}"), 30, 100., Point::new(1., -2.));
            let angle = rng.gen_range(-4. * TAU..4. * TAU);
            count_at(&scene.points, angle, scene.observer);
        }
    }

    #[test]
    fn random_monotone_in_angle() {
        let mut rng = SmallRng::seed_from_u64(1);
        for i in 0..200 {
            let scene = Scene::random(&mut rng, format!("r{i}"), 25, 50., ORIGIN);
            let mut angles = (0..20).map(|_| rng.gen_range(0. ..2. * TAU)).collect::<Vec<_>>();
            angles.sort_by(|a, b| a.total_cmp(b));
            let counts = angles.iter().map(|&a| max_visible(&scene.points, a, ORIGIN)).collect::<Vec<_>>();
            assert!(counts.windows(2).all(|w| w[0] <= w[1]), "{counts:?} for {angles:?}");
        }
    }

    fn point_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((-100.0..100.0f64, -100.0..100.0f64), 0..40)
    }

    proptest! {
        #[test]
        fn sign_is_ignored(coords in point_strategy(), angle in 0.0..4. * TAU) {
            let points = pts(&coords);
            prop_assert_eq!(max_visible(&points, angle, ORIGIN), max_visible(&points, -angle, ORIGIN));
        }

        #[test]
        fn full_turn_adds_every_point(coords in point_strategy(), angle in 0.01..TAU - 0.01, k in 0usize..4) {
            let points = pts(&coords);
            let base = max_visible(&points, angle, ORIGIN);
            let turned = max_visible(&points, angle + k as f64 * TAU, ORIGIN);
            prop_assert_eq!(turned, base + k * points.len());
        }

        #[test]
        fn bounded_by_all_turns(coords in point_strategy(), angle in 0.0..4. * TAU) {
            let points = pts(&coords);
            let (turns, _) = polar::split_turns(angle);
            prop_assert!(max_visible(&points, angle, ORIGIN) <= (turns + 1) * points.len());
        }

        #[test]
        fn single_point_always_visible(x in -100.0..100.0f64, y in -100.0..100.0f64, angle in 0.0..TAU) {
            prop_assert_eq!(max_visible(&[Point::new(x, y)], angle, ORIGIN), 1);
        }
    }
}
