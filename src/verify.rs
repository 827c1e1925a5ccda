use std::{f64::consts::TAU, thread, time::Instant};

use crossbeam::channel;
use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    params::Params,
    polar,
    scene::{Point, Scene},
    visibility::{max_visible, Method},
};

/// A random scene on which some check failed.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub trial: usize,
    pub scene: Scene,
    pub angle: f64,
    pub reason: String,
}

/// Outcome of a verification run.
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub trials: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Checks all counting methods against each other on random scenes, along with the sign
/// and full-turn properties of the count. Trials are spread over `params.n_threads`
/// workers; each trial is seeded from `params.seed` so failures can be reproduced.
pub fn run(params: &Params) -> VerifyReport {
    let start = Instant::now();
    let n_threads = params.n_threads.max(1);

    // Channel of trial indices for workers to pick up
    let (idx_tx, idx_rx) = channel::bounded(params.n_trials.max(1));
    for i in 0..params.n_trials {
        // Receiver is alive and the channel has room for every trial
        let _ = idx_tx.send(i);
    }
    drop(idx_tx);

    // Channel for workers to send failures back
    let (res_tx, res_rx) = channel::unbounded();
    let mut handles = Vec::with_capacity(n_threads);
    for _ in 0..n_threads {
        let idx_rx = idx_rx.clone();
        let res_tx = res_tx.clone();
        let params = *params;
        handles.push(thread::spawn(move || {
            while let Ok(i) = idx_rx.recv() {
                log::trace!("Running trial {}", i);
                if let Some(mismatch) = run_trial(&params, i) {
                    if res_tx.send(mismatch).is_err() {
                        break;
                    }
                }
            }
        }));
    }
    drop(res_tx);

    let mut mismatches = res_rx.iter().collect::<Vec<_>>();
    for handle in handles {
        if handle.join().is_err() {
            log::error!("Verification worker panicked");
        }
    }
    mismatches.sort_by_key(|m| m.trial);

    log::info!(
        "Verified {} trials in {:.3?}, {} mismatches",
        params.n_trials,
        start.elapsed(),
        mismatches.len()
    );
    VerifyReport { trials: params.n_trials, mismatches }
}

/// Runs a single seeded trial, returning the first failed check.
pub fn run_trial(params: &Params, trial: usize) -> Option<Mismatch> {
    let mut rng = SmallRng::seed_from_u64(params.seed.wrapping_add(trial as u64));
    let observer = Point::new(
        rng.gen_range(-params.coord_range..=params.coord_range),
        rng.gen_range(-params.coord_range..=params.coord_range),
    );
    let scene = Scene::random(&mut rng, format!("trial-{trial}"), params.max_points, params.coord_range, observer);
    let bound = params.max_turns * TAU;
    let angle = if bound > 0. { rng.gen_range(-bound..bound) } else { 0. };

    let fail = |reason: String| {
        Some(Mismatch { trial, scene: scene.clone(), angle, reason })
    };

    let points = &scene.points;
    let res = max_visible(points, angle, observer);
    for method in Method::ALL {
        let other = method.count(points, angle, observer);
        if other != res {
            return fail(format!("{method} counted {other}, two-pointer counted {res}"));
        }
    }

    let mirrored = max_visible(points, -angle, observer);
    if mirrored != res {
        return fail(format!("negated angle counted {mirrored}, expected {res}"));
    }

    // An extra turn sees every point once more. Adding TAU rounds the residual, which
    // can move it across a full turn when it is already within rounding of one.
    let (turns, residual) = polar::split_turns(angle);
    if residual < TAU - 1e-9 {
        let turned = max_visible(points, angle.abs() + TAU, observer);
        if turned != res + points.len() {
            return fail(format!("angle + TAU counted {turned}, expected {}", res + points.len()));
        }
    }

    let bound = (turns + 1) * points.len();
    if res > bound {
        return fail(format!("counted {res}, above the bound of {bound}"));
    }
    None
}
