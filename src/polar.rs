use std::f64::consts::TAU;

use crate::scene::Point;

/// Closed arc of a circle, starting at `start` (radians, in [0, TAU)) and sweeping
/// counter-clockwise through `span` radians.
#[derive(Clone, Copy, Debug)]
pub struct PolarSector {
  pub start: f64,
  pub span: f64,
}

impl PolarSector {
  /// Constructs a sector starting at `start` with the given span.
  pub fn new(start: f64, span: f64) -> PolarSector {
    PolarSector { start: pos_mod(start), span }
  }

  /// Counter-clockwise distance from the start of the sector to `angle`.
  pub fn offset(&self, angle: f64) -> f64 {
    let angle = pos_mod(angle);
    if angle >= self.start {
      angle - self.start
    } else {
      TAU + angle - self.start
    }
  }

  /// Checks if an angle is enclosed by this polar sector (boundaries included).
  pub fn encloses(&self, angle: f64) -> bool {
    self.offset(angle) <= self.span
  }
}

/// Normalizes an angle into [0, TAU), independent of the sign convention of `%`.
pub fn pos_mod(angle: f64) -> f64 {
  let a = angle % TAU;
  let a = if a < 0. { a + TAU } else { a };
  // -tiny + TAU rounds up to TAU
  if a >= TAU { 0. } else { a }
}

/// Angle of the ray from `observer` to `pt`, or `None` if the two coincide.
pub fn ray_angle(pt: Point, observer: Point) -> Option<f64> {
  if pt == observer {
    return None;
  }
  Some(pos_mod((pt.y - observer.y).atan2(pt.x - observer.x)))
}

/// Splits `|angle|` into a number of full turns and the residual in [0, TAU).
pub fn split_turns(angle: f64) -> (usize, f64) {
  let angle = angle.abs();
  let residual = angle % TAU;
  // Rounded like a floor division: (angle - residual) is an exact multiple of TAU up to
  // rounding error. Float-to-int casts saturate.
  let turns = ((angle - residual) / TAU).round() as usize;
  (turns, residual)
}
