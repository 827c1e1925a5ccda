use std::fmt::Display;
use std::{fs, io::{self, BufRead}, path::Path};

use anyhow::{bail, Context};
use rand::Rng;

/// Chance that a random point is placed on the observer.
const ORIGIN_CHANCE: f64 = 0.05;
/// Chance that a random point duplicates an earlier one.
const DUPLICATE_CHANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub fn new(x: f64, y: f64) -> Point {
    Point { x, y }
  }
}

impl From<(f64, f64)> for Point {
  fn from((x, y): (f64, f64)) -> Point {
    Point { x, y }
  }
}

impl Display for Point {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}

/// A set of points seen from a single observer.
#[derive(Debug, Clone)]
pub struct Scene {
  /// Scene name (file basename, or a label for generated scenes).
  pub name: String,
  /// Camera position all angles are measured from.
  pub observer: Point,
  pub points: Vec<Point>,
}

impl Scene {
  /// Reads a scene from a text file. The first data line holds the observer
  /// coordinates, every following line one point; blank lines and `#` comments are
  /// skipped.
  pub fn from_file(file: impl AsRef<Path>) -> anyhow::Result<Scene> {
    let file = file.as_ref();
    let name = file
      .file_name()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_else(|| file.display().to_string());

    let f = fs::File::open(file).with_context(|| format!("opening scene file {}", file.display()))?;
    let scene = Scene::from_reader(name, io::BufReader::new(f))
      .with_context(|| format!("reading scene file {}", file.display()))?;
    log::debug!("Loaded scene {} with {} points, observer {}", scene.name, scene.points.len(), scene.observer);
    Ok(scene)
  }

  /// Parses a scene in the file format described in [`Scene::from_file`].
  pub fn from_reader(name: String, reader: impl BufRead) -> anyhow::Result<Scene> {
    let mut observer = None;
    let mut points = Vec::new();
    for (i, line) in reader.lines().enumerate() {
      let line = line?;
      let line = line.trim();
      if line.is_empty() || line.starts_with('#') {
        continue;
      }
      let pt = parse_point(line).with_context(|| format!("line {}", i + 1))?;
      match observer {
        None => observer = Some(pt),
        Some(_) => points.push(pt),
      }
    }
    let Some(observer) = observer else {
      bail!("missing observer line");
    };
    Ok(Scene { name, observer, points })
  }

  /// Generates a random scene of up to `max_points` points with coordinates in
  /// `[-coord_range, coord_range)` around the observer. Some points coincide with the
  /// observer and some are duplicates, so those cases are always exercised.
  pub fn random(rng: &mut impl Rng, name: String, max_points: usize, coord_range: f64, observer: Point) -> Scene {
    let n = rng.gen_range(0..=max_points);
    let mut points: Vec<Point> = Vec::with_capacity(n);
    for _ in 0..n {
      let roll: f64 = rng.gen();
      let pt = if roll < ORIGIN_CHANCE {
        observer
      } else if roll < ORIGIN_CHANCE + DUPLICATE_CHANCE && !points.is_empty() {
        points[rng.gen_range(0..points.len())]
      } else {
        Point::new(
          observer.x + rng.gen_range(-coord_range..coord_range),
          observer.y + rng.gen_range(-coord_range..coord_range),
        )
      };
      points.push(pt);
    }
    Scene { name, observer, points }
  }
}

fn parse_point(line: &str) -> anyhow::Result<Point> {
  let parts = line
    .split_whitespace()
    .map(|x| x.parse::<f64>().with_context(|| format!("invalid coordinate {x:?}")))
    .collect::<anyhow::Result<Vec<_>>>()?;
  match parts[..] {
    [x, y] if x.is_finite() && y.is_finite() => Ok(Point::new(x, y)),
    [_, _] => bail!("coordinates must be finite: {line:?}"),
    _ => bail!("expected two coordinates, got {}: {line:?}", parts.len()),
  }
}
