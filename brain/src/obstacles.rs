//! Wave-partitioned obstacle field and the point collision check.

use kinematics::Position;

/// Minimum obstacle separation used when none is configured.
pub const DEFAULT_CLEARANCE: f64 = 0.05;

/// Maps a candidate point and the goal point to the index of the obstacle
/// wave that applies there.
pub trait WaveIndex {
    fn wave_index(&self, point: &Position, goal: &Position) -> i64;
}

impl<F> WaveIndex for F
where
    F: Fn(&Position, &Position) -> i64,
{
    fn wave_index(&self, point: &Position, goal: &Position) -> i64 {
        self(point, goal)
    }
}

/// Every point uses wave 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleWave;

impl WaveIndex for SingleWave {
    fn wave_index(&self, _point: &Position, _goal: &Position) -> i64 {
        0
    }
}

/// Wave `n` covers points between `n * band_width` and `(n + 1) * band_width`
/// away from the goal.
#[derive(Debug, Clone, Copy)]
pub struct DistanceBands {
    pub band_width: f64,
}

impl WaveIndex for DistanceBands {
    fn wave_index(&self, point: &Position, goal: &Position) -> i64 {
        if self.band_width.is_nan() || self.band_width <= 0.0 {
            return 0;
        }
        ((point - goal).norm() / self.band_width).floor() as i64
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleWaves {
    waves: Vec<Vec<Position>>,
}

impl ObstacleWaves {
    pub fn new(waves: Vec<Vec<Position>>) -> Self {
        Self { waves }
    }

    pub fn len(&self) -> usize {
        self.waves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    /// Obstacles of wave `idx`; negative or out-of-range indices select nothing.
    pub fn wave(&self, idx: i64) -> Option<&[Position]> {
        let idx = usize::try_from(idx).ok()?;
        self.waves.get(idx).map(Vec::as_slice)
    }
}

impl FromIterator<Vec<Position>> for ObstacleWaves {
    fn from_iter<I: IntoIterator<Item = Vec<Position>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Returns `false` when an obstacle of the selected wave lies closer than
/// `min_thresh` to `point`.
pub fn is_free<I>(
    point: &Position,
    waves: &ObstacleWaves,
    index: &I,
    goal_point: &Position,
    min_thresh: f64,
) -> bool
where
    I: WaveIndex + ?Sized,
{
    let idx = index.wave_index(point, goal_point);
    let Some(wave) = waves.wave(idx) else {
        return true;
    };

    match wave.iter().find(|obs| (*obs - point).norm() < min_thresh) {
        Some(obs) => {
            log::debug!(
                "collision at [{:.3}, {:.3}, {:.3}] with obstacle [{:.3}, {:.3}, {:.3}] in wave {}",
                point.x, point.y, point.z, obs.x, obs.y, obs.z, idx
            );
            false
        }
        None => true,
    }
}

/// Collision check bound to one obstacle field and goal point.
pub struct CollisionGate<'a> {
    waves: &'a ObstacleWaves,
    index: &'a dyn WaveIndex,
    goal_point: Position,
}

impl<'a> CollisionGate<'a> {
    pub fn new(waves: &'a ObstacleWaves, index: &'a dyn WaveIndex, goal_point: Position) -> Self {
        Self {
            waves,
            index,
            goal_point,
        }
    }

    pub fn is_free(&self, point: &Position, min_thresh: f64) -> bool {
        is_free(point, self.waves, self.index, &self.goal_point, min_thresh)
    }
}
