use brain::{ExtenderConfig, ObstacleWaves, PlannerError};
use kinematics::Position;
use serde::Deserialize;
use std::path::Path;

/// Demo setup: a two-link arm, its start angles, a goal and a banded obstacle field.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub upper_length: f64,
    pub forearm_length: f64,
    /// Shoulder and elbow angles in radians.
    pub start: Vec<f64>,
    /// `[x, y, z, rx, ry, rz]`
    pub goal: Vec<f64>,
    /// Width of each distance-to-goal band; wave `n` applies to band `n`.
    pub band_width: f64,
    pub obstacles: Vec<Vec<[f64; 3]>>,
    /// Walk-then-hop rounds before giving up.
    pub rounds: usize,
    pub seed: u64,
    pub step_delay_ms: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            upper_length: 1.0,
            forearm_length: 0.8,
            start: vec![0.0, 0.3],
            // Pose of shoulder 0.9, elbow 0.7.
            goal: vec![0.5983, 1.583, 0.0, 0.0, 0.0, 1.6],
            band_width: 0.25,
            obstacles: vec![
                vec![[0.45, 1.75, 0.0]],
                vec![[0.35, 1.25, 0.0], [0.95, 1.85, 0.0]],
                vec![[0.2, 1.0, 0.0]],
                vec![[1.2, 0.9, 0.0]],
            ],
            rounds: 5,
            seed: 7,
            step_delay_ms: 100,
        }
    }
}

impl Scene {
    pub fn obstacle_waves(&self) -> ObstacleWaves {
        self.obstacles
            .iter()
            .map(|wave| {
                wave.iter()
                    .map(|p| Position::new(p[0], p[1], p[2]))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub extender: ExtenderConfig,
    pub scene: Scene,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            extender: ExtenderConfig {
                dist_thresh: 0.05,
                step_gain: 0.15,
                max_steps: 200,
                max_attempts: 500,
                ..ExtenderConfig::default()
            },
            scene: Scene::default(),
        }
    }
}

impl DemoConfig {
    pub fn load(path: &Path) -> Result<Self, PlannerError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, PlannerError> {
        let config: Self = toml::from_str(contents)?;
        config.extender.validate()?;
        Ok(config)
    }
}
