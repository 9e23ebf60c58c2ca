use brain::{
    DistanceBands, ExtenderConfig, MotionPath, NodeEvent, ObstacleWaves, PathExtender,
    SingleWave, Termination, WaveIndex,
};
use kinematics::opw_kinematics::{OpwKinematicsSolver, pose_to_isometry};
use kinematics::{
    CartesianPose, JointConfiguration, JointOrder, KinematicsSolver, Position, TwoLinkArm,
    decode, encode, position,
};
use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `forward_kinematics({j1, j2}) = (j1, j2, 0, 0, 0, 0)` with an identity-like
/// 2x6 Jacobian transpose.
struct PlanarIdentity {
    order: JointOrder,
}

impl PlanarIdentity {
    fn new() -> Self {
        Self {
            order: JointOrder::new(["j1", "j2"]),
        }
    }
}

impl KinematicsSolver for PlanarIdentity {
    fn joint_order(&self) -> &JointOrder {
        &self.order
    }

    fn forward_kinematics(&self, q: &JointConfiguration) -> kinematics::Result<CartesianPose> {
        let a = encode(q, &self.order)?;
        Ok(CartesianPose::from_vec(vec![a[0], a[1], 0.0, 0.0, 0.0, 0.0]))
    }

    fn inverse_kinematics(&self, _pose: &CartesianPose) -> Option<DVector<f64>> {
        None
    }

    fn jacobian_transpose(&self, _q: &JointConfiguration) -> kinematics::Result<DMatrix<f64>> {
        let mut jt = DMatrix::zeros(2, 6);
        jt[(0, 0)] = 1.0;
        jt[(1, 1)] = 1.0;
        Ok(jt)
    }
}

fn unit_goal() -> CartesianPose {
    CartesianPose::from_vec(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0])
}

#[test]
fn single_step_reaches_goal_without_obstacles() {
    init_logging();
    let kin = PlanarIdentity::new();
    let waves = ObstacleWaves::default();
    let start = decode(&[0.0, 0.0], kin.joint_order()).unwrap();
    let mut path = MotionPath::new(start, unit_goal()).unwrap();

    let mut extender = PathExtender::new(&kin, &waves, &SingleWave, ExtenderConfig::default());
    let extension = extender.extend_toward_goal(&mut path).unwrap();

    assert_eq!(extension.termination, Termination::GoalReached);
    assert_eq!(path.len(), 1);
    assert_eq!(path.tip(), &decode(&[1.0, 0.0], kin.joint_order()).unwrap());
}

#[test]
fn collision_check_is_at_the_endpoint_only() {
    init_logging();
    let kin = PlanarIdentity::new();
    // The straight step from (0,0,0) to (1,0,0) passes through this obstacle.
    let waves = ObstacleWaves::new(vec![vec![Position::new(0.5, 0.0, 0.0)]]);
    let start = decode(&[0.0, 0.0], kin.joint_order()).unwrap();
    let mut path = MotionPath::new(start, unit_goal()).unwrap();

    let mut extender = PathExtender::new(&kin, &waves, &SingleWave, ExtenderConfig::default());
    let extension = extender.extend_toward_goal(&mut path).unwrap();

    assert_eq!(extension.termination, Termination::GoalReached);
    assert_eq!(path.tip().get("j1"), Some(1.0));
}

#[test]
fn obstacle_at_the_endpoint_rejects_the_step() {
    init_logging();
    let kin = PlanarIdentity::new();
    let waves = ObstacleWaves::new(vec![vec![Position::new(1.0, 0.02, 0.0)]]);
    let start = decode(&[0.0, 0.0], kin.joint_order()).unwrap();
    let mut path = MotionPath::new(start, unit_goal()).unwrap();

    let mut extender = PathExtender::new(&kin, &waves, &SingleWave, ExtenderConfig::default());
    let extension = extender.extend_toward_goal(&mut path).unwrap();

    assert_eq!(extension.termination, Termination::Collision);
    assert!(path.is_empty());
}

#[test]
fn random_extension_without_ik_is_bounded() {
    init_logging();
    let kin = PlanarIdentity::new();
    let waves = ObstacleWaves::default();
    let start = decode(&[0.0, 0.0], kin.joint_order()).unwrap();
    let mut path = MotionPath::new(start, unit_goal()).unwrap();
    let config = ExtenderConfig {
        max_attempts: 200,
        ..ExtenderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(42);

    let mut extender = PathExtender::new(&kin, &waves, &SingleWave, config);
    let extension = extender.extend_randomly(&mut path, &mut rng).unwrap();

    assert_eq!(extension.termination, Termination::Exhausted);
    assert_eq!(extension.attempts, 200);
    assert!(path.is_empty());
}

/// Records the distance to goal of every accepted node.
fn distance_log() -> (Rc<RefCell<Vec<f64>>>, impl FnMut(&NodeEvent<'_>)) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |event: &NodeEvent<'_>| sink.borrow_mut().push(event.distance_to_goal))
}

#[test]
fn two_link_arm_walk_improves_every_step() {
    init_logging();
    let arm = TwoLinkArm::new(1.0, 0.8);
    let waves = ObstacleWaves::default();
    let start = decode(&[0.3, 0.6], arm.joint_order()).unwrap();
    let goal = arm
        .forward_kinematics(&decode(&[0.5, 0.8], arm.joint_order()).unwrap())
        .unwrap();
    let mut path = MotionPath::new(start, goal).unwrap();
    let start_distance = path.dist_to_goal(&arm).unwrap();
    let config = ExtenderConfig {
        dist_thresh: 0.01,
        step_gain: 0.1,
        max_steps: 500,
        ..ExtenderConfig::default()
    };

    let (distances, observer) = distance_log();
    let mut extender = PathExtender::new(&arm, &waves, &SingleWave, config).with_observer(observer);
    let walk = extender.extend_toward_goal(&mut path).unwrap();

    assert_eq!(walk.termination, Termination::GoalReached);
    let distances = distances.borrow();
    assert_eq!(distances.len(), path.len());
    assert!(distances[0] < start_distance);
    for pair in distances.windows(2) {
        assert!(pair[1] < pair[0], "distance went from {} to {}", pair[0], pair[1]);
    }
    assert!(path.dist_to_goal(&arm).unwrap() <= 0.01);
}

#[test]
fn two_link_arm_never_accepts_a_node_near_an_obstacle() {
    init_logging();
    let arm = TwoLinkArm::new(1.0, 0.8);
    let bands = DistanceBands { band_width: 0.25 };
    let start = decode(&[0.0, 0.3], arm.joint_order()).unwrap();
    let goal = arm
        .forward_kinematics(&decode(&[0.9, 0.7], arm.joint_order()).unwrap())
        .unwrap();
    let goal_point = position(&goal);
    // One ring of obstacles per band, flanking the approach without blocking it.
    let waves: ObstacleWaves = (0..8)
        .map(|band| {
            let r = 0.25 * band as f64 + 0.1;
            vec![
                goal_point + Position::new(r, 0.0, 0.0),
                goal_point + Position::new(0.0, r, 0.0),
                goal_point - Position::new(r, 0.0, 0.0),
            ]
        })
        .collect();
    let mut path = MotionPath::new(start, goal).unwrap();
    let config = ExtenderConfig {
        dist_thresh: 0.05,
        step_gain: 0.15,
        max_steps: 200,
        max_attempts: 200,
        ..ExtenderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(2024);

    let mut extender = PathExtender::new(&arm, &waves, &bands, config.clone());
    let mut reached = false;
    for _ in 0..5 {
        let walk = extender.extend_toward_goal(&mut path).unwrap();
        assert!(walk.appended <= config.max_steps);
        if walk.reached_goal() {
            reached = true;
            break;
        }
        extender.extend_randomly(&mut path, &mut rng).unwrap();
    }

    assert!(reached);
    assert!(path.dist_to_goal(&arm).unwrap() <= config.dist_thresh);
    for node in path.nodes() {
        let p = position(&arm.forward_kinematics(node).unwrap());
        if let Some(wave) = waves.wave(bands.wave_index(&p, &goal_point)) {
            for obstacle in wave {
                assert!((obstacle - p).norm() >= config.min_clearance);
            }
        }
    }
}

#[test]
fn six_axis_arm_walks_to_a_nearby_pose() {
    init_logging();
    let arm = OpwKinematicsSolver::new(0.550, 0.550, 0.600, 0.110, 0.150, 0.0, 0.0);
    let waves = ObstacleWaves::default();
    let start = decode(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], arm.joint_order()).unwrap();
    let target = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
    let goal = arm
        .forward_kinematics(&decode(&target, arm.joint_order()).unwrap())
        .unwrap();
    let mut path = MotionPath::new(start, goal.clone()).unwrap();
    let config = ExtenderConfig {
        dist_thresh: 0.01,
        step_gain: 0.2,
        max_steps: 100,
        ..ExtenderConfig::default()
    };

    let (distances, observer) = distance_log();
    let mut extender = PathExtender::new(&arm, &waves, &SingleWave, config).with_observer(observer);
    let walk = extender.extend_toward_goal(&mut path).unwrap();

    assert_eq!(walk.termination, Termination::GoalReached);
    for pair in distances.borrow().windows(2) {
        assert!(pair[1] < pair[0]);
    }
    let reached = arm.forward_isometry(&target);
    let tip = arm.forward_kinematics(path.tip()).unwrap();
    assert!((position(&tip) - reached.translation.vector).norm() <= 0.01);
    assert!(pose_to_isometry(&tip).is_some_and(|iso| iso.rotation.angle_to(&reached.rotation) <= 0.01));
}
