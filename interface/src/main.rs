mod scene;

use brain::{DistanceBands, MotionPath, NodeEvent, PathExtender};
use kinematics::{CartesianPose, KinematicsSolver, TwoLinkArm, decode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scene::DemoConfig;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene from {}", path);
            DemoConfig::load(Path::new(&path))?
        }
        None => DemoConfig::default(),
    };
    let scene = &config.scene;

    println!("Initializing two-link arm motion planner...");

    let arm = TwoLinkArm::new(scene.upper_length, scene.forearm_length);
    let waves = scene.obstacle_waves();
    let bands = DistanceBands {
        band_width: scene.band_width,
    };
    let start = decode(&scene.start, arm.joint_order())?;
    let mut path = MotionPath::new(start, CartesianPose::from_column_slice(&scene.goal))?;
    let mut rng = StdRng::seed_from_u64(scene.seed);

    let mut extender = PathExtender::new(&arm, &waves, &bands, config.extender.clone())
        .with_observer(|event: &NodeEvent<'_>| {
            println!(
                "  [{}] node {} accepted, {:.4} from goal",
                event.strategy, event.index, event.distance_to_goal
            );
        });

    println!("Planning motion to: {:?}", scene.goal);
    let mut reached = false;
    for round in 1..=scene.rounds {
        let walk = extender.extend_toward_goal(&mut path)?;
        if walk.reached_goal() {
            reached = true;
            break;
        }
        let hop = extender.extend_randomly(&mut path, &mut rng)?;
        if hop.reached_goal() {
            reached = true;
            break;
        }
        println!("Round {} ended at {:?}, retrying", round, walk.termination);
    }
    if !reached {
        log::warn!("Goal not reached after {} rounds", scene.rounds);
    }

    // Simulated playback
    for (i, node) in path.nodes().iter().enumerate() {
        let joints: Vec<String> = node.iter().map(|(name, angle)| format!("{name}={angle:.3}")).collect();
        println!("Executing step {}: {}", i + 1, joints.join(", "));
        sleep(Duration::from_millis(scene.step_delay_ms)).await;
    }

    println!(
        "Motion complete ({}). {} nodes, {:.4} from goal.",
        if reached { "goal reached" } else { "goal not reached" },
        path.len(),
        path.dist_to_goal(&arm)?
    );
    Ok(())
}
