// Demonstration: drive two teams through the controller in a closed loop.
//
// Agents start on opposite sides of the x axis and swap sides. Each tick the
// commanded velocity is integrated for one control period and fed back as the
// next state report.
//
// Run from the repo root:
//   cargo run --example passage_sim -- --agents 3 --ticks 200 --seed 42
//   cargo run --features torch --example passage_sim -- --model policy.pt

use std::env;

use passage::{
    generate_id, AgentId, ControlStep, ControllerConfig, GoalSeekingPolicy, KinematicState,
    MissionPlan, PolicyModel, RecordingSink, TickStatus, Vec2,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let per_side: usize = arg_value(&args, "--agents")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);
    let max_ticks: u64 = arg_value(&args, "--ticks")
        .and_then(|s| s.parse().ok())
        .unwrap_or(200);
    let seed: u64 = arg_value(&args, "--seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut config = ControllerConfig::default();
    config.model_path = arg_value(&args, "--model").map(Into::into);

    let policy = match build_policy(&config) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("Cannot load policy: {e}");
            std::process::exit(2);
        }
    };

    let (agents, plan) = passage_scenario(per_side);
    let period = config.control_period();
    let mut controller = match ControlStep::new(config, policy, StdRng::seed_from_u64(seed)) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Every agent reports its start pose before the first tick.
    let mut sink = RecordingSink::new();
    for agent in &agents {
        if let Some(start) = plan.start(agent) {
            controller.record_state(agent, KinematicState::new(start, Vec2::zero()));
        }
    }

    for _ in 0..max_ticks {
        let report = match controller.tick(&agents, &plan, &mut sink) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "tick failed");
                break;
            }
        };

        if report.status != TickStatus::Published {
            continue;
        }
        if report.all_done() {
            info!(tick = report.tick, "all agents reached their goals");
            break;
        }

        for (agent, command) in sink.drain() {
            let Some(state) = controller.registry().state(&agent).copied() else {
                continue;
            };
            let velocity = command.velocity();
            let next = KinematicState::new(state.position + velocity * period, velocity);
            controller.record_state(&agent, next);
        }
    }

    for agent in &agents {
        if let (Some(state), Some(goal)) = (controller.registry().state(agent), plan.goal(agent)) {
            println!(
                "{agent}: position {} goal {} distance {:.3}",
                state.position,
                goal.position,
                state.position.distance_to(&goal.position)
            );
        }
    }
    println!("Ticks run: {}", controller.ticks());
}

/// Two teams of `per_side` agents facing each other across the x axis.
fn passage_scenario(per_side: usize) -> (Vec<AgentId>, MissionPlan) {
    let mut agents = Vec::new();
    let mut plan = MissionPlan::new();
    let spacing = 0.8;

    for side in [1.0, -1.0] {
        for i in 0..per_side {
            let x = (i as f64 - (per_side as f64 - 1.0) / 2.0) * spacing;
            let id = generate_id();
            plan = plan.with(id.clone(), Vec2::new(x, 2.0 * side), Vec2::new(x, -2.0 * side));
            agents.push(id);
        }
    }

    (agents, plan)
}

#[cfg(feature = "torch")]
fn build_policy(config: &ControllerConfig) -> Result<Box<dyn PolicyModel>, passage::ControlError> {
    if config.model_path.is_some() {
        let policy = passage::TorchScriptPolicy::from_config(config, tch::Device::Cpu)?;
        return Ok(Box::new(policy));
    }
    Ok(Box::new(GoalSeekingPolicy::default()))
}

#[cfg(not(feature = "torch"))]
fn build_policy(config: &ControllerConfig) -> Result<Box<dyn PolicyModel>, passage::ControlError> {
    if config.model_path.is_some() {
        warn!("--model requires the 'torch' feature; using the goal-seeking baseline");
    }
    Ok(Box::new(GoalSeekingPolicy::default()))
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("passage=debug,info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
