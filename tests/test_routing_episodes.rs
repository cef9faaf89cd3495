use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use traffic_routing_env::build_environment;
use traffic_routing_env::domain::env::config::{EnvConfig, TrafficEvolution, TrafficSource};
use traffic_routing_env::domain::env::controller::{StepOutcome, TrafficRoutingEnv};
use traffic_routing_env::domain::topology::graph::RoutingGraph;
use traffic_routing_env::domain::utils::statistics::{EpisodeRecord, EpisodeStatistics};

fn topology(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join("topologies").join(file)
}

fn traffic_within_capacity(env: &TrafficRoutingEnv) -> bool {
    env.graph().links().iter().all(|l| l.traffic() >= 0.0 && l.traffic() <= l.capacity())
}

/// Runs one episode with a seeded random policy and returns the record.
fn run_random_episode(env: &mut TrafficRoutingEnv, policy_rng: &mut StdRng) -> EpisodeRecord {
    let observation = env.reset().unwrap();
    assert!(env.observation_space().contains(&observation));
    assert_eq!(observation.current(), observation.start());

    let n = env.action_space().n;
    loop {
        let result = env.step(policy_rng.random_range(0..n)).unwrap();

        assert!(env.observation_space().contains(&result.observation));
        assert!(traffic_within_capacity(env), "traffic left [0, capacity]");
        assert!(result.info.is_empty());

        match result.outcome {
            StepOutcome::InvalidAction if !result.finished => assert_eq!(result.reward, -1.0),
            StepOutcome::Valid if !result.finished => {
                assert!(result.reward <= 0.0 && result.reward >= -1.0, "non-terminal hop reward {} is not a utilization", result.reward);
            }
            _ => {}
        }

        if result.finished {
            assert!(result.reward == 10.0 || result.reward == -10.0, "unexpected terminal reward {}", result.reward);
            if result.reward == 10.0 {
                assert_eq!(result.observation.current(), result.observation.end());
            }
            break;
        }
    }

    EpisodeRecord::capture(env)
}

#[test]
fn test_random_policy_on_abilene() {
    let mut env = build_environment(topology("abilene.txt"), EnvConfig::with_seed(3)).unwrap();
    let mut policy_rng = StdRng::seed_from_u64(99);
    let mut stats = EpisodeStatistics::new();

    assert_eq!(env.action_space().n, 4);

    for episode in 0..20 {
        let record = run_random_episode(&mut env, &mut policy_rng);

        assert_eq!(record.episode, episode);
        assert_ne!(record.start_node, record.end_node);
        assert!(record.steps >= 1 && record.steps <= 102);
        assert!(record.visited_nodes >= 1 && record.visited_nodes <= 12);
        if !record.reached_destination {
            assert_eq!(record.steps, 102, "only the step budget ends an unsuccessful episode");
        }

        stats.add(record);
    }

    assert_eq!(stats.len(), 20);
    assert!(stats.success_rate() >= 0.0 && stats.success_rate() <= 1.0);
}

#[test]
fn test_perturbed_traffic_stays_bounded_on_ring() {
    let config = EnvConfig {
        traffic_source: TrafficSource::Seeded(5),
        traffic_evolution: TrafficEvolution::Perturb { low_pct: -20.0, high_pct: 20.0 },
        ..EnvConfig::with_seed(11)
    };
    let mut env = build_environment(topology("ring6.json"), config).unwrap();
    let mut policy_rng = StdRng::seed_from_u64(1);

    for _ in 0..5 {
        run_random_episode(&mut env, &mut policy_rng);
    }
}

#[test]
fn test_same_seeds_replay_the_same_run() {
    let config = EnvConfig { traffic_source: TrafficSource::Seeded(21), ..EnvConfig::with_seed(8) };

    let mut first = build_environment(topology("ring6.json"), config.clone()).unwrap();
    let mut second = build_environment(topology("ring6.json"), config).unwrap();

    let mut first_policy = StdRng::seed_from_u64(4);
    let mut second_policy = StdRng::seed_from_u64(4);

    for _ in 0..3 {
        let a = run_random_episode(&mut first, &mut first_policy);
        let b = run_random_episode(&mut second, &mut second_policy);
        assert_eq!(a, b);
    }

    assert_eq!(first.traffic_table(), second.traffic_table());
}

#[test]
fn test_statistics_csv_of_a_run() {
    let mut env = build_environment(topology("ring6.json"), EnvConfig::with_seed(2)).unwrap();
    let mut policy_rng = StdRng::seed_from_u64(2);
    let mut stats = EpisodeStatistics::new();

    for _ in 0..4 {
        stats.add(run_random_episode(&mut env, &mut policy_rng));
    }

    let mut buffer = Vec::new();
    stats.write_csv(&mut buffer).unwrap();
    let csv = String::from_utf8(buffer).unwrap();

    assert_eq!(csv.lines().count(), 5);
    assert!(csv.starts_with("Episode;StartNode;EndNode;Steps;"));
}
