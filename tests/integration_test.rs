use ndarray::{array, Array1};
use policy_iteration::{
    agent::{PolicyIterationAgent, PolicyIterationAgentBuilder},
    config::Hyperparams,
    environment::{Discrete, Environment, Step},
    error::PolicyError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn hparams(input_size: usize, num_actions: usize) -> Hyperparams {
    Hyperparams {
        rand_seed: 17,
        hidden_size: 16,
        input_size,
        num_actions,
        adam_eps: 1e-7,
        learning_rate: 1e-2,
        gamma: 0.9,
        epsilon: 1.0,
    }
}

/// Two alternating contexts, each with one paying action. Every step ends the episode.
struct TwoArmedContext {
    space: Discrete,
    context: usize,
}

impl TwoArmedContext {
    fn new() -> Self {
        TwoArmedContext {
            space: Discrete::new(2, 99),
            context: 0,
        }
    }

    fn observation(&self) -> Array1<f64> {
        if self.context == 0 {
            array![1.0, 0.0]
        } else {
            array![0.0, 1.0]
        }
    }
}

impl Environment for TwoArmedContext {
    type Space = Discrete;

    fn action_space(&mut self) -> &mut Discrete {
        &mut self.space
    }

    fn reset(&mut self) -> Array1<f64> {
        self.context = 1 - self.context;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Step {
        let reward = if action == self.context { 1.0 } else { 0.0 };
        Step {
            observation: self.observation(),
            reward,
            done: true,
        }
    }
}

/// Walk right along a short corridor to reach the rewarding end.
struct Corridor {
    space: Discrete,
    position: usize,
    length: usize,
}

impl Corridor {
    fn new(length: usize) -> Self {
        Corridor {
            space: Discrete::new(2, 5),
            position: 0,
            length,
        }
    }

    fn observation(&self) -> Array1<f64> {
        let mut obs = Array1::zeros(self.length);
        obs[self.position] = 1.0;
        obs
    }
}

impl Environment for Corridor {
    type Space = Discrete;

    fn action_space(&mut self) -> &mut Discrete {
        &mut self.space
    }

    fn reset(&mut self) -> Array1<f64> {
        self.position = 0;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Step {
        if action == 1 {
            self.position += 1;
        } else if self.position > 0 {
            self.position -= 1;
        }
        let done = self.position == self.length - 1;
        Step {
            observation: self.observation(),
            reward: if done { 1.0 } else { -0.01 },
            done,
        }
    }
}

#[test]
fn test_learns_contextual_bandit() {
    init_logger();
    let mut env = TwoArmedContext::new();
    let mut agent = PolicyIterationAgentBuilder::new()
        .hyperparams(hparams(2, 2))
        .epsilon_decay(0.99)
        .build()
        .unwrap();

    for _ in 0..400 {
        let state = env.reset();
        let action = agent.get_action(state.view(), &mut env).unwrap();
        let step = env.step(action);
        agent
            .remember(state, action, step.reward, step.observation, step.done)
            .unwrap();
        let loss = agent.replay(16).unwrap();
        assert!(loss.is_finite());
    }

    assert!(agent.epsilon() < 0.05);
    assert_eq!(agent.greedy_action(array![1.0, 0.0].view()).unwrap(), 0);
    assert_eq!(agent.greedy_action(array![0.0, 1.0].view()).unwrap(), 1);

    let q = agent.q_values(array![1.0, 0.0].view()).unwrap();
    assert!((q[0] - 1.0).abs() < 0.2, "q = {:?}", q);
    assert!(q[1].abs() < 0.2, "q = {:?}", q);
}

#[test]
fn test_corridor_training_loop() {
    init_logger();
    let mut env = Corridor::new(5);
    let mut agent = PolicyIterationAgentBuilder::new()
        .hyperparams(hparams(5, 2))
        .memory_capacity(500)
        .build()
        .unwrap();

    let mut replays = 0;
    for _episode in 0..30 {
        let mut state = env.reset();
        for _ in 0..50 {
            let action = agent.get_action(state.view(), &mut env).unwrap();
            let step = env.step(action);
            agent
                .remember(state, action, step.reward, step.observation.clone(), step.done)
                .unwrap();
            state = step.observation;
            if step.done {
                break;
            }
        }
        agent.replay(32).unwrap();
        replays += 1;
    }

    assert_eq!(agent.train_steps, replays);
    assert!(agent.memory().len() <= 500);
    let expected_epsilon = 0.995f64.powi(replays as i32);
    assert!((agent.epsilon() - expected_epsilon).abs() < 1e-9);
}

#[test]
fn test_network_persistence() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent_network.bin");

    let mut trained = PolicyIterationAgent::from_hyperparams(hparams(2, 2)).unwrap();
    trained.remember(array![1.0, 0.0], 0, 1.0, array![0.0, 1.0], false).unwrap();
    for _ in 0..5 {
        trained.replay(1).unwrap();
    }
    trained.save_network(&path).unwrap();

    let mut other = PolicyIterationAgent::new(hparams(2, 2), StdRng::seed_from_u64(1234)).unwrap();
    let state = array![1.0, 0.0];
    assert_ne!(
        other.q_values(state.view()).unwrap(),
        trained.q_values(state.view()).unwrap()
    );

    other.load_network(&path).unwrap();
    assert_eq!(
        other.q_values(state.view()).unwrap(),
        trained.q_values(state.view()).unwrap()
    );

    let mut wrong_shape = PolicyIterationAgent::from_hyperparams(hparams(3, 2)).unwrap();
    assert!(matches!(
        wrong_shape.load_network(&path),
        Err(PolicyError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_agent_from_json_config() {
    init_logger();
    let json = r#"{
        "Rand_Seed": 3,
        "hidden_size": 8,
        "input_size": 2,
        "num_actions": 3,
        "adam_eps": 1e-7,
        "learning_rate_adam": 0.001,
        "GAMMA": 0.95,
        "epsilon": 0.0
    }"#;
    let hparams = Hyperparams::from_json_str(json).unwrap();
    let mut agent = PolicyIterationAgent::from_hyperparams(hparams).unwrap();
    let mut env = TwoArmedContext::new();

    let state = array![0.3, -0.7];
    let action = agent.get_action(state.view(), &mut env).unwrap();
    assert_eq!(action, agent.greedy_action(state.view()).unwrap());
    assert!(action < 3);
}
