use ndarray::array;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use crate::replay_buffer::{ReplayBuffer, Transition};

fn transition(i: usize) -> Transition {
    Transition {
        state: array![i as f64],
        action: i % 2,
        reward: i as f64,
        next_state: array![(i + 1) as f64],
        done: false,
    }
}

#[test]
fn test_replay_buffer_push_and_sample() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut buffer = ReplayBuffer::new(10);
    let t = transition(0);
    buffer.push(t.clone());

    assert_eq!(buffer.len(), 1);
    let sample = buffer.sample(1, &mut rng);
    assert_eq!(sample[0], &t);
}

#[test]
fn test_replay_buffer_evicts_oldest() {
    let mut buffer = ReplayBuffer::new(3);
    for i in 1..=5 {
        buffer.push(transition(i));
    }

    assert_eq!(buffer.len(), 3);
    let kept: Vec<f64> = buffer.iter().map(|t| t.reward).collect();
    assert_eq!(kept, vec![3.0, 4.0, 5.0]);
}

#[test]
fn test_sample_is_without_replacement() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut buffer = ReplayBuffer::new(100);
    for i in 0..20 {
        buffer.push(transition(i));
    }

    let sample = buffer.sample(20, &mut rng);
    let distinct: HashSet<usize> = sample.iter().map(|t| t.reward as usize).collect();
    assert_eq!(distinct.len(), 20);

    // Larger requests are capped at the buffer length
    assert_eq!(buffer.sample(50, &mut rng).len(), 20);
}

#[test]
fn test_sample_covers_whole_buffer() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..10 {
        buffer.push(transition(i));
    }

    let mut seen = HashSet::new();
    for _ in 0..200 {
        for t in buffer.sample(2, &mut rng) {
            seen.insert(t.reward as usize);
        }
    }
    assert_eq!(seen.len(), 10);
}

#[test]
fn test_empty_buffer_samples_nothing() {
    let mut rng = StdRng::seed_from_u64(0);
    let buffer = ReplayBuffer::new(10);
    assert!(buffer.is_empty());
    assert!(buffer.sample(4, &mut rng).is_empty());
}

#[test]
fn test_clear() {
    let mut buffer = ReplayBuffer::default();
    assert_eq!(buffer.capacity(), 100_000);
    buffer.push(transition(0));
    buffer.clear();
    assert!(buffer.is_empty());
}
