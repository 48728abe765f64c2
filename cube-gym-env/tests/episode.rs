use cube_gym_env::{
    Action, Coordinate, CubeGymConfig, CubeGymError, CubeVariant, EpisodeController,
    EpisodePhase, ObstacleField, StepOutcome,
};

fn controller(size: usize, obstacles: Vec<Coordinate>) -> EpisodeController {
    let config = CubeGymConfig::default().size(size);
    EpisodeController::with_obstacles(config, ObstacleField::from_cells(obstacles)).unwrap()
}

fn walk(ctrl: &mut EpisodeController, actions: &[Action]) -> Vec<StepOutcome> {
    actions.iter().map(|a| ctrl.step(*a)).collect()
}

#[test]
fn reset_starts_at_origin() {
    for size in 2..=8 {
        let mut ctrl = controller(size, vec![]);
        walk(&mut ctrl, &[Action::Right]);
        let (obs, info) = ctrl.reset(None);
        let hi = size as i64 - 1;
        assert_eq!(obs.agent, Coordinate::new(0, 0, 0));
        assert_eq!(obs.target, Coordinate::new(hi, hi, hi));
        assert_eq!(info.current_state.get(), 1);
        assert_eq!(ctrl.path(), &[Coordinate::new(0, 0, 0)]);
        assert_eq!(ctrl.state().phase(), EpisodePhase::Active);
        assert_eq!(ctrl.state().steps(), 0);
    }
}

#[test]
fn goal_is_reached_on_small_cube() {
    let mut ctrl = controller(3, vec![]);
    let outcomes = walk(
        &mut ctrl,
        &[Action::Right, Action::Up, Action::Forward],
    );
    assert!(outcomes.iter().all(|o| o.reward() == -1 && !o.is_terminated()));
    assert_eq!(ctrl.agent_location(), Coordinate::new(1, 1, 1));

    let outcomes = walk(&mut ctrl, &[Action::Right, Action::Up]);
    assert!(outcomes.iter().all(|o| o.reward() == -1));
    assert_eq!(ctrl.agent_location(), Coordinate::new(2, 2, 1));

    let last = ctrl.step(Action::Forward);
    assert_eq!(last.reward(), 100);
    assert!(last.is_terminated());
    assert!(last.reached_goal());
    assert_eq!(last.observation().agent, Coordinate::new(2, 2, 2));
    assert_eq!(last.info().next_location, Some(Coordinate::new(2, 2, 2)));
    assert_eq!(last.info().next_state.map(|s| s.get()), Some(27));
    assert_eq!(last.info().distance, 0);
    assert_eq!(ctrl.state().phase(), EpisodePhase::TerminatedSuccess);
    assert_eq!(ctrl.path().len(), ctrl.state().steps() + 1);
    assert_eq!(ctrl.path().last(), Some(&Coordinate::new(2, 2, 2)));
}

#[test]
fn boundary_failure_is_sticky_until_reset() {
    let mut ctrl = controller(5, vec![]);
    walk(&mut ctrl, &[Action::Up, Action::Up]);
    let outcome = ctrl.step(Action::Down);
    assert!(!outcome.is_terminated());

    walk(&mut ctrl, &[Action::Down]);
    let failure = ctrl.step(Action::Down);
    assert_eq!(failure.reward(), -20);
    assert!(failure.is_terminated());
    assert!(!failure.reached_goal());
    let position = ctrl.agent_location();
    assert_eq!(position, Coordinate::new(0, 0, 0));

    for _ in 0..5 {
        assert_eq!(ctrl.step(Action::Down), failure);
        assert_eq!(ctrl.step(Action::Up), failure);
        assert_eq!(ctrl.path().len(), 6);
        assert_eq!(ctrl.agent_location(), position);
        assert_eq!(ctrl.state().phase(), EpisodePhase::TerminatedFailure);
    }

    ctrl.reset(None);
    assert_eq!(ctrl.state().phase(), EpisodePhase::Active);
}

#[test]
fn adjacent_obstacles_stack_penalties() {
    // (1, 1, 0) neighbours (1, 2, 0) and (1, 1, 1).
    let mut ctrl = controller(
        5,
        vec![Coordinate::new(1, 2, 0), Coordinate::new(1, 1, 1)],
    );
    walk(&mut ctrl, &[Action::Right]);
    let outcome = ctrl.step(Action::Up);
    // Both obstacles are two cells away from (1, 0, 0).
    assert_eq!(outcome.reward(), -1);

    let outcome = ctrl.step(Action::Right);
    assert_eq!(outcome.reward(), -21);
    assert!(!outcome.is_terminated());
}

#[test]
fn standing_on_obstacle_fails_any_action() {
    for a in &Action::ALL {
        let mut ctrl = controller(5, vec![Coordinate::new(0, 0, 1)]);
        // Moving onto the obstacle is allowed.
        let outcome = ctrl.step(Action::Forward);
        assert_eq!(outcome.reward(), -11);
        assert_eq!(ctrl.agent_location(), Coordinate::new(0, 0, 1));

        let outcome = ctrl.step(*a);
        assert_eq!(outcome.reward(), -20);
        assert!(outcome.is_terminated());
        assert!(!outcome.reached_goal());
        assert_eq!(ctrl.agent_location(), Coordinate::new(0, 0, 1));
        assert_eq!(ctrl.path().len(), 3);
    }
}

#[test]
fn path_length_tracks_steps() {
    let mut ctrl = controller(6, vec![]);
    let actions = [
        Action::Forward,
        Action::Right,
        Action::Up,
        Action::Left,
        Action::Right,
        Action::Down,
    ];
    for (i, a) in actions.iter().enumerate() {
        ctrl.step(*a);
        assert_eq!(ctrl.path().len(), i + 2);
        assert_eq!(ctrl.state().steps(), i + 1);
        let c = ctrl.agent_location();
        assert_eq!(ctrl.state().state(), ctrl.grid().to_state_id(&c));
        assert!(ctrl.grid().is_in_bounds(&c));
    }
}

#[test]
fn controllers_are_independent() {
    let mut a = controller(4, vec![]);
    let mut b = controller(4, vec![]);
    walk(&mut a, &[Action::Right, Action::Right]);
    walk(&mut b, &[Action::Forward]);
    assert_eq!(a.agent_location(), Coordinate::new(2, 0, 0));
    assert_eq!(b.agent_location(), Coordinate::new(0, 0, 1));
}

#[test]
fn invalid_configuration_is_rejected() {
    let config = CubeGymConfig::default().size(1);
    assert!(matches!(
        EpisodeController::new(config, 0),
        Err(CubeGymError::InvalidConfiguration(_))
    ));
    let config = CubeGymConfig::default()
        .deterministic_obstacles(false)
        .obstacle_count(-3);
    assert!(matches!(
        EpisodeController::new(config, 0),
        Err(CubeGymError::InvalidConfiguration(_))
    ));
}

#[test]
fn random_obstacles_follow_seed_and_config() {
    let config = CubeGymConfig::default()
        .size(10)
        .deterministic_obstacles(false)
        .obstacle_count(6);
    let a = EpisodeController::new(config.clone(), 11).unwrap();
    let b = EpisodeController::new(config.clone(), 11).unwrap();
    assert_eq!(a.obstacles(), b.obstacles());
    assert_eq!(a.obstacles().len(), 6);

    // Obstacles are kept across resets by default.
    let mut c = EpisodeController::new(config.clone(), 11).unwrap();
    c.reset(Some(99));
    assert_eq!(c.obstacles(), a.obstacles());

    // With regeneration, a reset with the construction seed redraws the same field.
    let config = config.regenerate_obstacles(true);
    let mut d = EpisodeController::new(config, 11).unwrap();
    d.reset(Some(11));
    assert_eq!(d.obstacles(), a.obstacles());
}

fn sparse(size: usize, seed: u64) -> EpisodeController {
    let config = CubeGymConfig::default().variant(CubeVariant::Sparse).size(size);
    EpisodeController::new(config, seed).unwrap()
}

#[test]
fn sparse_walls_clip_without_failure() {
    let mut ctrl = sparse(4, 3);
    let start = ctrl.agent_location();
    for _ in 0..6 {
        let outcome = ctrl.step(Action::Left);
        assert_eq!(outcome.reward(), 0);
        assert!(!outcome.is_terminated());
    }
    for _ in 0..6 {
        let outcome = ctrl.step(Action::Down);
        assert_eq!(outcome.reward(), 0);
        assert!(!outcome.is_terminated());
    }
    assert_eq!(ctrl.agent_location(), Coordinate::new(0, 0, start.z));
    assert_eq!(ctrl.path().len(), 13);
    assert_eq!(ctrl.state().phase(), EpisodePhase::Active);
}

#[test]
fn sparse_reward_on_target_only() {
    for seed in 0..10 {
        let mut ctrl = sparse(5, seed);
        let (obs, _) = ctrl.reset(Some(seed));
        let (agent, target) = (obs.agent, obs.target);

        let mut actions = vec![];
        let x = if target.x > agent.x { Action::Right } else { Action::Left };
        actions.extend(std::iter::repeat(x).take((target.x - agent.x).abs() as usize));
        let y = if target.y > agent.y { Action::Up } else { Action::Down };
        actions.extend(std::iter::repeat(y).take((target.y - agent.y).abs() as usize));
        actions.extend(std::iter::repeat(Action::Forward).take(4));

        let (last, init) = actions.split_last().unwrap();
        for outcome in walk(&mut ctrl, init) {
            assert_eq!(outcome.reward(), 0);
            assert!(!outcome.is_terminated());
        }
        let outcome = ctrl.step(*last);
        assert_eq!(outcome.reward(), 1);
        assert!(outcome.reached_goal());
        assert_eq!(ctrl.agent_location(), target);
        assert_eq!(ctrl.state().phase(), EpisodePhase::TerminatedSuccess);

        // The finished episode keeps reporting its last step.
        assert_eq!(ctrl.step(Action::Left), outcome);
        assert_eq!(ctrl.agent_location(), target);
    }
}

#[test]
fn sparse_placement_is_seeded() {
    let mut a = sparse(8, 21);
    let mut b = sparse(8, 21);
    assert_eq!(a.observation(), b.observation());
    assert!(a.obstacles().is_empty());
    for seed in 0..20 {
        let (obs_a, _) = a.reset(Some(seed));
        let (obs_b, _) = b.reset(Some(seed));
        assert_eq!(obs_a, obs_b);
        assert_eq!(obs_a.agent.z, 0);
        assert_eq!(obs_a.target.z, 7);
        for v in &[obs_a.agent.x, obs_a.agent.y, obs_a.target.x, obs_a.target.y] {
            assert!((0..8).contains(v));
        }
    }
}
