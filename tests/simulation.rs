//! Joint simulation driver and policy-driven games.

mod common;

use std::sync::Arc;

use common::{open4, reference_maze, state};
use pursuit::{
    Error,
    bellman::{BellmanSolver, PolicyTable},
    maze::{Action, Maze, Position, Role},
    simulation::{Agent, MazeGame, Outcome, Simulation},
    types::JointState,
};

fn solved(maze: &Maze, pursuer_actions: &[Action], horizon: usize) -> Arc<PolicyTable> {
    let table = BellmanSolver::new(maze, &Action::ALL, pursuer_actions, horizon)
        .unwrap()
        .solve()
        .unwrap();
    Arc::new(table)
}

#[test]
fn test_stepping_without_agents_fails() {
    let maze = open4();
    let mut simulation = Simulation::new(&maze, Some(1));
    assert!(matches!(
        simulation.step(),
        Err(Error::MissingAgent { role: Role::Player })
    ));

    simulation
        .place(Agent::random_player(Position::new(0, 0), &Action::ALL))
        .unwrap();
    assert!(matches!(
        simulation.step(),
        Err(Error::MissingAgent {
            role: Role::Pursuer
        })
    ));
    assert_eq!(simulation.time_step(), 0);
    assert_eq!(simulation.player().unwrap().position, Position::new(0, 0));
}

#[test]
fn test_random_walk_respects_each_role_walls() {
    let maze = reference_maze();
    let mut simulation = Simulation::new(&maze, Some(5))
        .with_agents(
            Agent::random_player(Position::new(0, 0), &Action::ALL),
            Agent::random_pursuer(Position::new(4, 4), &Action::ALL),
        )
        .unwrap();

    for _ in 0..2_000 {
        let t = simulation.step().unwrap();
        assert!(maze.is_player_action_legal(t.player_action, t.before.player));
        assert!(maze.is_pursuer_action_legal(t.pursuer_action, t.before.pursuer));
        assert_eq!(t.after.player, t.before.player.apply(t.player_action));
        assert_eq!(t.after.pursuer, t.before.pursuer.apply(t.pursuer_action));
        assert!(maze.contains(t.after.player) && maze.contains(t.after.pursuer));
    }
    assert_eq!(simulation.time_step(), 2_000);
}

#[test]
fn test_reset_restores_the_start() {
    let maze = open4();
    let start = state(0, 0, 3, 3);
    let mut simulation = Simulation::new(&maze, Some(2))
        .with_agents(
            Agent::random_player(start.player, &Action::ALL),
            Agent::random_pursuer(start.pursuer, &Action::ALL),
        )
        .unwrap();
    for _ in 0..10 {
        simulation.step().unwrap();
    }
    simulation.reset(start).unwrap();
    assert_eq!(simulation.state().unwrap(), start);
    assert_eq!(simulation.time_step(), 0);
    assert!(simulation.reset(state(4, 0, 0, 0)).is_err());
}

#[test]
fn test_game_reaches_goal_against_static_pursuer() {
    let maze = open4();
    let horizon = 4;
    let policy = solved(&maze, &[Action::Stay], horizon);
    let start = state(0, 0, 3, 3);

    let game = MazeGame::new(&maze, policy, &Action::ALL, &[Action::Stay], start, Some(3)).unwrap();
    let trajectory = game.play().unwrap();

    assert_eq!(trajectory.len(), horizon);
    assert_eq!(trajectory.start(), start);
    assert_eq!(trajectory.final_state().player, maze.goal());
    assert!(matches!(
        trajectory.outcome(&maze),
        Outcome::ReachedGoal { .. }
    ));
    assert!(
        trajectory
            .transitions()
            .iter()
            .all(|t| t.after.pursuer == start.pursuer)
    );
}

#[test]
fn test_capture_freezes_both_agents() {
    let maze = open4();
    let policy = solved(&maze, &Action::ALL, 5);
    let caught = state(2, 2, 2, 2);

    let trajectory = MazeGame::new(&maze, policy, &Action::ALL, &Action::ALL, caught, Some(8))
        .unwrap()
        .play()
        .unwrap();

    assert_eq!(trajectory.outcome(&maze), Outcome::Captured { step: 0 });
    for t in trajectory.transitions() {
        assert_eq!(t.player_action, Action::Stay);
        assert_eq!(t.pursuer_action, Action::Stay);
        assert_eq!(t.after, caught);
    }
}

#[test]
fn test_games_in_the_reference_maze_stay_consistent() {
    let maze = reference_maze();
    let horizon = 15;
    let policy = solved(&maze, &Action::ALL, horizon);
    let start = state(0, 0, 4, 4);

    for seed in 0..20 {
        let trajectory = MazeGame::new(
            &maze,
            Arc::clone(&policy),
            &Action::ALL,
            &Action::ALL,
            start,
            Some(seed),
        )
        .unwrap()
        .play()
        .unwrap();
        assert_eq!(trajectory.len(), horizon);

        for (time_step, t) in trajectory.transitions().iter().enumerate() {
            assert_eq!(t.time_step, time_step);
            assert!(maze.is_player_action_legal(t.player_action, t.before.player));
            if t.before.is_capture() {
                assert_eq!(t.after, t.before);
            } else if maze.is_goal(t.before.player) {
                assert_eq!(t.after.player, t.before.player);
            } else {
                let expected = policy.decision_at(t.before, time_step).unwrap().action;
                assert_eq!(t.player_action, expected);
            }
        }
    }
}

#[test]
fn test_game_cannot_run_past_the_horizon() {
    let maze = open4();
    let policy = solved(&maze, &Action::ALL, 2);
    let mut game =
        MazeGame::new(&maze, policy, &Action::ALL, &Action::ALL, state(0, 0, 3, 3), Some(4))
            .unwrap();
    game.step().unwrap();
    game.step().unwrap();
    assert!(game.is_finished());
    assert!(matches!(
        game.step(),
        Err(Error::HorizonExceeded {
            step: 2,
            horizon: 2
        })
    ));
    assert_eq!(game.trajectory().len(), 2);
}

#[test]
fn test_unsolved_table_cannot_be_played() {
    let maze = open4();
    let unsolved = Arc::new(PolicyTable::new(&maze));
    let start = JointState::new(Position::new(0, 0), Position::new(3, 3));
    assert!(matches!(
        MazeGame::new(&maze, unsolved, &Action::ALL, &Action::ALL, start, None),
        Err(Error::InvalidConfiguration { .. })
    ));
}
