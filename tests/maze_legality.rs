//! Wall legality for both roles and the move algebra.

mod common;

use common::{open4, reference_maze};
use pursuit::{
    Error,
    maze::{Action, Maze, Orientation, Position, Role},
};

const DIRECTIONS: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

#[test]
fn test_boundary_binds_both_roles() {
    for maze in [open4(), reference_maze()] {
        for position in maze.positions() {
            for action in DIRECTIONS {
                let leaves_grid = !maze.contains(position.apply(action));
                if leaves_grid {
                    assert!(
                        !maze.is_pursuer_action_legal(action, position),
                        "pursuer crossed the boundary moving {action} from {position}"
                    );
                    assert!(
                        !maze.is_player_action_legal(action, position),
                        "player crossed the boundary moving {action} from {position}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_pursuer_is_only_bound_by_the_boundary() {
    let maze = reference_maze();
    for position in maze.positions() {
        for action in Action::ALL {
            assert_eq!(
                maze.is_pursuer_action_legal(action, position),
                maze.contains(position.apply(action)),
                "{action} from {position}"
            );
        }
    }
}

#[test]
fn test_interior_walls_bind_the_player_only() {
    let maze = reference_maze();
    let interior: Vec<_> = maze.walls().iter().filter(|wall| !wall.outer).collect();
    assert_eq!(interior.len(), 5);

    for wall in interior {
        for c in wall.min..=wall.max {
            let crossings = match wall.orientation {
                Orientation::Horizontal => [
                    (Position::new(c, wall.at), Action::Down),
                    (Position::new(c, wall.at + 1), Action::Up),
                ],
                Orientation::Vertical => [
                    (Position::new(wall.at, c), Action::Right),
                    (Position::new(wall.at + 1, c), Action::Left),
                ],
            };
            for (position, action) in crossings {
                assert!(maze.contains(position) && maze.contains(position.apply(action)));
                assert!(
                    !maze.is_player_action_legal(action, position),
                    "player crossed {wall:?} moving {action} from {position}"
                );
                assert!(
                    maze.is_pursuer_action_legal(action, position),
                    "pursuer blocked by {wall:?} moving {action} from {position}"
                );
            }
        }
    }
}

#[test]
fn test_stay_is_always_legal() {
    let maze = reference_maze();
    for position in maze.positions() {
        assert!(maze.is_player_action_legal(Action::Stay, position));
        assert!(maze.is_pursuer_action_legal(Action::Stay, position));
    }
}

#[test]
fn test_apply_then_inverse_round_trips() {
    for x in -3..8 {
        for y in -3..8 {
            let position = Position::new(x, y);
            assert_eq!(position.apply(Action::Stay), position);
            for action in DIRECTIONS {
                assert_ne!(position.apply(action), position);
                assert_eq!(position.apply(action).apply(action.inverse()), position);
            }
        }
    }
}

#[test]
fn test_feasible_actions_follow_candidate_order() {
    let maze = open4();
    let corner = Position::new(0, 0);

    let forward = maze.feasible_actions(&Action::ALL, corner, Role::Player);
    assert_eq!(forward, vec![Action::Down, Action::Right, Action::Stay]);

    let reversed: Vec<Action> = Action::ALL.iter().rev().copied().collect();
    let backward = maze.feasible_actions(&reversed, corner, Role::Player);
    assert_eq!(backward, vec![Action::Stay, Action::Right, Action::Down]);

    let pursuer = [Action::Up, Action::Left];
    assert!(maze.feasible_actions(&pursuer, corner, Role::Pursuer).is_empty());
}

#[test]
fn test_every_cell_keeps_a_move_in_the_reference_maze() {
    let maze = reference_maze();
    for position in maze.positions() {
        let feasible = maze.feasible_actions(&Action::ALL, position, Role::Player);
        assert!(feasible.contains(&Action::Stay));
        assert!(feasible.len() >= 2, "player boxed in at {position}");
    }
}

#[test]
fn test_construction_is_validated() {
    assert!(matches!(
        Maze::new(0, 3, Position::new(0, 0)),
        Err(Error::InvalidDimensions { .. })
    ));
    assert!(matches!(
        Maze::new(3, 3, Position::new(3, 1)),
        Err(Error::PositionOutOfBounds { .. })
    ));

    let mut maze = Maze::new(3, 3, Position::new(1, 1)).unwrap();
    assert!(matches!(
        maze.add_vertical_wall(0, 2, 1, false),
        Err(Error::InvalidWallRange { min: 2, max: 1 })
    ));
    assert_eq!(maze.walls().len(), 4);
    assert_eq!(maze.outer_walls().count(), 4);
}
