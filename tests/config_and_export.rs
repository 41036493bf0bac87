//! Configuration files, CSV export and run summaries.

mod common;

use common::state;
use pursuit::{
    Error,
    bellman::BellmanSolver,
    config::{ExperimentConfig, MazePreset, WallSpec},
    export::ValueHistoryExporter,
    maze::{Action, Position},
    pipeline::{JsonlObserver, LearningPipeline, LearningResult, PipelineConfig, UpdateObservation},
    q_learning::QLearningSolver,
};
use tempfile::TempDir;

#[test]
fn test_default_config_builds_the_reference_maze() {
    let config = ExperimentConfig::default();
    let maze = config.validate().unwrap();

    assert_eq!((maze.length(), maze.height()), (6, 5));
    assert_eq!(maze.goal(), Position::new(4, 4));
    assert_eq!(maze.walls().len(), 9);
    assert_eq!(maze.outer_walls().count(), 4);
    assert_eq!(config.maze.start(), state(0, 0, 4, 4));
    assert_eq!(config.learning_start(), state(0, 0, 3, 3));
}

#[test]
fn test_config_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("experiment.json");

    let mut config = ExperimentConfig::preset(MazePreset::Open4);
    config.maze.walls.push(WallSpec::vertical(1, 0, 1));
    config.bellman.horizon = 7;
    config.bellman.pursuer_actions = vec![Action::Up, Action::Down, Action::Left, Action::Right];
    config.learning.seed = Some(99);
    config.learning.reset_probability = Some(0.05);
    config.save(&path).unwrap();

    let loaded = ExperimentConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let maze = loaded.validate().unwrap();
    assert!(!maze.is_player_action_legal(Action::Right, Position::new(1, 0)));
    assert!(maze.is_pursuer_action_legal(Action::Right, Position::new(1, 0)));
}

#[test]
fn test_missing_config_file_reports_io_error() {
    let dir = TempDir::new().unwrap();
    let result = ExperimentConfig::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_malformed_wall_in_config_is_rejected() {
    let mut config = ExperimentConfig::default();
    config.maze.walls.push(WallSpec::horizontal(2, 3, 1));
    assert!(matches!(
        config.validate(),
        Err(Error::InvalidWallRange { .. })
    ));
}

#[test]
fn test_value_history_csv_round_trip() {
    let config = ExperimentConfig::preset(MazePreset::Open4);
    let maze = config.validate().unwrap();
    let mut solver = QLearningSolver::new(
        &maze,
        &Action::ALL,
        &Action::ALL,
        config.learning_start(),
        config.learning.discount,
    )
    .unwrap();
    solver.run(300, Some(4)).unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.csv");
    ValueHistoryExporter::write_history(&path, solver.value_history()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("iteration,value\n"));

    let records = ValueHistoryExporter::read_history(&path).unwrap();
    assert_eq!(records.len(), 300);
    assert_eq!(records[0].iteration, 1);
    assert_eq!(records[299].iteration, 300);
    assert_eq!(records[299].value, solver.initial_value());
}

#[test]
fn test_decision_csv_has_one_row_per_layer() {
    let config = ExperimentConfig::preset(MazePreset::Open4);
    let maze = config.validate().unwrap();
    let table = BellmanSolver::new(&maze, &Action::ALL, &Action::ALL, 5)
        .unwrap()
        .solve()
        .unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("decisions.csv");
    let rows = ValueHistoryExporter::write_decisions(&path, &table, config.maze.start()).unwrap();
    assert_eq!(rows, 6);

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("remaining,action,value"));
    assert!(lines.next().unwrap().starts_with("0,stay,0"));
    assert_eq!(lines.count(), 5);
}

#[test]
fn test_jsonl_observations_and_summary() {
    let maze = ExperimentConfig::preset(MazePreset::Open4).validate().unwrap();
    let start = state(0, 0, 3, 3);
    let mut solver = QLearningSolver::new(&maze, &Action::ALL, &Action::ALL, start, 0.8).unwrap();

    let dir = TempDir::new().unwrap();
    let jsonl = dir.path().join("updates.jsonl");
    let mut pipeline = LearningPipeline::new(PipelineConfig {
        iterations: 100,
        seed: Some(6),
        reset_probability: Some(0.1),
    })
    .with_observer(Box::new(JsonlObserver::new(&jsonl, 10).unwrap()));
    let result = pipeline.run(&mut solver).unwrap();

    let contents = std::fs::read_to_string(&jsonl).unwrap();
    let observations: Vec<UpdateObservation> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(observations.len(), 10);
    assert_eq!(observations[0].iteration, 10);
    assert!((observations[9].initial_value - result.final_value).abs() < 1e-12);

    let summary = dir.path().join("summary.json");
    result.save(&summary).unwrap();
    let loaded = LearningResult::load(&summary).unwrap();
    assert_eq!(loaded.iterations, 100);
    assert_eq!(loaded.episodes, result.episodes);
    assert!(loaded.episodes >= 1);
}
