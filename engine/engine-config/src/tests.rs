//! Tests for the configuration module.

use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.mcts.iterations, 10_000);
    assert_eq!(config.game.board_width, 3);
    assert_eq!(config.game.board_height, 3);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert!((config.mcts.exploration_constant - 1.414).abs() < f64::EPSILON);
    assert_eq!(config.mcts.expansion_threshold, 10);
    assert_eq!(config.mcts.selection_formula, "uct");
    assert!(config.mcts.seed.is_none());
}

#[test]
fn test_game_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.game.first_player, "X");
    assert_eq!(config.game.human_piece, "O");
}

#[test]
fn test_env_overrides() {
    std::env::set_var("PONDER_MCTS_ITERATIONS", "250");
    std::env::set_var("PONDER_MCTS_SEED", "99");
    std::env::set_var("PONDER_GAME_HUMAN_PIECE", "X");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.iterations, 250);
    assert_eq!(config.mcts.seed, Some(99));
    assert_eq!(config.game.human_piece, "X");

    std::env::remove_var("PONDER_MCTS_ITERATIONS");
    std::env::remove_var("PONDER_MCTS_SEED");
    std::env::remove_var("PONDER_GAME_HUMAN_PIECE");
}

#[test]
fn test_unparseable_env_override_is_ignored() {
    std::env::set_var("PONDER_GAME_BOARD_HEIGHT", "tall");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.game.board_height, 3);

    std::env::remove_var("PONDER_GAME_BOARD_HEIGHT");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[mcts]
iterations = 500
exploration_constant = 2.0
expansion_threshold = 4
selection_formula = "win_rate"
seed = 17

[game]
board_width = 4
board_height = 5
first_player = "O"
human_piece = "X"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.mcts.iterations, 500);
    assert!((config.mcts.exploration_constant - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.mcts.expansion_threshold, 4);
    assert_eq!(config.mcts.selection_formula, "win_rate");
    assert_eq!(config.mcts.seed, Some(17));
    assert_eq!(config.game.board_width, 4);
    assert_eq!(config.game.board_height, 5);
    assert_eq!(config.game.first_player, "O");
    assert_eq!(config.game.human_piece, "X");
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
iterations = 42
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.mcts.iterations, 42);
    assert_eq!(config.mcts.expansion_threshold, 10); // Default
    assert_eq!(config.common.log_level, "info"); // Default
    assert_eq!(config.game.board_width, 3); // Default
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("ponder-config-{}.toml", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[game]\nboard_width = 6").unwrap();
    drop(file);

    let config = load_from_path(&path);
    assert_eq!(config.game.board_width, 6);
    assert_eq!(config.game.board_height, 3);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join(format!("ponder-invalid-{}.toml", std::process::id()));
    std::fs::write(&path, "[mcts\niterations = ").unwrap();

    let config = load_from_path(&path);
    assert_eq!(config.mcts.expansion_threshold, 10);

    std::fs::remove_file(&path).unwrap();

    // Missing files fall back too
    let config = load_from_path(&path);
    assert_eq!(config.game.board_width, 3);
}

#[test]
fn test_config_clone() {
    let config = CentralConfig::default();
    let cloned = config.clone();
    assert_eq!(cloned.mcts.iterations, config.mcts.iterations);
    assert_eq!(cloned.game.first_player, config.game.first_player);
}
