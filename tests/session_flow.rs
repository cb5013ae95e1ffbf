mod common;

use chess_chat_app::game::oracle::LegalityOracle;
use chess_chat_app::{GameConfig, GameSession, SessionError};
use common::{quick_config, session, ScriptedModel, Step};
use std::time::Duration;

#[actix_rt::test]
async fn player_move_then_model_reply() {
    let model = ScriptedModel::new(vec![Step::Reply("e5")]);
    let mut game = session(&model);

    let reply = game.play("e4").await.unwrap();

    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("e7e5"));
    assert_eq!(model.prompts(), vec!["Reply next chess move as black. Only say the move. 1. e4"]);
    assert_eq!(game.board().render_movetext(), "1. e4 e5");
    assert_eq!(game.failures(), 0);

    let record = game.last_move();
    assert_eq!(record.player.san, "e4");
    assert_eq!(record.player.uci, "e2e4");
    assert_eq!(record.model.san, "e5");
    assert_eq!(record.model.uci, "e7e5");
}

#[actix_rt::test]
async fn model_opens_and_move_number_is_stripped() {
    let model = ScriptedModel::new(vec![Step::Reply("1. Nf3")]);
    let mut game = session(&model);

    let reply = game.get_model_move().await;

    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("g1f3"));
    assert_eq!(model.prompts(), vec!["Say the first move to play in chess in standard notation"]);
    assert_eq!(game.board().render_movetext(), "1. Nf3");
    assert!(game.status().contains("Nf3"));
}

#[actix_rt::test]
async fn chatty_reply_yields_the_longest_move() {
    let model = ScriptedModel::new(vec![Step::Reply("I would play Nf6.")]);
    let mut game = session(&model);

    game.play("e4").await.unwrap();

    // "f6" is legal too, but the three-letter move wins
    assert_eq!(game.last_move().model.san, "Nf6");
}

#[actix_rt::test]
async fn illegal_reply_switches_to_failed_prompt() {
    let model = ScriptedModel::new(vec![Step::Reply("e5"), Step::Reply("e5"), Step::Reply("Nc6")]);
    let mut game = session(&model);

    game.play("e4").await.unwrap();
    let reply = game.play("Nf3").await.unwrap();

    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("b8c6"));
    let prompts = model.prompts();
    assert_eq!(prompts.len(), 3);
    assert_eq!(prompts[1], "Reply next chess move as black. Only say the move. 1. e4 e5 2. Nf3");
    assert!(prompts[2].starts_with("Reply next chess move as black. Play one of these moves: "));
    assert!(prompts[2].contains("Nc6"));
    assert!(prompts[2].ends_with(". Only say the move. 1. e4 e5 2. Nf3"));
    assert_eq!(game.failures(), 0);
    assert_eq!(game.board().render_movetext(), "1. e4 e5 2. Nf3 Nc6");
}

#[actix_rt::test]
async fn five_timeouts_exhaust_the_round() {
    let model = ScriptedModel::new(vec![
        Step::Hang,
        Step::Hang,
        Step::Hang,
        Step::Hang,
        Step::Hang,
        Step::Reply("e5"),
    ]);
    let mut game = session(&model);

    let reply = game.play("e4").await.unwrap();

    assert!(reply.is_none());
    assert_eq!(model.calls(), 5);
    assert_eq!(model.remaining(), 1);
    assert_eq!(game.failures(), 5);
    assert_eq!(game.status(), "Move fail limit reached (5)");
    assert_eq!(game.board().render_movetext(), "1. e4");

    // The session stays playable; the retry starts from the failed prompt
    let reply = game.get_model_move().await;
    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("e7e5"));
    assert!(model.prompts()[5].contains("Play one of these moves"));
    assert_eq!(game.failures(), 0);
}

#[actix_rt::test]
async fn provider_errors_count_like_timeouts() {
    let model = ScriptedModel::new(vec![Step::Fail, Step::Hang, Step::Reply("Nf6")]);
    let mut game = session(&model);

    let reply = game.play("d4").await.unwrap();

    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("g8f6"));
    assert_eq!(model.calls(), 3);
    let prompts = model.prompts();
    assert!(!prompts[0].contains("Play one of these moves"));
    assert!(prompts[1].contains("Play one of these moves"));
    assert!(prompts[2].contains("Play one of these moves"));
    assert_eq!(game.failures(), 0);
}

#[actix_rt::test]
async fn rejected_player_move_changes_nothing() {
    let model = ScriptedModel::new(vec![
        Step::Hang,
        Step::Hang,
        Step::Hang,
        Step::Hang,
        Step::Hang,
    ]);
    let mut game = session(&model);

    let err = game.play("castle please").await.unwrap_err();
    assert_eq!(err, SessionError::InvalidPlayerMove { text: "castle please".to_string() });
    assert_eq!(model.calls(), 0);
    assert!(game.board().is_starting_position());

    game.play("e4").await.unwrap();
    assert_eq!(game.failures(), 5);

    let err = game.play("Zz9").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidPlayerMove { .. }));
    assert_eq!(game.failures(), 5);
    assert_eq!(model.calls(), 5);
    assert_eq!(game.board().render_movetext(), "1. e4");
    assert_eq!(game.status(), "Move fail limit reached (5)");
}

#[actix_rt::test]
async fn attempts_are_capped_by_config() {
    let model = ScriptedModel::new((0..7).map(|_| Step::Reply("xyz")).collect());
    let config = GameConfig { max_attempts: 3, ..quick_config() };
    let mut game = GameSession::new(model.clone(), config);

    assert!(game.play("e4").await.unwrap().is_none());

    assert_eq!(model.calls(), 3);
    assert_eq!(game.failures(), 3);
    assert_eq!(game.status(), "Move fail limit reached (3)");
}

#[actix_rt::test]
async fn failure_counter_is_bounded() {
    let model = ScriptedModel::new((0..5).map(|_| Step::Reply("xyz")).collect());
    let config = GameConfig { max_failures: 2, ..quick_config() };
    let mut game = GameSession::new(model.clone(), config);

    assert!(game.play("e4").await.unwrap().is_none());

    assert_eq!(model.calls(), 5);
    assert_eq!(game.failures(), 2);
    assert_eq!(game.status(), "Move fail limit reached (2)");
}

#[actix_rt::test]
async fn checkmate_ends_all_activity() {
    let model = ScriptedModel::new(vec![Step::Reply("e5"), Step::Reply("Qh4#"), Step::Reply("a6")]);
    let mut game = session(&model);

    game.play("f3").await.unwrap();
    let mate = game.play("g4").await.unwrap();
    assert_eq!(mate.map(|m| m.to_string()).as_deref(), Some("d8h4"));
    assert!(game.board().is_game_over());

    assert_eq!(game.play("a3").await, Ok(None));
    assert!(game.get_model_move().await.is_none());
    assert_eq!(model.calls(), 2);
    assert_eq!(model.remaining(), 1);
    assert_eq!(game.board().render_movetext(), "1. f3 e5 2. g4 Qh4#");
}

#[actix_rt::test]
async fn late_reply_never_reaches_the_board() {
    let model = ScriptedModel::new(vec![
        Step::Late(Duration::from_millis(120), "e5"),
        Step::Reply("Nf6"),
    ]);
    let config = GameConfig { completion_timeout_ms: 30, ..GameConfig::default() };
    let mut game = GameSession::new(model.clone(), config);

    let reply = game.play("e4").await.unwrap();
    assert_eq!(reply.map(|m| m.to_string()).as_deref(), Some("g8f6"));

    // Let the abandoned call finish
    actix_rt::time::sleep(Duration::from_millis(250)).await;

    assert_eq!(game.board().render_movetext(), "1. e4 Nf6");
    assert_eq!(game.last_move().model.san, "Nf6");
    assert_eq!(game.failures(), 0);
}

#[actix_rt::test]
async fn unconfigured_model_stops_the_round() {
    let model = ScriptedModel::new(vec![Step::Unconfigured, Step::Reply("e5")]);
    let mut game = session(&model);

    assert!(game.play("e4").await.unwrap().is_none());

    assert_eq!(model.calls(), 1);
    assert_eq!(game.failures(), 0);
    assert!(game.status().starts_with("Model unavailable"));
}
