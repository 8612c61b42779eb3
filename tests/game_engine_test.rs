//! End-to-end tests for the game state machine.

use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;

use termo::{
    FALLBACK_WORD, GameEngine, GameError, GuessOutcome, GuildId, LetterMark, MAX_ATTEMPTS,
    PlayerId, StatsRepository, WordList, XpAward, XpError,
};

/// XP collaborator that remembers every award it receives.
#[derive(Debug, Default)]
struct RecordingXp {
    awards: Mutex<Vec<(GuildId, PlayerId, u32)>>,
}

impl RecordingXp {
    fn awards(&self) -> Vec<(GuildId, PlayerId, u32)> {
        self.awards.lock().unwrap().clone()
    }
}

impl XpAward for RecordingXp {
    fn award_xp(&self, guild_id: GuildId, player_id: PlayerId, amount: u32) -> Result<(), XpError> {
        self.awards.lock().unwrap().push((guild_id, player_id, amount));
        Ok(())
    }
}

/// XP collaborator simulating a leveling subsystem that is down.
#[derive(Debug)]
struct FailingXp;

impl XpAward for FailingXp {
    fn award_xp(&self, _: GuildId, _: PlayerId, _: u32) -> Result<(), XpError> {
        Err(XpError::new("leveling subsystem offline".to_string()))
    }
}

/// Builds an engine over a temp database with a fixed word list. The temp
/// file handle must stay in scope to keep the database alive.
fn setup_engine(words: &[&str]) -> (NamedTempFile, Arc<RecordingXp>, GameEngine) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = StatsRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");

    let xp = Arc::new(RecordingXp::default());
    let engine = GameEngine::new(WordList::from_words(words.iter().copied()), repo, xp.clone());
    (db_file, xp, engine)
}

#[test]
fn test_start_rejects_second_game() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);

    engine.start(42, 1).expect("Start failed");
    assert_eq!(engine.start(42, 1).unwrap_err(), GameError::AlreadyActive);
    // Still rejected until the active game reaches a terminal state.
    assert_eq!(engine.start(42, 1).unwrap_err(), GameError::AlreadyActive);
}

#[test]
fn test_players_get_independent_games() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);

    engine.start(42, 1).expect("Start failed");
    engine.start(7, 1).expect("Start failed");
    assert_eq!(engine.sessions().active_count(), 2);
}

#[test]
fn test_guess_without_game() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);

    let result = engine.submit_guess(42, "crane");
    assert_eq!(result.unwrap_err(), GameError::NoActiveSession);
}

#[test]
fn test_quit_without_game() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);

    let result = engine.quit(42);
    assert_eq!(result.unwrap_err(), GameError::NoActiveSession);
}

#[test]
fn test_invalid_guess_consumes_no_attempt() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    for raw in ["ab", "toolong", "cr4ne", ""] {
        let result = engine.submit_guess(42, raw);
        assert_eq!(result.unwrap_err(), GameError::InvalidFormat);
    }

    let session = engine.sessions().get(42).expect("Session should survive");
    assert_eq!(session.attempt_count(), 0);
}

#[test]
fn test_win_reports_feedback_stats_and_xp() {
    let (_db, xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 7).expect("Start failed");

    let first = engine.submit_guess(42, "TRACE").expect("Guess failed");
    match first {
        GuessOutcome::InProgress {
            attempts,
            remaining,
        } => {
            assert_eq!(remaining, MAX_ATTEMPTS - 1);
            assert_eq!(
                attempts[0].feedback(),
                &vec![
                    LetterMark::Absent,
                    LetterMark::Exact,
                    LetterMark::Exact,
                    LetterMark::Present,
                    LetterMark::Exact,
                ]
            );
        }
        other => panic!("Expected InProgress, got {other:?}"),
    }

    // Lowercase input wins against the uppercase secret.
    let second = engine.submit_guess(42, "crane").expect("Guess failed");
    match second {
        GuessOutcome::Won {
            attempts,
            attempt_count,
            xp_awarded,
        } => {
            assert_eq!(attempt_count, 2);
            assert_eq!(attempts.len(), 2);
            assert_eq!(xp_awarded, 300);
        }
        other => panic!("Expected Won, got {other:?}"),
    }

    let stats = engine.stats(7, 42).expect("Stats failed");
    assert_eq!(*stats.games_played(), 1);
    assert_eq!(*stats.wins(), 1);
    assert_eq!(*stats.total_attempts_on_win(), 2);

    assert_eq!(xp.awards(), vec![(7, 42, 300)]);
}

#[test]
fn test_win_destroys_the_session() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    engine.submit_guess(42, "crane").expect("Guess failed");

    let result = engine.submit_guess(42, "crane");
    assert_eq!(result.unwrap_err(), GameError::NoActiveSession);
    assert!(engine.start(42, 1).is_ok(), "Player should be able to start over");
}

#[test]
fn test_first_attempt_win_awards_top_xp() {
    let (_db, xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    match engine.submit_guess(42, "crane").expect("Guess failed") {
        GuessOutcome::Won { xp_awarded, .. } => assert_eq!(xp_awarded, 500),
        other => panic!("Expected Won, got {other:?}"),
    }
    assert_eq!(xp.awards(), vec![(1, 42, 500)]);
}

#[test]
fn test_attempt_cap_loses_and_records() {
    let (_db, xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    for i in 0..MAX_ATTEMPTS - 1 {
        match engine.submit_guess(42, "slate").expect("Guess failed") {
            GuessOutcome::InProgress { remaining, .. } => {
                assert_eq!(remaining, MAX_ATTEMPTS - 1 - i);
            }
            other => panic!("Expected InProgress, got {other:?}"),
        }
    }

    match engine.submit_guess(42, "slate").expect("Guess failed") {
        GuessOutcome::Lost {
            attempts,
            secret_word,
        } => {
            assert_eq!(attempts.len(), MAX_ATTEMPTS);
            assert_eq!(secret_word, "CRANE");
        }
        other => panic!("Expected Lost, got {other:?}"),
    }

    let stats = engine.stats(1, 42).expect("Stats failed");
    assert_eq!(*stats.games_played(), 1);
    assert_eq!(*stats.wins(), 0);
    assert!(xp.awards().is_empty(), "Losses award no XP");

    let result = engine.submit_guess(42, "slate");
    assert_eq!(result.unwrap_err(), GameError::NoActiveSession);
}

#[test]
fn test_feedback_length_always_matches_word_length() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    for guess in ["slate", "trace", "about"] {
        match engine.submit_guess(42, guess).expect("Guess failed") {
            GuessOutcome::InProgress { attempts, .. } => {
                for attempt in &attempts {
                    assert_eq!(attempt.feedback().len(), attempt.guess().chars().count());
                }
            }
            other => panic!("Expected InProgress, got {other:?}"),
        }
    }
}

#[test]
fn test_quit_reveals_secret_and_records_nothing() {
    let (_db, xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");
    engine.submit_guess(42, "slate").expect("Guess failed");

    let session = engine.quit(42).expect("Quit failed");
    assert_eq!(session.secret_word(), "CRANE");
    assert_eq!(session.attempt_count(), 1);

    let stats = engine.stats(1, 42).expect("Stats failed");
    assert_eq!(*stats.games_played(), 0, "Quitting is not a finished game");
    assert!(xp.awards().is_empty());

    assert_eq!(engine.quit(42).unwrap_err(), GameError::NoActiveSession);
}

#[test]
fn test_xp_failure_never_changes_the_outcome() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = StatsRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");

    let engine = GameEngine::new(WordList::from_words(["crane"]), repo, Arc::new(FailingXp));
    engine.start(42, 1).expect("Start failed");

    match engine.submit_guess(42, "crane").expect("Guess failed") {
        GuessOutcome::Won { xp_awarded, .. } => assert_eq!(xp_awarded, 500),
        other => panic!("Expected Won, got {other:?}"),
    }

    let stats = engine.stats(1, 42).expect("Stats failed");
    assert_eq!(*stats.wins(), 1, "Stats still recorded when XP fails");
}

#[test]
fn test_empty_word_list_falls_back() {
    let (_db, _xp, engine) = setup_engine(&[]);

    let session = engine.start(42, 1).expect("Start should never fail for lack of words");
    assert_eq!(session.secret_word(), FALLBACK_WORD);

    match engine.submit_guess(42, "guess").expect("Guess failed") {
        GuessOutcome::Won { attempt_count, .. } => assert_eq!(attempt_count, 1),
        other => panic!("Expected Won, got {other:?}"),
    }
}

#[test]
fn test_full_game_board_renders() {
    let (_db, _xp, engine) = setup_engine(&["crane"]);
    engine.start(42, 1).expect("Start failed");

    engine.submit_guess(42, "trace").expect("Guess failed");
    let session = engine.sessions().get(42).expect("Session should survive");
    assert_eq!(session.attempts()[0].display(), "TRACE ⬜🟩🟩🟨🟩");
}
