use kalam_core::*;

/// Reveals every safe cell of the current stage, reading the board directly.
fn clear_stage(game: &mut Game) -> Vec<Event> {
    let stage = game.session_id();
    let mut events = game.dispatch(Input::RevealAt((0, 0))).unwrap();
    let board = game.session().board().unwrap().clone();
    let (rows, cols) = board.size();

    for pos in (0..rows).flat_map(|row| (0..cols).map(move |col| (row, col))) {
        if game.session_id() != stage {
            break;
        }
        if board.is_mine(pos) || game.session().mask()[pos] != CellState::Concealed {
            continue;
        }
        events = game.dispatch(Input::RevealAt(pos)).unwrap();
    }
    events
}

#[test]
fn clearing_a_stage_advances_and_keeps_score() {
    let mut game = Game::new(Rules::CLASSIC, 2024).unwrap();
    let first = game.session_id();

    let events = clear_stage(&mut game);

    assert!(events.contains(&Event::Ended(Terminal::cleared(48_000))));
    let Some(Event::StageStarted {
        session,
        stage,
        mines,
    }) = events.last().cloned()
    else {
        panic!("expected a new stage, got {:?}", events);
    };
    assert_ne!(session, first);
    assert_eq!(stage, 2);
    assert_eq!(mines, 130);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.stage, 2);
    assert_eq!(snapshot.score, 48_000);
    assert_eq!(snapshot.time_remaining, 10);
    assert_eq!(snapshot.mines_remaining, 130);
    assert!(snapshot.active);
    assert_eq!(game.ticking(), None);
}

#[test]
fn late_ticks_do_not_touch_the_next_stage() {
    let mut game = Game::new(Rules::CLASSIC, 7).unwrap();
    let first = game.session_id();
    clear_stage(&mut game);

    game.dispatch(Input::RevealAt((10, 10))).unwrap();
    let before = game.session().time_remaining();

    assert!(game.dispatch(Input::Tick(first)).unwrap().is_empty());
    assert_eq!(game.session().time_remaining(), before);

    let current = game.session_id();
    assert_eq!(
        game.dispatch(Input::Tick(current)).unwrap(),
        vec![Event::TimeChanged(before - 1)]
    );
}

#[test]
fn mine_count_reaches_the_cap() {
    let mut game = Game::new(Rules::CLASSIC, 1).unwrap();
    for stage in 1..=20 {
        assert_eq!(game.session().stage(), stage);
        assert_eq!(game.session().mine_count(), (120 + 10 * (stage as u16 - 1)).min(300));
        clear_stage(&mut game);
    }
    assert_eq!(game.session().stage(), 21);
    assert_eq!(game.session().mine_count(), 300);
}

#[test]
fn new_game_after_loss_resets_stage_and_score() {
    let mut game = Game::new(Rules::CLASSIC, 99).unwrap();
    clear_stage(&mut game);

    game.dispatch(Input::RevealAt((0, 0))).unwrap();
    let mine = game.session().board().unwrap().mines().next().unwrap();
    let events = game.dispatch(Input::RevealAt(mine)).unwrap();
    assert!(matches!(
        events.last(),
        Some(Event::Ended(Terminal {
            won: false,
            timed_out: false,
            hit: Some(hit),
            ..
        })) if *hit == mine
    ));

    let events = game.dispatch(Input::NewGame).unwrap();

    assert!(matches!(
        events.as_slice(),
        [Event::StageStarted {
            stage: 1,
            mines: 120,
            ..
        }]
    ));
    assert_eq!(game.session().score(), 0);
    assert!(game.session().is_first_click());
}

#[test]
fn small_board_cascade_wins_immediately() {
    let board = Board::from_mine_coords((3, 3), &[(2, 2)]).unwrap();
    let mut session = GameSession::with_board(Rules::CLASSIC, board, 1, 0);

    let report = session.reveal_at((0, 0)).unwrap();

    assert_eq!(report.outcome, RevealOutcome::Won);
    let snapshot = session.snapshot();
    for ((row, col), cell) in snapshot.cells.indexed_iter() {
        let expected = match (row, col) {
            (2, 2) => CellView::Concealed,
            (1, 1) | (1, 2) | (2, 1) => CellView::Opened(1),
            _ => CellView::Opened(0),
        };
        assert_eq!(*cell, expected, "at ({}, {})", row, col);
    }
    assert_eq!(snapshot.terminal, Some(Terminal::cleared(800)));
}
