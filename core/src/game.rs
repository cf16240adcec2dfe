use alloc::vec;
use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Identity of one session, a new one is handed out for every stage and every new game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Inputs accepted by [`Game::dispatch`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    RevealAt(Coord2),
    ToggleFlagAt(Coord2),
    /// One clock unit elapsed for the given session
    Tick(SessionId),
    NewGame,
}

/// Changes a renderer may react to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    CellsOpened(Vec<RevealedCell>),
    FlagChanged {
        coords: Coord2,
        state: CellState,
        mines_left: i32,
    },
    ScoreChanged {
        delta: u64,
        total: u64,
    },
    TimeChanged(u32),
    Ended(Terminal),
    StageStarted {
        session: SessionId,
        stage: u32,
        mines: CellCount,
    },
}

/// Owns the live session and serializes every mutation through [`Game::dispatch`].
#[derive(Clone, Debug)]
pub struct Game {
    rules: Rules,
    session: GameSession,
    session_id: SessionId,
    rng: SmallRng,
}

impl Game {
    pub fn new(rules: Rules, seed: u64) -> Result<Self> {
        rules.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let session = GameSession::new(rules, 1, 0, rng.random())?;

        Ok(Self {
            rules,
            session,
            session_id: SessionId(0),
            rng,
        })
    }

    /// Starts from a prepared session, later stages follow the session's rules.
    pub fn from_session(session: GameSession, seed: u64) -> Result<Self> {
        let rules = *session.rules();
        rules.validate()?;

        Ok(Self {
            rules,
            session,
            session_id: SessionId(0),
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The session that currently wants clock ticks, if any.
    pub fn ticking(&self) -> Option<SessionId> {
        (self.session.timer_state() == TimerState::Running).then_some(self.session_id)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn dispatch(&mut self, input: Input) -> Result<Vec<Event>> {
        log::trace!("dispatch {:?} to session {:?}", input, self.session_id);

        let events = match input {
            Input::RevealAt(coords) => self.reveal_at(coords),
            Input::ToggleFlagAt(coords) => self.toggle_flag_at(coords),
            Input::Tick(session) => Ok(self.tick(session)),
            Input::NewGame => self.new_game().map(|event| vec![event]),
        };

        match events {
            Err(GameError::AlreadyEnded) => {
                log::debug!("{:?} ignored, session {:?} has ended", input, self.session_id);
                Ok(Vec::new())
            }
            events => events,
        }
    }

    fn reveal_at(&mut self, coords: Coord2) -> Result<Vec<Event>> {
        let RevealReport { outcome, reveal } = self.session.reveal_at(coords)?;
        let mut events = Vec::new();

        if !reveal.is_empty() {
            let delta = reveal.score_delta;
            events.push(Event::CellsOpened(reveal.cells));
            events.push(Event::ScoreChanged {
                delta,
                total: self.session.score(),
            });
            events.push(Event::TimeChanged(self.session.time_remaining()));
        }

        if let Some(terminal) = self.session.terminal() {
            events.push(Event::Ended(terminal));
        }

        if outcome == RevealOutcome::Won {
            events.push(self.advance()?);
        }

        Ok(events)
    }

    fn toggle_flag_at(&mut self, coords: Coord2) -> Result<Vec<Event>> {
        Ok(match self.session.toggle_flag_at(coords)? {
            MarkOutcome::Changed(state) => vec![Event::FlagChanged {
                coords,
                state,
                mines_left: self.session.mines_left(),
            }],
            MarkOutcome::NoChange => Vec::new(),
        })
    }

    fn tick(&mut self, session: SessionId) -> Vec<Event> {
        if session != self.session_id {
            log::debug!(
                "dropping tick for stale session {:?}, current is {:?}",
                session,
                self.session_id
            );
            return Vec::new();
        }

        match self.session.tick() {
            TickOutcome::Ignored => Vec::new(),
            TickOutcome::Ticked(remaining) => vec![Event::TimeChanged(remaining)],
            TickOutcome::Expired => {
                let mut events = vec![Event::TimeChanged(0)];
                events.extend(self.session.terminal().map(Event::Ended));
                events
            }
        }
    }

    /// Moves on to the next stage after a win, keeping the score.
    fn advance(&mut self) -> Result<Event> {
        let next = self.session.next_stage(self.rng.random())?;
        self.replace_session(next)
    }

    fn new_game(&mut self) -> Result<Event> {
        let fresh = GameSession::new(self.rules, 1, 0, self.rng.random())?;
        self.replace_session(fresh)
    }

    fn replace_session(&mut self, session: GameSession) -> Result<Event> {
        self.session = session;
        self.session_id = self.session_id.next();
        log::debug!(
            "session {:?} starts stage {} with {} mines",
            self.session_id,
            self.session.stage(),
            self.session.mine_count()
        );

        Ok(Event::StageStarted {
            session: self.session_id,
            stage: self.session.stage(),
            mines: self.session.mine_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_on(size: Coord2, mines: &[Coord2]) -> Game {
        let board = Board::from_mine_coords(size, mines).unwrap();
        Game::from_session(GameSession::with_board(Rules::CLASSIC, board, 1, 0), 0).unwrap()
    }

    #[test]
    fn winning_a_prepared_board_moves_on_to_classic_stage() {
        let mut game = game_on((3, 3), &[(2, 2)]);
        let first = game.session_id();

        let events = game.dispatch(Input::RevealAt((0, 0))).unwrap();

        assert_eq!(events.len(), 5);
        assert!(matches!(&events[0], Event::CellsOpened(cells) if cells.len() == 8));
        assert_eq!(
            events[1],
            Event::ScoreChanged {
                delta: 800,
                total: 800,
            }
        );
        assert_eq!(events[3], Event::Ended(Terminal::cleared(800)));
        assert!(matches!(
            events[4],
            Event::StageStarted {
                session,
                stage: 2,
                mines: 130,
            } if session != first
        ));

        let snapshot = game.snapshot();
        assert_eq!(snapshot.size, (20, 30));
        assert_eq!(snapshot.score, 800);
        assert!(snapshot.active);
        assert_eq!(snapshot.terminal, None);
        assert!(!game.dispatch(Input::RevealAt((10, 10))).unwrap().is_empty());
    }

    #[test]
    fn prepared_session_with_unplayable_rules_is_rejected() {
        let board = Board::from_mine_coords((3, 3), &[(2, 2)]).unwrap();
        let rules = Rules {
            size: (3, 3),
            ..Rules::CLASSIC
        };

        let game = Game::from_session(GameSession::with_board(rules, board, 1, 0), 0);

        assert_eq!(
            game.err(),
            Some(GameError::TooManyMines {
                requested: 300,
                capacity: 0,
            })
        );
    }

    #[test]
    fn stale_ticks_are_dropped() {
        let mut game = Game::new(Rules::CLASSIC, 11).unwrap();
        let first = game.session_id();
        game.dispatch(Input::RevealAt((10, 10))).unwrap();
        assert_eq!(game.ticking(), Some(first));

        game.dispatch(Input::NewGame).unwrap();
        assert_ne!(game.session_id(), first);
        assert_eq!(game.ticking(), None);

        assert!(game.dispatch(Input::Tick(first)).unwrap().is_empty());
        assert_eq!(game.session().time_remaining(), 10);
    }

    #[test]
    fn mine_hit_reports_coordinates() {
        let mut game = game_on((10, 10), &[(5, 5)]);
        game.dispatch(Input::RevealAt((4, 4))).unwrap();

        let events = game.dispatch(Input::RevealAt((5, 5))).unwrap();

        assert_eq!(
            events,
            vec![Event::Ended(Terminal {
                won: false,
                timed_out: false,
                hit: Some((5, 5)),
                final_score: 100,
            })]
        );
        assert_eq!(game.ticking(), None);
    }

    #[test]
    fn input_after_loss_is_a_no_op() {
        let mut game = game_on((10, 10), &[(5, 5)]);
        game.dispatch(Input::RevealAt((4, 4))).unwrap();
        game.dispatch(Input::RevealAt((5, 5))).unwrap();
        let id = game.session_id();

        assert!(game.dispatch(Input::RevealAt((0, 0))).unwrap().is_empty());
        assert!(game.dispatch(Input::ToggleFlagAt((0, 0))).unwrap().is_empty());
        assert!(game.dispatch(Input::Tick(id)).unwrap().is_empty());
        assert_eq!(game.session().score(), 100);
    }

    #[test]
    fn flag_events_carry_counter() {
        let mut game = game_on((3, 3), &[(2, 2)]);

        let events = game.dispatch(Input::ToggleFlagAt((0, 0))).unwrap();

        assert_eq!(
            events,
            vec![Event::FlagChanged {
                coords: (0, 0),
                state: CellState::Flagged,
                mines_left: 0,
            }]
        );
    }

    #[test]
    fn timeout_ends_the_session_once() {
        let mut game = game_on((5, 5), &[(2, 2)]);
        game.dispatch(Input::RevealAt((1, 1))).unwrap();
        let id = game.session_id();
        for _ in 0..19 {
            game.dispatch(Input::Tick(id)).unwrap();
        }

        let events = game.dispatch(Input::Tick(id)).unwrap();

        assert_eq!(
            events,
            vec![
                Event::TimeChanged(0),
                Event::Ended(Terminal::timed_out(100)),
            ]
        );
        assert!(game.dispatch(Input::Tick(id)).unwrap().is_empty());
    }
}
