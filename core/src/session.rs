use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Active (first reveal)
/// - Ready/Active -> Won
/// - Ready/Active -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the first reveal, the board may not exist yet
    Ready,
    Active,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Ready
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed(CellState),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RevealOutcome {
    #[default]
    NoChange,
    Revealed,
    HitMine,
    Won,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub reveal: Reveal,
}

/// One stage of play: board, mask, clock and the running score carried between stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    rules: Rules,
    stage: u32,
    mine_count: CellCount,
    score: u64,
    mines_left: i32,
    seed: u64,
    board: Option<Board>,
    mask: Mask,
    timer: Countdown,
    state: SessionState,
    terminal: Option<Terminal>,
}

impl GameSession {
    /// Fresh stage whose board is generated around the first reveal.
    pub fn new(rules: Rules, stage: u32, score: u64, seed: u64) -> Result<Self> {
        rules.validate()?;
        let stage = stage.max(1);
        let mine_count = rules.mines_for_stage(stage);

        Ok(Self {
            rules,
            stage,
            mine_count,
            score,
            mines_left: mine_count.into(),
            seed,
            board: None,
            mask: Mask::new(rules.size),
            timer: Countdown::new(rules.initial_time),
            state: SessionState::Ready,
            terminal: None,
        })
    }

    /// Stage played on a prepared board.
    ///
    /// Grid size and mine count of this stage come from the board, `rules` still drive the stages after it.
    pub fn with_board(rules: Rules, board: Board, stage: u32, score: u64) -> Self {
        let size = board.size();
        let mine_count = board.mine_count();

        Self {
            rules,
            stage: stage.max(1),
            mine_count,
            score,
            mines_left: mine_count.into(),
            seed: 0,
            board: Some(board),
            mask: Mask::new(size),
            timer: Countdown::new(rules.initial_time),
            state: SessionState::Ready,
            terminal: None,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn size(&self) -> Coord2 {
        self.mask.size()
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Mines minus flags, purely informational and negative when over-flagged.
    pub fn mines_left(&self) -> i32 {
        self.mines_left
    }

    pub fn time_remaining(&self) -> u32 {
        self.timer.remaining()
    }

    pub fn timer_state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_finished()
    }

    pub fn is_first_click(&self) -> bool {
        self.state.is_ready()
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn cell_view(&self, coords: Coord2) -> CellView {
        use CellState::*;

        let content = self.board.as_ref().and_then(|board| board.content(coords));
        let hit = self.terminal.and_then(|terminal| terminal.hit);
        match (self.mask.get(coords), content) {
            (Some(Opened), Some(Content::Mine)) if hit == Some(coords) => CellView::Exploded,
            (Some(Opened), Some(Content::Mine)) => CellView::Mine,
            (Some(Opened), Some(Content::Clear(count))) => CellView::Opened(count),
            (Some(Flagged), _) => CellView::Flagged,
            _ => CellView::Concealed,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_session(self)
    }

    pub fn reveal_at(&mut self, coords: Coord2) -> Result<RevealReport> {
        self.check_not_finished()?;

        if self.mask.get(coords) != Some(CellState::Concealed) {
            log::trace!("reveal at {:?} ignored", coords);
            return Ok(RevealReport::default());
        }

        if self.state.is_ready() {
            self.begin(coords)?;
        }

        let Some(board) = self.board.as_ref() else {
            return Ok(RevealReport::default());
        };

        if board.is_mine(coords) {
            self.lose(Some(coords));
            return Ok(RevealReport {
                outcome: RevealOutcome::HitMine,
                reveal: Reveal::default(),
            });
        }

        let reveal = reveal(board, &mut self.mask, coords, self.rules.cell_score);
        self.score = self.score.saturating_add(reveal.score_delta);
        if reveal.score_delta > 0 {
            self.timer.add_bonus(self.rules.time_bonus);
        }

        let outcome = if is_cleared(board, &self.mask) {
            self.win();
            RevealOutcome::Won
        } else if reveal.is_empty() {
            RevealOutcome::NoChange
        } else {
            RevealOutcome::Revealed
        };

        Ok(RevealReport { outcome, reveal })
    }

    pub fn toggle_flag_at(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.check_not_finished()?;

        Ok(match toggle_flag(&mut self.mask, coords) {
            Some(state) => {
                match state {
                    CellState::Flagged => self.mines_left -= 1,
                    CellState::Concealed => self.mines_left += 1,
                    CellState::Opened => {}
                }
                MarkOutcome::Changed(state)
            }
            None => MarkOutcome::NoChange,
        })
    }

    /// Advances the clock by one unit, a finished session ignores ticks.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_finished() {
            log::trace!("tick after stage {} ended", self.stage);
            return TickOutcome::Ignored;
        }

        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.lose(None);
        }
        outcome
    }

    /// Session for the following stage, keeping the score.
    pub fn next_stage(&self, seed: u64) -> Result<GameSession> {
        if self.state != SessionState::Won {
            return Err(GameError::StageNotCleared);
        }
        GameSession::new(self.rules, self.stage.saturating_add(1), self.score, seed)
    }

    fn begin(&mut self, first: Coord2) -> Result<()> {
        if self.board.is_none() {
            let generator = RandomBoardGenerator::new(self.seed, first);
            self.board = Some(generator.generate(self.rules.size, self.mine_count)?);
        }
        self.state = SessionState::Active;
        self.timer.start();
        log::debug!("stage {} started at {:?}", self.stage, first);
        Ok(())
    }

    fn win(&mut self) {
        self.state = SessionState::Won;
        self.timer.stop();
        self.terminal = Some(Terminal::cleared(self.score));
        log::info!("stage {} cleared with score {}", self.stage, self.score);
    }

    /// Ends the stage on a mine hit, or on a timeout when `hit` is `None`.
    fn lose(&mut self, hit: Option<Coord2>) {
        self.state = SessionState::Lost;
        self.timer.stop();
        if let Some(board) = &self.board {
            disclose_mines(board, &mut self.mask);
        }

        let terminal = match hit {
            Some(coords) => Terminal::hit_mine(coords, self.score),
            None => Terminal::timed_out(self.score),
        };
        self.terminal = Some(terminal);
        log::info!(
            "stage {} lost ({}), final score {}",
            self.stage,
            if terminal.timed_out { "time is up" } else { "mine hit" },
            self.score
        );
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
