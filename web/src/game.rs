use crate::utils::*;
use bitflags::bitflags;
use gloo::timers::callback::Interval;
use kalam_core::{CellView, Coord2, Event, Game, Input, Rules, SessionId, Terminal};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

/// Real-time length of one clock unit.
const TICK_MILLIS: u32 = 1000;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct TileState {
    pos: Coord2,
    buttons: MouseButtons,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum TileMsg {
    Update(TileState),
    Leave,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    TileEvent(TileMsg),
    Tick(SessionId),
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    pos: Coord2,
    view: CellView,
    #[prop_or_default]
    pressed: bool,
    callback: Callback<TileMsg>,
}

#[function_component(Tile)]
fn tile_component(props: &TileProps) -> Html {
    use CellView::*;

    let TileProps {
        pos,
        view,
        pressed,
        callback,
    } = props.clone();
    let mut class = classes!(
        "cell",
        match view {
            Concealed => classes!(),
            Flagged => classes!("flag"),
            Opened(count) => classes!("open", format!("num-{}", count)),
            Mine => classes!("mine"),
            Exploded => classes!("mine", "oops"),
        }
    );
    if pressed {
        class.push("open");
    }
    let label = match view {
        Opened(count) if count > 0 => count.to_string(),
        _ => String::new(),
    };

    let on_buttons = move |callback: Callback<TileMsg>| {
        Callback::from(move |e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            callback.emit(TileMsg::Update(TileState { pos, buttons }));
            log::trace!("{:?} buttons {:?}", pos, buttons);
        })
    };
    let onmousedown = on_buttons(callback.clone());
    let onmouseup = on_buttons(callback.clone());
    let onmouseleave = Callback::from(move |_: MouseEvent| callback.emit(TileMsg::Leave));

    html! {
        <td {class} {onmousedown} {onmouseup} {onmouseleave}>{label}</td>
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    #[prop_or_default]
    pub seed: Option<u64>,
}

pub(crate) struct GameView {
    game: Game,
    cur_tile_state: Option<TileState>,
    stage_notice: Option<String>,
    timer: Option<(SessionId, Interval)>,
}

impl GameView {
    fn dispatch(&mut self, ctx: &Context<Self>, input: Input) -> bool {
        let events = match self.game.dispatch(input) {
            Ok(events) => events,
            Err(err) => {
                log::error!("{:?} failed: {}", input, err);
                return false;
            }
        };

        let mut cleared = false;
        for event in &events {
            match *event {
                Event::Ended(Terminal { won: true, .. }) => cleared = true,
                Event::Ended(terminal) => log::info!("game over: {:?}", terminal),
                Event::StageStarted { stage, mines, .. } if cleared => {
                    self.stage_notice = Some(format!(
                        "Stage {} cleared! Preparing for stage {} with {} mines",
                        stage - 1,
                        stage,
                        mines
                    ));
                }
                Event::StageStarted { .. } => self.stage_notice = None,
                _ => {}
            }
        }

        self.sync_timer(ctx);
        !events.is_empty()
    }

    /// Keeps exactly one interval alive, for the session that currently wants ticks.
    fn sync_timer(&mut self, ctx: &Context<Self>) {
        let wanted = self.game.ticking();
        if self.timer.as_ref().map(|(id, _)| *id) == wanted {
            return;
        }

        // dropping the interval cancels it
        self.timer.take();
        self.timer = wanted.map(|id| {
            log::debug!("starting clock for session {:?}", id);
            let link = ctx.link().clone();
            let interval = Interval::new(TICK_MILLIS, move || link.send_message(Msg::Tick(id)));
            (id, interval)
        });
    }

    fn is_pressed(&self, coords: Coord2, view: CellView) -> bool {
        if !self.game.session().is_active() || view != CellView::Concealed {
            return false;
        }
        matches!(
            self.cur_tile_state,
            Some(TileState {
                pos,
                buttons: MouseButtons::LEFT,
            }) if pos == coords
        )
    }

    fn view_game_over(&self, ctx: &Context<Self>, terminal: Terminal) -> Html {
        let (title, reason) = if terminal.timed_out {
            ("TIME IS UP!", "You ran out of time!")
        } else {
            ("GAME OVER!", "You detonated a Kalam Bomb!")
        };
        let cb_new_game = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <dialog id="game-over" open={true}>
                <h2>{title}</h2>
                <p>{reason}</p>
                <p>{"Final score: "}<strong>{terminal.final_score.to_string()}</strong></p>
                <button onclick={cb_new_game}>{"Play again"}</button>
            </dialog>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        let game = Game::new(Rules::CLASSIC, seed).expect("classic rules are valid");
        Self {
            game,
            cur_tile_state: None,
            stage_notice: None,
            timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;
        use TileMsg::*;

        match msg {
            TileEvent(Leave) => self.cur_tile_state.take().is_some(),
            TileEvent(Update(tile_state)) if tile_state.buttons.is_empty() => {
                // every button was released over tile_state.pos, act on what was held before
                match self.cur_tile_state.take() {
                    Some(TileState { pos, buttons }) if pos == tile_state.pos => match buttons {
                        MouseButtons::LEFT => {
                            log::debug!("reveal: {:?}", pos);
                            self.dispatch(ctx, Input::RevealAt(pos));
                            true
                        }
                        MouseButtons::RIGHT => {
                            log::debug!("flag: {:?}", pos);
                            self.dispatch(ctx, Input::ToggleFlagAt(pos));
                            true
                        }
                        _ => true,
                    },
                    Some(_) => true,
                    None => false,
                }
            }
            TileEvent(Update(tile_state)) => {
                self.cur_tile_state.replace(tile_state) != Some(tile_state)
            }
            Tick(session) => self.dispatch(ctx, Input::Tick(session)),
            NewGame => {
                log::debug!("new game");
                self.dispatch(ctx, Input::NewGame)
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let snapshot = self.game.snapshot();
        let (rows, cols) = snapshot.size;
        let mines_left = format_for_counter(snapshot.mines_remaining.into());
        let time_left = format_time_left(snapshot.time_remaining);
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            Msg::NewGame
        });
        let state_class = match snapshot.terminal {
            None if snapshot.active => "in-progress",
            Some(Terminal { won: true, .. }) => "win",
            _ => "lose",
        };

        html! {
            <div class="kalam" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside title="stage">{format!("Stage {}", snapshot.stage)}</aside>
                    <aside title="mines left">{mines_left}</aside>
                    <span><button class={classes!(state_class)} onclick={cb_new_game}/></span>
                    <aside title="score">{snapshot.score.to_string()}</aside>
                    <aside title="time left">{time_left}</aside>
                </nav>
                if let Some(notice) = &self.stage_notice {
                    <p class="notice">{notice.clone()}</p>
                }
                <table>
                    {
                        for (0..rows).map(|row| html! {
                            <tr>
                                {
                                    for (0..cols).map(|col| {
                                        let pos = (row, col);
                                        let view = snapshot.cell(pos);
                                        let pressed = self.is_pressed(pos, view);
                                        let callback = ctx.link().callback(Msg::TileEvent);
                                        html! {
                                            <Tile {pos} {view} {pressed} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if let Some(terminal) = snapshot.terminal.filter(|terminal| !terminal.won) {
                    { self.view_game_over(ctx, terminal) }
                }
            </div>
        }
    }
}
