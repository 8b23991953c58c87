use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use minisnake_core::*;
use minisnake_core::TouchEvent;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use crate::canvas::CanvasSurface;
use crate::driver::FrameDriver;
use crate::host;
use crate::utils::js_random_seed;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start,
    Frame(f64),
    Key(String),
    Touch(TouchEvent),
    Pad(DPadButton),
    Share,
    Mint,
    DismissMint,
    MintProgress(MintStatus),
    ClearStatus,
}

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct GameProps {
    pub config: GameConfig,
    pub cell_size: u32,
    pub seed: Option<u64>,
    pub contract: Option<String>,
    pub address: Option<String>,
}

pub(crate) struct GameView {
    engine: GameEngine,
    game_loop: GameLoop,
    driver: FrameDriver,
    swipe: SwipeAdapter,
    canvas: NodeRef,
    palette: Palette,
    mint_prompt: bool,
    mint_status: MintStatus,
    _clear_status: Option<Timeout>,
    _key_listener: EventListener,
    _touch_listeners: Vec<EventListener>,
}

impl GameView {
    fn key_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new_with_options(
            &gloo::utils::window(),
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                // keep arrows from scrolling the page
                if KeyboardAdapter::direction_for_key(&key).is_some() {
                    event.prevent_default();
                }
                link.send_message(Msg::Key(key));
            },
        )
    }

    fn touch_listeners(&self, ctx: &Context<Self>) -> Vec<EventListener> {
        let Some(canvas) = self.canvas.cast::<HtmlCanvasElement>() else {
            log::error!("canvas not mounted, touch input disabled");
            return Vec::new();
        };

        ["touchstart", "touchmove", "touchend", "touchcancel"]
            .into_iter()
            .map(|kind| {
                let link = ctx.link().clone();
                EventListener::new_with_options(
                    &canvas,
                    kind,
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(event) = event.dyn_ref::<web_sys::TouchEvent>() else {
                            return;
                        };
                        event.prevent_default();
                        if let Some(touch) = to_touch(kind, event) {
                            link.send_message(Msg::Touch(touch));
                        }
                    },
                )
            })
            .collect()
    }

    fn paint(&self) {
        let Some(canvas) = self.canvas.cast::<HtmlCanvasElement>() else {
            return;
        };
        let Some(mut surface) = CanvasSurface::from_canvas(&canvas) else {
            log::error!("no 2d context on canvas");
            return;
        };
        draw(
            &self.engine.snapshot(),
            &mut surface,
            &self.palette,
            f64::from(canvas.width()) / f64::from(self.engine.config().grid_size),
        );
    }

    fn set_mint_status(&mut self, ctx: &Context<Self>, status: MintStatus) {
        self._clear_status = status.auto_clear_after_ms().map(|ms| {
            let link = ctx.link().clone();
            Timeout::new(ms, move || link.send_message(Msg::ClearStatus))
        });
        self.mint_status = status;
    }

    fn start_mint(&mut self, ctx: &Context<Self>) {
        if self.mint_status.is_busy() {
            return;
        }
        let props = ctx.props();
        let score = self.engine.score();

        let checks = props
            .address
            .clone()
            .ok_or(HostError::NoProvider)
            .and_then(|from| Ok((from, mint_contract(props.contract.as_deref())?.to_string())));
        let (from, contract) = match checks {
            Ok(ready) if score >= MINT_SCORE_THRESHOLD => ready,
            Ok(_) => return self.set_mint_status(ctx, MintStatus::Failed(HostError::ScoreTooLow)),
            Err(err) => {
                log::warn!("cannot mint: {}", err);
                return self.set_mint_status(ctx, MintStatus::Failed(err));
            }
        };

        log::debug!("minting score {} to {}", score, contract);
        let progress = ctx.link().callback(Msg::MintProgress);
        let link = ctx.link().clone();
        spawn_local(async move {
            let status = match host::mint_score(contract, from, score, progress).await {
                Ok(tx_hash) => MintStatus::Minted { tx_hash },
                Err(err) => MintStatus::Failed(err),
            };
            link.send_message(Msg::MintProgress(status));
        });
    }

    fn view_overlay(&self, ctx: &Context<Self>) -> Html {
        let phase = self.engine.phase();
        let snapshot = self.engine.snapshot();
        let on_start = ctx.link().callback(|_| Msg::Start);

        match phase {
            Phase::Running => html! {},
            Phase::Idle => html! {
                <div class="overlay">
                    <button class="start" onclick={on_start}>{"Start Game"}</button>
                </div>
            },
            Phase::GameOver => html! {
                <div class="overlay">
                    <h2>{"Game Over"}</h2>
                    <p>{format!("Score: {}", snapshot.score)}</p>
                    if snapshot.is_new_high_score() {
                        <mark class="new-best">{"New best!"}</mark>
                    }
                    if self.mint_prompt {
                        { self.view_mint_prompt(ctx) }
                    }
                    { self.view_mint_status() }
                    <footer>
                        <button class="start" onclick={on_start}>{"Play Again"}</button>
                        <button class="secondary" onclick={ctx.link().callback(|_| Msg::Share)}>
                            {"Share Score"}
                        </button>
                    </footer>
                </div>
            },
        }
    }

    fn view_mint_prompt(&self, ctx: &Context<Self>) -> Html {
        let busy = self.mint_status.is_busy();
        html! {
            <article class="mint-prompt">
                <p>{"Mint your score as an NFT?"}</p>
                <button onclick={ctx.link().callback(|_| Msg::Mint)} disabled={busy} aria-busy={busy.to_string()}>
                    {"Mint NFT"}
                </button>
                <button class="secondary" onclick={ctx.link().callback(|_| Msg::DismissMint)} disabled={busy}>
                    {"Maybe later"}
                </button>
            </article>
        }
    }

    fn view_mint_status(&self) -> Html {
        if self.mint_status.is_idle() {
            return html! {};
        }
        let class = classes!(
            "mint-status",
            matches!(self.mint_status, MintStatus::Failed(_)).then_some("error")
        );
        html! {
            <p {class}>
                {self.mint_status.message()}
                if let Some(tx_hash) = self.mint_status.tx_hash() {
                    {" "}
                    <a href={explorer_tx_url(tx_hash)} target="_blank" rel="noopener">{"View transaction"}</a>
                }
            </p>
        }
    }

    fn view_dpad(&self, ctx: &Context<Self>) -> Html {
        html! {
            <nav class="dpad">
                {
                    for DPadButton::ALL.into_iter().map(|button| {
                        let onclick = ctx.link().callback(move |_| Msg::Pad(button));
                        let class = classes!("pad", format!("{:?}", button).to_lowercase());
                        html! { <button {class} {onclick}>{button.label()}</button> }
                    })
                }
            </nav>
        }
    }
}

/// Converts a DOM touch event into the adapter's event, using the first changed touch.
fn to_touch(kind: &str, event: &web_sys::TouchEvent) -> Option<TouchEvent> {
    if kind == "touchcancel" {
        return Some(TouchEvent::Cancel);
    }
    let touch = event.changed_touches().get(0)?;
    let (x, y) = (f64::from(touch.client_x()), f64::from(touch.client_y()));
    let t = event.time_stamp();
    match kind {
        "touchstart" => Some(TouchEvent::Start { x, y, t }),
        "touchmove" => Some(TouchEvent::Move { x, y, t }),
        "touchend" => Some(TouchEvent::End { x, y }),
        _ => None,
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("food seed: {}", seed);

        Self {
            engine: GameEngine::seeded(props.config, seed),
            game_loop: GameLoop::default(),
            driver: FrameDriver::new(ctx.link().callback(Msg::Frame)),
            swipe: SwipeAdapter::default(),
            canvas: NodeRef::default(),
            palette: Palette::default(),
            mint_prompt: false,
            mint_status: MintStatus::Idle,
            _clear_status: None,
            _key_listener: GameView::key_listener(ctx),
            _touch_listeners: Vec::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start => {
                if self.mint_status.is_busy() {
                    log::debug!("mint in flight, start ignored");
                    return false;
                }
                self.engine.start();
                self.game_loop.reset();
                self.swipe = SwipeAdapter::default();
                self.mint_prompt = false;
                self.set_mint_status(ctx, MintStatus::Idle);
                self.driver.arm();
                true
            }
            Frame(timestamp) => {
                let report = self.game_loop.frame(&mut self.engine, timestamp);
                if self.engine.phase().is_running() {
                    self.driver.arm();
                } else {
                    self.driver.stop();
                }
                if let Some(crash) = report.crash {
                    let snapshot = self.engine.snapshot();
                    log::info!("game over ({:?}), score {}", crash, snapshot.score);
                    self.mint_prompt = snapshot.should_offer_mint();
                }
                report.has_update()
            }
            Key(key) => {
                let outcome = route_input(&mut KeyboardAdapter, &mut self.engine, key.as_str());
                log::trace!("key {:?}: {:?}", key, outcome);
                false
            }
            Touch(touch) => {
                let outcome = route_input(&mut self.swipe, &mut self.engine, touch);
                log::trace!("touch {:?}: {:?}", touch, outcome);
                false
            }
            Pad(button) => {
                let outcome = route_input(&mut ButtonAdapter, &mut self.engine, button);
                log::trace!("pad {:?}: {:?}", button, outcome);
                false
            }
            Share => {
                host::share_score(self.engine.score());
                false
            }
            Mint => {
                self.start_mint(ctx);
                true
            }
            DismissMint => {
                self.mint_prompt = false;
                true
            }
            MintProgress(status) => {
                log::debug!("mint status: {:?}", status);
                self.set_mint_status(ctx, status);
                true
            }
            ClearStatus => {
                if matches!(self.mint_status, MintStatus::Minted { .. }) {
                    self.mint_prompt = false;
                }
                self.set_mint_status(ctx, MintStatus::Idle);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let config = self.engine.config();
        let size = canvas_size(config.grid_size, ctx.props().cell_size);

        html! {
            <div class="snake">
                <nav class="scores">
                    <span>{format!("Score: {}", self.engine.score())}</span>
                    <span>{format!("Best: {}", self.engine.high_score())}</span>
                </nav>
                <div class="board">
                    <canvas ref={self.canvas.clone()} width={size.to_string()} height={size.to_string()}/>
                    { self.view_overlay(ctx) }
                </div>
                { self.view_dpad(ctx) }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self._touch_listeners = self.touch_listeners(ctx);
        }
        self.paint();
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.driver.stop();
    }
}
