use minisnake_core::{GameConfig, Gate, HostError, short_address};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::game::GameView;
use crate::host;

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct AppProps {
    pub config: GameConfig,
    pub cell_size: u32,
    pub seed: Option<u64>,
    pub contract: Option<String>,
    pub guest: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Loaded(Option<String>),
    Connect,
    Connected(Result<Option<String>, HostError>),
}

/// Wallet gate in front of the game.
pub(crate) struct App {
    gate: Gate,
    last_error: Option<HostError>,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut gate = Gate::default();
        if ctx.props().guest {
            log::debug!("guest mode, skipping wallet");
            gate.open_as_guest();
        } else {
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(Msg::Loaded(host::existing_account().await));
            });
        }
        Self {
            gate,
            last_error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let before = self.gate.clone();
        match msg {
            Loaded(account) => self.gate.loaded(account),
            Connect => {
                if self.gate.begin_connect() {
                    self.last_error = None;
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        link.send_message(Connected(host::connect_wallet().await));
                    });
                }
            }
            Connected(result) => {
                if let Err(err) = &result {
                    self.last_error = Some(err.clone());
                }
                self.gate.finish_connect(result);
            }
        }

        if before != self.gate {
            log::debug!("gate: {:?} -> {:?}", before, self.gate);
            true
        } else {
            false
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        match &self.gate {
            Gate::Loading => html! {
                <div class="minisnake gate"><p aria-busy="true">{"Loading..."}</p></div>
            },
            Gate::Locked | Gate::Connecting => {
                let connecting = matches!(self.gate, Gate::Connecting);
                let onclick = ctx.link().callback(|_| Msg::Connect);
                html! {
                    <div class="minisnake gate">
                        <h1>{"Snake"}</h1>
                        <p>{"Connect your wallet to play"}</p>
                        <button {onclick} disabled={connecting} aria-busy={connecting.to_string()}>
                            { if connecting { "Connecting..." } else { "Connect Wallet" } }
                        </button>
                        if let Some(err) = &self.last_error {
                            <p class="error">{err.to_string()}</p>
                        }
                    </div>
                }
            }
            Gate::Open { address } => {
                let label = address
                    .as_deref()
                    .map_or_else(|| "Guest".to_string(), short_address);
                html! {
                    <div class="minisnake">
                        <header><small class="wallet">{label}</small></header>
                        <GameView
                            config={props.config}
                            cell_size={props.cell_size}
                            seed={props.seed}
                            contract={props.contract.clone()}
                            address={address.clone()}
                        />
                    </div>
                }
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        if first_render {
            host::signal_ready();
        }
    }
}
