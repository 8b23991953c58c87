use clap::Parser;
use minisnake_core::{Coord, DEFAULT_CELL_SIZE, GameConfig};
use wasm_bindgen::prelude::*;

mod app;
mod canvas;
mod driver;
mod game;
mod host;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a food seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cells per side of the board
    #[arg(short, long, default_value_t = GameConfig::DEFAULT_GRID_SIZE)]
    grid: Coord,

    /// Size of one cell in pixels
    #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE)]
    cell: u32,

    /// Address of the score NFT contract
    #[arg(long)]
    contract: Option<String>,

    /// Skip the wallet gate
    #[arg(long)]
    guest: bool,
}

#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    // the first item is the program name for clap, the empty string before `#` fills that role
    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("{:?}", args);

    let props = app::AppProps {
        config: GameConfig::with_grid_size(args.grid),
        cell_size: args.cell.max(1),
        seed: args.seed,
        contract: args.contract,
        guest: args.guest,
    };

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::info!("App started");
    yew::Renderer::<app::App>::with_root_and_props(root, props).render();
}
