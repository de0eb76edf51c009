mod components;
mod engine;
mod error;
mod model;
mod state;
mod util;

use components::App;

fn main() {
    util::init_logging();
    yew::Renderer::<App>::new().render();
}
