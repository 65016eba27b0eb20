use dioxus::prelude::*;

mod api;
mod components;
mod config;
mod diagnostics;
mod utils;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    if let Err(err) = dioxus::logger::init(level) {
        eprintln!("failed to initialise logging: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Music Tracks" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
