mod api;
mod components;
mod coords;
mod pages;

use dioxus::prelude::*;

use pages::map_page::MapPage;
use pages::report_page::ReportPage;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    MapPage {},
    #[route("/report?:x&:y")]
    ReportPage { x: f64, y: f64 },
}

const CSS: Asset = asset!("/assets/main.css");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Title { "Dumpwatch" }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
