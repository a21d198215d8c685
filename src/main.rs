//=========================================================================
// Lumen Shell Demo
//
// Downloads one monospace font, then shows a single bordered button.
// Clicking the button logs an acknowledgement; Escape or closing the
// window quits.
//
// Logging: RUST_LOG overrides the default `info` filter, e.g.
//   RUST_LOG=assets=debug,runtime=info lumen-shell
//
//=========================================================================

use std::process::ExitCode;

use log::error;
use lumen_shell::prelude::*;

const FONT_URL: &str =
    "https://raw.githubusercontent.com/google/fonts/main/ufl/ubuntumono/UbuntuMono-Regular.ttf";
const FONT_KEY: &str = "UbuntuMono-Regular.ttf";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = ApplicationBuilder::new()
        .with_manifest(Manifest::new().font(FONT_URL))
        .with_entity(QuitOnEscape)
        .with_entity(Button::new(Rect::new(130, 70, 100, 40), "bųțțøñ", FONT_KEY).with_border(1))
        .build()
        .and_then(Application::run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(target: "runtime", "{}", e);
            ExitCode::FAILURE
        }
    }
}
