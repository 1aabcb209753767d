use std::path::PathBuf;

use anyhow::Result;
use eframe::egui;

mod app;
mod background;
mod session;
mod tools;

use app::MapmarkApp;

fn main() -> Result<()> {
    env_logger::init();

    // Usage: mapmark [image] [tool]. Both optional; an image that fails to
    // load is reported and the app starts with a blank surface, an unknown
    // tool key is ignored and the default marker stays active.
    let mut args = std::env::args().skip(1);
    let image = args.next().map(PathBuf::from);
    let tool = args.next();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_resizable(false)
            .with_title("Mapmark"),
        ..Default::default()
    };

    eframe::run_native(
        "mapmark",
        options,
        Box::new(move |_cc| Ok(Box::new(MapmarkApp::new(image, tool)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to run eframe: {err}"))
}
