mod app;
mod error;
mod grid;
mod trace;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::grid::ExplanationTraversal;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Monitor trace in JSON form.
    #[arg(default_value = "trace.json")]
    trace: PathBuf,

    /// Deepest explanation nesting followed when propagating a click.
    #[arg(long, default_value_t = ExplanationTraversal::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 820.0)]
    height: f32,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height]),
        ..Default::default()
    };

    eframe::run_native(
        "verdict-grid",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::VerdictGridApp::new(
                cc,
                args.trace.clone(),
                args.max_depth,
            )))
        }),
    )
}
