use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::{self, Context};
use log::error;

use crate::grid::{ClickOutcome, GridReader, InteractionController};
use crate::trace::{LoadedTrace, load_trace};

mod render_utils;
mod ui;

pub struct VerdictGridApp {
    trace_path: PathBuf,
    max_depth: usize,
    state: AppState,
    pending: Option<PendingLoad>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedTrace, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoadKind {
    Refresh,
    Append,
}

struct PendingLoad {
    kind: LoadKind,
    rx: Receiver<Result<LoadedTrace, String>>,
}

struct ViewModel {
    controller: InteractionController,
    reader: GridReader,
    selected_tp: Option<usize>,
    last_click: Option<ClickOutcome>,
    notices: VecDeque<Notice>,
}

struct Notice {
    message: String,
    is_error: bool,
}

impl VerdictGridApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, trace_path: PathBuf, max_depth: usize) -> Self {
        let state = Self::start_load(trace_path.clone());
        Self {
            trace_path,
            max_depth,
            state,
            pending: None,
        }
    }

    fn spawn_load(trace_path: PathBuf) -> Receiver<Result<LoadedTrace, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_trace(&trace_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(trace_path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(trace_path),
        }
    }
}

impl eframe::App for VerdictGridApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(trace) => AppState::Ready(Box::new(ViewModel::new(
                            InteractionController::new(trace, self.max_depth),
                        ))),
                        Err(message) => {
                            error!("{message}");
                            AppState::Error(message)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading monitor trace...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load monitor trace");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.trace_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut requested = None;
                let is_loading = self.pending.is_some();
                model.show(ctx, &self.trace_path, &mut requested, is_loading);

                if let Some(kind) = requested
                    && self.pending.is_none()
                {
                    self.pending = Some(PendingLoad {
                        kind,
                        rx: Self::spawn_load(self.trace_path.clone()),
                    });
                }

                if let Some(pending) = self.pending.take() {
                    match pending.rx.try_recv() {
                        Ok(Ok(trace)) => model.finish_load(pending.kind, trace),
                        Ok(Err(message)) => {
                            error!("{message}");
                            match pending.kind {
                                LoadKind::Refresh => transition = Some(AppState::Error(message)),
                                LoadKind::Append => model.push_notice(message, true),
                            }
                        }
                        Err(TryRecvError::Empty) => {
                            self.pending = Some(pending);
                            ctx.request_repaint_after(Duration::from_millis(100));
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.pending = None;
            self.state = next_state;
        }
    }
}
