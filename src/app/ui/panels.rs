use std::collections::VecDeque;
use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};
use log::{info, warn};

use crate::grid::{ClickOutcome, InteractionController, InteractionState};
use crate::trace::LoadedTrace;
use crate::util::truncate_label;

use super::super::{LoadKind, Notice, ViewModel};

impl ViewModel {
    pub(in crate::app) const NOTICE_LIMIT: usize = 64;

    pub(in crate::app) fn new(controller: InteractionController) -> Self {
        let reader = controller.reader();
        Self {
            controller,
            reader,
            selected_tp: None,
            last_click: None,
            notices: VecDeque::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        trace_path: &Path,
        requested: &mut Option<LoadKind>,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("verdict-grid");
                    ui.separator();
                    ui.label(format!("trace: {}", trace_path.display()));
                    let root = self.controller.registry().root();
                    ui.label(format!("formula: {}", truncate_label(&root.label, 48)))
                        .on_hover_text(format!("{} (id `{}`)", root.label, root.id));
                    ui.label(format!("time points: {}", self.controller.store().len()));
                    ui.label(format!("columns: {}", self.controller.registry().len()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let refresh = ui
                            .add_enabled(!is_loading, egui::Button::new("Refresh"))
                            .on_hover_text("Reload the trace file and start over.");
                        if refresh.clicked() {
                            *requested = Some(LoadKind::Refresh);
                        }

                        let append = ui
                            .add_enabled(!is_loading, egui::Button::new("Append"))
                            .on_hover_text("Append new events from the trace file.");
                        if append.clicked() {
                            *requested = Some(LoadKind::Append);
                        }

                        let reset = ui
                            .button("Reset")
                            .on_hover_text("Clear propagated verdicts.");
                        if reset.clicked() {
                            self.reset();
                        }

                        if is_loading {
                            ui.spinner();
                        }
                        if self.controller.state() == InteractionState::Processing {
                            ui.label("processing...");
                        }
                    });
                });
            });

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_table(ui));
    }

    pub(in crate::app) fn handle_click(&mut self, tp: usize, column: usize) {
        let outcome = self.controller.click(tp, column);

        match &outcome {
            ClickOutcome::Ignored => return,
            ClickOutcome::Busy => {
                self.push_notice(format!("Click on tp {tp} dropped while busy"), false);
            }
            ClickOutcome::Applied { warnings, .. } => {
                for warning in warnings {
                    self.push_notice(warning.to_string(), false);
                }
            }
            ClickOutcome::Failed(error) => {
                self.push_notice(error.to_string(), error.is_fatal_for_click());
            }
        }

        self.selected_tp = Some(tp);
        self.last_click = Some(outcome);
    }

    pub(in crate::app) fn reset(&mut self) {
        self.controller.reset();
        self.selected_tp = None;
        self.last_click = None;
    }

    pub(in crate::app) fn finish_load(&mut self, kind: LoadKind, trace: LoadedTrace) {
        match kind {
            LoadKind::Refresh => {
                self.controller.refresh(trace);
                self.selected_tp = None;
                self.last_click = None;
                self.notices.clear();
                self.push_notice(
                    format!(
                        "Trace refreshed: {} time points",
                        self.controller.store().len()
                    ),
                    false,
                );
            }
            LoadKind::Append => match self.controller.append(trace) {
                Ok(added) => {
                    self.push_notice(format!("Appended {added} time points"), false);
                }
                Err(error) => {
                    warn!("append failed: {error:#}");
                    self.push_notice(format!("Append failed: {error:#}"), true);
                }
            },
        }
    }

    pub(in crate::app) fn push_notice(&mut self, message: String, is_error: bool) {
        info!("notice: {message}");
        self.notices.push_front(Notice { message, is_error });
        self.notices.truncate(Self::NOTICE_LIMIT);
    }
}
