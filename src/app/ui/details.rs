use eframe::egui::{self, Color32, RichText, Ui};

use crate::grid::{CellColor, ClickOutcome};
use crate::trace::Verdict;
use crate::util::format_timestamp;

use super::super::ViewModel;
use super::super::render_utils::{cell_fill, draw_square};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Explanation Details");
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            for color in [CellColor::Satisfied, CellColor::Violated, CellColor::Neutral] {
                let _ = draw_square(ui, color, 24.0, false, false);
                ui.label(color.label());
            }
        });
        ui.separator();

        self.draw_selection(ui);

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(RichText::new("Notices").strong());
            if !self.notices.is_empty() && ui.small_button("Clear").clicked() {
                self.notices.clear();
            }
        });

        if self.notices.is_empty() {
            ui.label("Nothing to report.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("notices_scroll")
            .max_height(320.0)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for notice in &self.notices {
                    let text = RichText::new(notice.message.as_str());
                    if notice.is_error {
                        ui.label(text.color(cell_fill(CellColor::Violated)));
                    } else {
                        ui.label(text.color(Color32::from_rgb(214, 170, 64)));
                    }
                }
            });
    }

    fn draw_selection(&self, ui: &mut Ui) {
        let Some(tp) = self.selected_tp else {
            ui.label("Click a cell in the root formula column to trace its explanation.");
            return;
        };

        let Ok(row) = self.controller.store().row_at(tp) else {
            ui.label(format!("Time point {tp} is no longer part of the trace."));
            return;
        };

        let explanation = &row.explanation;
        let registry = self.controller.registry();
        let formula_label = registry
            .column_of(&explanation.formula_id, tp)
            .ok()
            .and_then(|column| registry.label(column))
            .unwrap_or(explanation.formula_id.as_str());

        ui.label(RichText::new(format!("Time point {tp}")).strong());
        ui.label(format!("Timestamp: {}", format_timestamp(row.ts)));
        ui.label(format!("Formula: {formula_label}"));
        ui.label(format!("Operator: {}", explanation.kind.label()));
        ui.label(format!(
            "Verdict: {}",
            explanation.verdict.map(Verdict::label).unwrap_or("unknown")
        ));
        ui.label(format!("Root cell: {}", self.controller.render_cell(tp, 0).label()));
        ui.label(format!("Proof nodes: {}", explanation.node_count()));
        ui.label(format!(
            "Grid revision: {}",
            self.controller.snapshot().revision()
        ));

        let Some(outcome) = &self.last_click else {
            return;
        };

        ui.add_space(6.0);
        match outcome {
            ClickOutcome::Applied {
                updates,
                changed,
                warnings,
                ..
            } => {
                ui.label(format!("Cells implied by this explanation: {updates}"));
                ui.label(format!("Cells recolored: {changed}"));
                if !warnings.is_empty() {
                    ui.label(format!("Skipped branches: {}", warnings.len()));
                }
            }
            ClickOutcome::Failed(error) => {
                ui.label(
                    RichText::new(format!("Propagation failed: {error}"))
                        .color(cell_fill(CellColor::Violated)),
                );
            }
            ClickOutcome::Busy => {
                ui.label("Click dropped while a previous one was processed.");
            }
            ClickOutcome::Ignored => {}
        }
    }
}
