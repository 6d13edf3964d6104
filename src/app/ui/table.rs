use eframe::egui::{self, RichText, Ui};

use crate::util::{format_timestamp, truncate_label};

use super::super::ViewModel;
use super::super::render_utils::{ROW_HEIGHT, TP_WIDTH, TS_WIDTH, draw_square};

fn fixed_cell(ui: &mut Ui, text: impl Into<egui::WidgetText>, width: f32) {
    ui.add_sized([width, ROW_HEIGHT], egui::Label::new(text));
}

impl ViewModel {
    pub(in crate::app) fn draw_table(&mut self, ui: &mut Ui) {
        let snapshot = self.reader.snapshot();
        let columns = self.controller.columns();
        let row_count = self.controller.store().len();

        if row_count == 0 {
            ui.label("The trace contains no time points.");
            return;
        }

        let mut clicked = None;

        egui::ScrollArea::horizontal()
            .id_salt("trace_columns")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    fixed_cell(ui, RichText::new("TP").strong(), TP_WIDTH);
                    fixed_cell(ui, RichText::new("TS").strong(), TS_WIDTH);
                    for column in &columns {
                        fixed_cell(
                            ui,
                            RichText::new(truncate_label(&column.label, 24)).strong(),
                            column.width_hint,
                        );
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("trace_rows")
                    .auto_shrink([false, false])
                    .show_rows(ui, ROW_HEIGHT, row_count, |ui, row_range| {
                        for tp in row_range {
                            let Ok(row) = self.controller.store().row_at(tp) else {
                                continue;
                            };

                            ui.horizontal(|ui| {
                                fixed_cell(ui, tp.to_string(), TP_WIDTH);
                                fixed_cell(ui, format_timestamp(row.ts), TS_WIDTH);

                                for column in &columns {
                                    let color = snapshot.read(tp, column.index);
                                    let is_root = column.index == 0;
                                    let response = draw_square(
                                        ui,
                                        color,
                                        column.width_hint,
                                        is_root,
                                        is_root && self.selected_tp == Some(tp),
                                    );
                                    if response.clicked() {
                                        clicked = Some((tp, column.index));
                                    }
                                    response.on_hover_text(format!(
                                        "{} at tp {tp}: {}",
                                        column.label,
                                        color.label()
                                    ));
                                }
                            });
                        }
                    });
            });

        if let Some((tp, column)) = clicked {
            self.handle_click(tp, column);
        }
    }
}
