use eframe::egui::{
    Color32, CursorIcon, Rect, Response, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::grid::CellColor;

pub(super) const ROW_HEIGHT: f32 = 22.0;
pub(super) const TP_WIDTH: f32 = 55.0;
pub(super) const TS_WIDTH: f32 = 70.0;

pub(super) fn cell_fill(color: CellColor) -> Color32 {
    match color {
        CellColor::Satisfied => Color32::from_rgb(46, 160, 67),
        CellColor::Violated => Color32::from_rgb(218, 54, 51),
        CellColor::Neutral => Color32::from_rgb(88, 96, 105),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_square(
    ui: &mut Ui,
    color: CellColor,
    width: f32,
    clickable: bool,
    selected: bool,
) -> Response {
    let sense = if clickable {
        Sense::click()
    } else {
        Sense::hover()
    };
    let (rect, response) = ui.allocate_exact_size(vec2(width, ROW_HEIGHT), sense);

    let side = (ROW_HEIGHT - 6.0).max(6.0);
    let square = Rect::from_center_size(rect.center(), vec2(side, side));
    let mut fill = cell_fill(color);
    if clickable && response.hovered() {
        fill = blend_color(fill, Color32::WHITE, 0.25);
    }

    let painter = ui.painter();
    painter.rect_filled(square, 2.0, fill);
    if selected {
        painter.rect_stroke(
            square,
            2.0,
            Stroke::new(1.5, Color32::from_rgb(235, 235, 240)),
            StrokeKind::Outside,
        );
    }

    if clickable {
        response.on_hover_cursor(CursorIcon::PointingHand)
    } else {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_colors_are_distinct() {
        let fills = [
            cell_fill(CellColor::Satisfied),
            cell_fill(CellColor::Violated),
            cell_fill(CellColor::Neutral),
        ];
        assert_ne!(fills[0], fills[1]);
        assert_ne!(fills[1], fills[2]);
        assert_ne!(fills[0], fills[2]);
    }

    #[test]
    fn blending_hits_both_ends() {
        let base = Color32::from_rgb(10, 20, 30);
        assert_eq!(blend_color(base, Color32::WHITE, 0.0), base);
        assert_eq!(blend_color(base, Color32::WHITE, 1.0), Color32::WHITE);
    }
}
