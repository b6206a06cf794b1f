use eframe::egui::{
    self, Align2, Color32, FontId, Rect, Sense, Stroke, StrokeKind, Ui, pos2, vec2,
};

use crate::util::truncate_label;

use super::ViewModel;
use super::render_utils::{
    blend_color, classification_color, draw_background, screen_to_world, size_color, with_opacity,
    world_to_screen,
};
use super::sim::{CHILD_RADIUS, DragState, ExclusionZone, Hit};

const HEADER_BAND_HEIGHT: f32 = 46.0;
const LEGEND_WIDTH: f32 = 172.0;
const LEGEND_HEIGHT: f32 = 92.0;
const ZONE_PADDING: f32 = 8.0;

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);
        self.sim.set_bounds(rect.size() * 0.5);

        let header_rect = Rect::from_min_max(
            rect.left_top(),
            pos2(rect.right(), rect.top() + HEADER_BAND_HEIGHT),
        );
        let legend_rect = Rect::from_min_size(
            pos2(rect.left() + 12.0, rect.bottom() - 12.0 - LEGEND_HEIGHT),
            vec2(LEGEND_WIDTH, LEGEND_HEIGHT),
        );

        let mut zones = Vec::new();
        for overlay in [header_rect, legend_rect] {
            if let Some(zone) = ExclusionZone::new(
                screen_to_world(rect, overlay.min),
                screen_to_world(rect, overlay.max),
                ZONE_PADDING,
            ) {
                zones.push(zone);
            }
        }
        self.sim.set_zones(zones);

        let pointer_world = response
            .interact_pointer_pos()
            .map(|pos| screen_to_world(rect, pos));
        if response.drag_started() {
            if let Some(world) = pointer_world {
                self.sim.begin_drag(world);
            }
        } else if response.dragged() {
            if let Some(world) = pointer_world {
                self.sim.drag_to(world);
            }
        }

        let drag_active = !matches!(self.sim.drag(), DragState::Idle);
        let pointer_down = ui.input(|input| input.pointer.any_down());
        if drag_active && (response.drag_stopped() || !pointer_down) {
            // Covers the pointer leaving the window mid-drag; a node must
            // never stay pinned without a live pointer.
            self.sim.end_drag();
        }

        let hovered = if drag_active {
            None
        } else {
            ui.input(|input| input.pointer.hover_pos())
                .filter(|pos| rect.contains(*pos))
                .and_then(|pos| self.sim.hit_test(screen_to_world(rect, pos)))
        };

        let hover_anchor = match hovered {
            Some(Hit::Parent(index)) => Some(self.sim.nodes()[index].title.clone()),
            Some(Hit::Child { parent, .. }) => Some(self.sim.nodes()[parent].title.clone()),
            None => None,
        };
        self.sim.set_hovered(hover_anchor.as_deref());

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let layout_moving = self.sim.tick();
        if layout_moving || drag_active {
            ui.ctx().request_repaint();
        }

        let mut draw_order = (0..self.sim.nodes().len()).collect::<Vec<_>>();
        draw_order.sort_by(|a, b| {
            self.sim.nodes()[*b]
                .radius
                .total_cmp(&self.sim.nodes()[*a].radius)
        });

        for index in draw_order {
            let node = &self.sim.nodes()[index];
            let position = world_to_screen(rect, node.pos);

            let mut opacity = 1.0 - node.fade_in;
            if node.leaving {
                opacity *= node.fade_out;
            }
            let opacity = opacity.clamp(0.05, 1.0);

            let base = size_color(node.size);
            let fill = with_opacity(blend_color(base, Color32::from_rgb(19, 23, 29), 0.35), opacity);
            painter.circle_filled(position, node.radius, fill);

            if node.moving {
                painter.circle_stroke(
                    position,
                    node.radius + 3.0,
                    Stroke::new(2.0, with_opacity(base, opacity * 0.35)),
                );
            }

            let (stroke_width, stroke_color) = if node.pinned {
                (2.2, Color32::from_rgb(245, 206, 93))
            } else if node.hovered {
                (2.0, Color32::from_rgb(255, 164, 101))
            } else {
                (1.2, blend_color(base, Color32::WHITE, 0.25))
            };
            painter.circle_stroke(
                position,
                node.radius,
                Stroke::new(stroke_width, with_opacity(stroke_color, opacity)),
            );

            if node.radius >= 26.0 {
                painter.text(
                    position,
                    Align2::CENTER_CENTER,
                    truncate_label(&node.title, 18),
                    FontId::proportional(12.0),
                    with_opacity(Color32::from_gray(238), opacity),
                );
            }

            for (child_index, child) in node.children.iter().enumerate() {
                let child_screen =
                    world_to_screen(rect, self.sim.child_display_pos(index, child_index));
                let color = classification_color(child.opinion.classification);
                painter.circle_filled(child_screen, CHILD_RADIUS, with_opacity(color, opacity));
                painter.circle_stroke(
                    child_screen,
                    CHILD_RADIUS,
                    Stroke::new(1.0, with_opacity(Color32::from_gray(15), opacity * 0.8)),
                );
            }
        }

        if self.show_zone_overlay {
            for zone in self.sim.zones() {
                let overlay = Rect::from_min_max(
                    world_to_screen(rect, zone.min),
                    world_to_screen(rect, zone.max),
                );
                painter.rect_stroke(
                    overlay,
                    0.0,
                    Stroke::new(1.2, Color32::from_rgba_unmultiplied(106, 198, 255, 130)),
                    StrokeKind::Inside,
                );
            }
        }

        self.draw_header_band(&painter, header_rect);
        self.draw_legend(&painter, legend_rect);

        if let Some(hit) = hovered
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            let text = match hit {
                Hit::Parent(index) => {
                    let node = &self.sim.nodes()[index];
                    format!(
                        "{}  |  size {:.2}  |  {} opinions",
                        node.title,
                        node.size,
                        node.children.len()
                    )
                }
                Hit::Child { parent, child } => {
                    let node = &self.sim.nodes()[parent];
                    let opinion = &node.children[child].opinion;
                    format!(
                        "{} [{}]: {}",
                        opinion.name,
                        opinion.classification.label(),
                        truncate_label(&opinion.message, 90)
                    )
                }
            };
            painter.text(
                pointer + vec2(14.0, 18.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if self.sim.nodes().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "no suggestions yet",
                FontId::proportional(16.0),
                Color32::from_gray(140),
            );
        }
    }

    fn draw_header_band(&self, painter: &egui::Painter, band: Rect) {
        painter.rect_filled(band, 0.0, Color32::from_rgba_unmultiplied(12, 15, 20, 235));
        painter.text(
            band.left_center() + vec2(14.0, 0.0),
            Align2::LEFT_CENTER,
            "live consensus",
            FontId::proportional(16.0),
            Color32::from_gray(235),
        );
        painter.text(
            band.right_center() - vec2(14.0, 0.0),
            Align2::RIGHT_CENTER,
            format!(
                "{} suggestions  ·  {} opinions",
                self.suggestion_count, self.opinion_count
            ),
            FontId::proportional(13.0),
            Color32::from_gray(180),
        );
    }

    fn draw_legend(&self, painter: &egui::Painter, card: Rect) {
        painter.rect_filled(card, 6.0, Color32::from_rgba_unmultiplied(12, 15, 20, 225));
        painter.text(
            card.left_top() + vec2(12.0, 10.0),
            Align2::LEFT_TOP,
            "opinions",
            FontId::proportional(12.0),
            Color32::from_gray(170),
        );

        let rows = [
            (crate::feed::Classification::Good, "in favour"),
            (crate::feed::Classification::Neutral, "neutral"),
            (crate::feed::Classification::Bad, "against"),
        ];
        for (row, (classification, label)) in rows.into_iter().enumerate() {
            let y = card.top() + 34.0 + (row as f32 * 18.0);
            painter.circle_filled(
                pos2(card.left() + 18.0, y),
                5.0,
                classification_color(classification),
            );
            painter.text(
                pos2(card.left() + 30.0, y),
                Align2::LEFT_CENTER,
                label,
                FontId::proportional(12.0),
                Color32::from_gray(210),
            );
        }
    }
}
