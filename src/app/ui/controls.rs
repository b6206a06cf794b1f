use eframe::egui::{self, Slider, Ui};

use crate::util::truncate_label;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("forces");
        ui.add_space(4.0);

        let mut changed = false;
        {
            let config = &mut self.sim.config;
            changed |= ui
                .add(Slider::new(&mut config.repulsion_strength, 400.0..=8000.0).text("repulsion"))
                .changed();
            changed |= ui
                .add(Slider::new(&mut config.collision_strength, 0.05..=0.6).text("collision"))
                .changed();
            changed |= ui
                .add(Slider::new(&mut config.center_pull, 0.0..=0.05).text("centering"))
                .changed();
            changed |= ui
                .add(Slider::new(&mut config.velocity_decay, 0.3..=0.95).text("velocity decay"))
                .changed();
            changed |= ui
                .add(Slider::new(&mut config.drag_spring, 0.02..=0.5).text("child-drag spring"))
                .changed();
        }
        if changed {
            self.sim.reheat();
        }

        ui.add_space(8.0);
        ui.checkbox(&mut self.show_zone_overlay, "show exclusion zones");
        if ui.button("Reheat layout").clicked() {
            self.sim.reheat();
        }

        ui.separator();
        ui.heading("suggestions");
        ui.add_space(4.0);

        let mut rows = self
            .sim
            .nodes()
            .iter()
            .map(|node| (node.title.clone(), node.size, node.children.len()))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (title, size, opinions) in rows {
                ui.add(
                    egui::ProgressBar::new(size)
                        .text(format!("{} · {opinions}", truncate_label(&title, 28))),
                );
                ui.add_space(2.0);
            }
        });
    }
}
