use eframe::egui::{self, Align, Color32, Context, Layout};

use crate::util::truncate_label;

use super::super::{SimConfig, Simulation, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(source_label: String) -> Self {
        Self {
            sim: Simulation::new(SimConfig::default()),
            source_label,
            last_update: None,
            poll_failures: 0,
            last_error: None,
            show_zone_overlay: false,
            suggestion_count: 0,
            opinion_count: 0,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, disconnected: bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("consensus-bubbles");
                    ui.separator();
                    ui.label(format!("source: {}", self.source_label));
                    ui.label(format!("suggestions: {}", self.suggestion_count));
                    ui.label(format!("opinions: {}", self.opinion_count));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if disconnected {
                            ui.colored_label(
                                Color32::from_rgb(224, 102, 96),
                                "poll worker stopped",
                            );
                        }
                        if let Some(status) = self.poll_status_text() {
                            ui.label(status);
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_canvas(ui));
    }

    fn poll_status_text(&self) -> Option<String> {
        if let Some(error) = &self.last_error {
            return Some(format!(
                "poll failing ({}x): {}",
                self.poll_failures,
                truncate_label(error, 60)
            ));
        }

        match &self.last_update {
            Some(at) => Some(format!("updated {:.0}s ago", at.elapsed().as_secs_f32())),
            None => Some("waiting for first snapshot…".to_owned()),
        }
    }
}
