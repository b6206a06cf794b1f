use std::cmp::Ordering;
use std::collections::HashSet;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::feed::Suggestion;
use crate::util::stable_unit;

use super::Simulation;
use super::node::{CHILD_RADIUS, ChildNode, ORBIT_OFFSET, ParentNode, parent_radius};
use super::zones::constrain_position;

const SEED_RING_SPACING: f32 = 2.2;
const SLOT_JITTER_FRACTION: f32 = 0.2;

/// Each suggestion's children start at a reproducible per-title rotation so
/// clusters do not all orient identically.
fn start_rotation(title: &str) -> f32 {
    stable_unit(title) * TAU
}

/// Deterministic per-child offset, bounded to a fraction of the even slot
/// spacing, so orbits look organic without being random.
fn slot_jitter(id: &str, spacing: f32) -> f32 {
    ((stable_unit(id) * 2.0) - 1.0) * SLOT_JITTER_FRACTION * spacing
}

fn child_id(parent: &str, name: &str) -> String {
    format!("{parent}\u{1f}{name}")
}

impl Simulation {
    /// Diff a snapshot against the current node set. Larger suggestions are
    /// placed first; surviving nodes keep position and interaction flags and
    /// only refresh size and children. Returns true when anything changed.
    pub fn apply_snapshot(&mut self, suggestions: &[Suggestion]) -> bool {
        let mut ordered = suggestions.iter().collect::<Vec<_>>();
        ordered.sort_by(|a, b| {
            b.size
                .partial_cmp(&a.size)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.title.cmp(&b.title))
        });

        let mut changed = false;
        let mut seen = HashSet::new();
        for suggestion in ordered {
            if !seen.insert(suggestion.title.clone()) {
                continue;
            }

            match self.index_by_title.get(&suggestion.title).copied() {
                Some(index) => changed |= self.refresh_node(index, suggestion),
                None => {
                    self.spawn_node(suggestion);
                    changed = true;
                }
            }
        }

        // A node missing from one snapshot fades out; missing from a second
        // consecutive snapshot it is removed, children with it.
        let mut survivors = Vec::with_capacity(self.nodes.len());
        for mut node in std::mem::take(&mut self.nodes) {
            if seen.contains(&node.title) {
                survivors.push(node);
            } else if node.leaving {
                changed = true;
            } else {
                node.leaving = true;
                node.fade_out = 1.0;
                changed = true;
                survivors.push(node);
            }
        }
        self.nodes = survivors;
        self.rebuild_index();

        if changed {
            self.reheat();
            log::debug!(
                "reconciled snapshot: {} suggestions, {} nodes live",
                suggestions.len(),
                self.nodes.len()
            );
        }

        changed
    }

    fn refresh_node(&mut self, index: usize, suggestion: &Suggestion) -> bool {
        let half_extent = self.half_extent;
        let node = &mut self.nodes[index];
        let mut changed = false;

        let radius = parent_radius(suggestion.size, half_extent);
        if node.size != suggestion.size || node.radius != radius {
            node.size = suggestion.size;
            node.radius = radius;
            changed = true;
        }

        if node.leaving {
            node.leaving = false;
            node.fade_out = 0.0;
            changed = true;
        }

        let total = suggestion.people_opinions.len().max(1);
        let spacing = TAU / total as f32;
        let rotation = start_rotation(&node.title);

        let mut next_children = Vec::with_capacity(suggestion.people_opinions.len());
        for (slot, opinion) in suggestion.people_opinions.iter().enumerate() {
            if let Some(existing) = node.child_index(&opinion.name) {
                // Angle was assigned once at first sight and stays put.
                let mut child = node.children[existing].clone();
                if child.opinion != *opinion {
                    child.opinion = opinion.clone();
                    changed = true;
                }
                next_children.push(child);
            } else {
                let id = child_id(&node.title, &opinion.name);
                next_children.push(ChildNode {
                    name: opinion.name.clone(),
                    angle: (spacing * slot as f32) + rotation + slot_jitter(&id, spacing),
                    opinion: opinion.clone(),
                });
                changed = true;
            }
        }

        if next_children.len() != node.children.len() {
            changed = true;
        }
        node.children = next_children;

        changed
    }

    fn spawn_node(&mut self, suggestion: &Suggestion) {
        let radius = parent_radius(suggestion.size, self.half_extent);
        let insertion_index = self.spawned_total;
        self.spawned_total += 1;

        let pos = self.seed_position(insertion_index, radius, &suggestion.title);

        let total = suggestion.people_opinions.len().max(1);
        let spacing = TAU / total as f32;
        let rotation = start_rotation(&suggestion.title);
        let children = suggestion
            .people_opinions
            .iter()
            .enumerate()
            .map(|(slot, opinion)| {
                let id = child_id(&suggestion.title, &opinion.name);
                ChildNode {
                    name: opinion.name.clone(),
                    angle: (spacing * slot as f32) + rotation + slot_jitter(&id, spacing),
                    opinion: opinion.clone(),
                }
            })
            .collect();

        let index = self.nodes.len();
        self.index_by_title.insert(suggestion.title.clone(), index);
        self.nodes.push(ParentNode {
            title: suggestion.title.clone(),
            size: suggestion.size,
            radius,
            pos,
            velocity: Vec2::ZERO,
            pinned: false,
            hovered: false,
            moving: true,
            fade_in: 1.0,
            leaving: false,
            fade_out: 0.0,
            children,
        });
    }

    /// Expanding-ring seed: ring `⌊log2(i+1)⌋` holds `2^ring` evenly divided
    /// slots, at a radial distance scaled by the average full-extent radius of
    /// the nodes already present. Index 0 lands dead center.
    fn seed_position(&self, insertion_index: usize, radius: f32, title: &str) -> Vec2 {
        let base = if insertion_index == 0 {
            Vec2::ZERO
        } else {
            let ring = ((insertion_index + 1) as f32).log2().floor() as u32;
            let ring_start = (1usize << ring) - 1;
            let slots = 1usize << ring;
            let slot = insertion_index - ring_start;

            let average_extent = if self.nodes.is_empty() {
                radius + ORBIT_OFFSET + CHILD_RADIUS
            } else {
                self.nodes.iter().map(ParentNode::full_extent).sum::<f32>()
                    / self.nodes.len() as f32
            };

            let spacing = TAU / slots as f32;
            let angle = (spacing * slot as f32) + slot_jitter(title, spacing);
            let distance = ring as f32 * average_extent * SEED_RING_SPACING;
            vec2(angle.cos(), angle.sin()) * distance
        };

        constrain_position(
            base,
            radius,
            self.config.zone_margin,
            self.half_extent,
            &self.zones,
        )
    }

    fn rebuild_index(&mut self) {
        self.index_by_title.clear();
        for (index, node) in self.nodes.iter().enumerate() {
            self.index_by_title.insert(node.title.clone(), index);
        }
    }
}
