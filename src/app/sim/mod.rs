mod drag;
mod forces;
mod node;
mod reconcile;
mod zones;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

pub use drag::{DragState, Hit};
pub use node::{CHILD_RADIUS, ChildNode, ORBIT_OFFSET, ParentNode, parent_radius};
pub use zones::{ExclusionZone, clamp_to_bounds, constrain_position};

const FADE_TICKS: f32 = 40.0;

/// Empirically tuned force constants. The binding contract is the set of
/// layout invariants (no overlap, zone compliance, bounded settling), not
/// these exact numbers; the control panel exposes them live.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    pub collision_strength: f32,
    pub collision_iterations: usize,
    pub child_collision_strength: f32,
    pub child_transfer: f32,
    pub repulsion_strength: f32,
    pub repulsion_min_distance: f32,
    pub repulsion_max_distance: f32,
    pub center_pull: f32,
    pub axis_pull: f32,
    pub drag_spring: f32,
    pub velocity_decay: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub drag_heat: f32,
    pub zone_margin: f32,
    pub hover_freeze_margin: f32,
    pub settle_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            collision_strength: 0.25,
            collision_iterations: 4,
            child_collision_strength: 0.3,
            child_transfer: 0.5,
            repulsion_strength: 2600.0,
            repulsion_min_distance: 24.0,
            repulsion_max_distance: 420.0,
            center_pull: 0.012,
            axis_pull: 0.004,
            drag_spring: 0.16,
            velocity_decay: 0.7,
            alpha_decay: 0.1,
            alpha_min: 0.003,
            drag_heat: 0.3,
            zone_margin: 4.0,
            hover_freeze_margin: 48.0,
            settle_speed: 0.08,
        }
    }
}

/// Owned simulation state: single writer per turn (tick or the active drag),
/// read by the view between ticks.
pub struct Simulation {
    pub config: SimConfig,
    nodes: Vec<ParentNode>,
    index_by_title: HashMap<String, usize>,
    half_extent: Vec2,
    zones: Vec<ExclusionZone>,
    drag: DragState,
    alpha: f32,
    alpha_target: f32,
    spawned_total: usize,
    force_scratch: Vec<Vec2>,
    shift_scratch: Vec<Vec2>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            index_by_title: HashMap::new(),
            half_extent: vec2(640.0, 400.0),
            zones: Vec::new(),
            drag: DragState::Idle,
            alpha: 0.0,
            alpha_target: 0.0,
            spawned_total: 0,
            force_scratch: Vec::new(),
            shift_scratch: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[ParentNode] {
        &self.nodes
    }

    pub fn node_by_title(&self, title: &str) -> Option<&ParentNode> {
        self.index_by_title
            .get(title)
            .and_then(|&index| self.nodes.get(index))
    }

    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    pub fn zones(&self) -> &[ExclusionZone] {
        &self.zones
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn settled(&self) -> bool {
        self.alpha < self.config.alpha_min && matches!(self.drag, DragState::Idle)
    }

    pub fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Radii are a function of size and bounds, so a resize recomputes every
    /// radius and perturbs the layout.
    pub fn set_bounds(&mut self, half_extent: Vec2) {
        if (half_extent - self.half_extent).length() < 1.0 {
            return;
        }

        self.half_extent = half_extent;
        for node in &mut self.nodes {
            node.radius = parent_radius(node.size, half_extent);
        }
        if !self.nodes.is_empty() {
            self.reheat();
        }
    }

    /// Latest-known rectangles, replaced wholesale each frame.
    pub fn set_zones(&mut self, zones: Vec<ExclusionZone>) {
        if zones != self.zones {
            self.zones = zones;
            if !self.nodes.is_empty() {
                self.alpha = self.alpha.max(0.3);
            }
        }
    }

    pub fn set_hovered(&mut self, title: Option<&str>) {
        for node in &mut self.nodes {
            node.hovered = Some(node.title.as_str()) == title;
        }
    }

    /// Where a child renders right now: the pointer override while it is
    /// dragged, its orbital slot otherwise.
    pub fn child_display_pos(&self, parent_index: usize, child_index: usize) -> Vec2 {
        let parent = &self.nodes[parent_index];
        let child = &parent.children[child_index];

        if let DragState::Child {
            parent: drag_parent,
            child: drag_child,
            pointer,
        } = &self.drag
            && drag_parent == &parent.title
            && drag_child == &child.name
        {
            return *pointer;
        }

        parent.child_pos(child)
    }

    /// Advance the layout one fixed step. Returns true while anything is
    /// still in motion so the host knows to keep scheduling frames.
    pub fn tick(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        let cfg = self.config;
        let dragging = !matches!(self.drag, DragState::Idle);
        if !dragging && self.alpha < cfg.alpha_min {
            for node in &mut self.nodes {
                node.moving = false;
            }
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * cfg.alpha_decay;

        let frozen = self.hover_frozen_mask();
        let immovable = self
            .nodes
            .iter()
            .zip(frozen.iter())
            .map(|(node, &frozen)| node.pinned || frozen)
            .collect::<Vec<_>>();
        let held = self
            .nodes
            .iter()
            .zip(frozen.iter())
            .filter_map(|(node, &frozen)| (frozen && !node.pinned).then_some(node.pos))
            .collect::<Vec<_>>();

        let n = self.nodes.len();
        self.force_scratch.clear();
        self.force_scratch.resize(n, Vec2::ZERO);

        forces::accumulate_repulsion(
            &self.nodes,
            &mut self.force_scratch,
            cfg.repulsion_strength,
            cfg.repulsion_min_distance,
            cfg.repulsion_max_distance,
            self.alpha,
        );
        forces::accumulate_centering(
            &self.nodes,
            &mut self.force_scratch,
            cfg.center_pull,
            cfg.axis_pull,
            self.alpha,
        );
        self.accumulate_drag_spring();

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if immovable[index] {
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity =
                (node.velocity + self.force_scratch[index]) * (1.0 - cfg.velocity_decay);
            node.pos += node.velocity;
        }

        forces::resolve_parent_collisions(
            &mut self.nodes,
            &immovable,
            cfg.collision_strength,
            cfg.collision_iterations,
            &mut self.shift_scratch,
        );
        forces::resolve_child_collisions(
            &mut self.nodes,
            &immovable,
            cfg.child_collision_strength,
            cfg.child_transfer,
            &mut self.shift_scratch,
        );

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if frozen[index] && !node.pinned {
                continue;
            }

            for zone in &self.zones {
                if zone.contains(node.pos) {
                    // Recovery fallback: a center trapped inside a zone heads
                    // back toward the canvas center.
                    let toward_center = if node.pos.length() > 0.0001 {
                        -node.pos / node.pos.length()
                    } else {
                        vec2(0.0, 1.0)
                    };
                    node.velocity += toward_center * 2.0;
                }
            }

            node.pos = constrain_position(
                node.pos,
                node.radius,
                cfg.zone_margin,
                self.half_extent,
                &self.zones,
            );
        }

        let mut held_iter = held.into_iter();
        for (node, &frozen) in self.nodes.iter_mut().zip(frozen.iter()) {
            if frozen && !node.pinned {
                if let Some(pos) = held_iter.next() {
                    node.pos = pos;
                }
                node.velocity = Vec2::ZERO;
            }
        }

        let mut any_motion = false;
        for node in &mut self.nodes {
            node.moving = !node.pinned && node.speed() > cfg.settle_speed;
            if node.moving {
                any_motion = true;
            }

            node.fade_in = (node.fade_in - (1.0 / FADE_TICKS)).max(0.0);
            if node.leaving {
                node.fade_out = (node.fade_out - (1.0 / FADE_TICKS)).max(0.0);
            }
        }

        any_motion || dragging || self.alpha >= cfg.alpha_min
    }

    /// The hovered node and anything within its extended radius hold still so
    /// the layout cannot drift under the pointer.
    fn hover_frozen_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.nodes.len()];

        if let Some(hovered) = self.nodes.iter().position(|node| node.hovered) {
            let anchor = &self.nodes[hovered];
            for (index, node) in self.nodes.iter().enumerate() {
                let reach = anchor.radius + node.radius + self.config.hover_freeze_margin;
                if index == hovered || (node.pos - anchor.pos).length() < reach {
                    mask[index] = true;
                }
            }
        }

        mask
    }

    fn accumulate_drag_spring(&mut self) {
        let DragState::Child {
            parent,
            child,
            pointer,
        } = &self.drag
        else {
            return;
        };

        let Some(&parent_index) = self.index_by_title.get(parent) else {
            return;
        };
        let node = &self.nodes[parent_index];
        let Some(child_index) = node.child_index(child) else {
            return;
        };

        // The parent is pulled so the dragged child's orbital slot lands on
        // the pointer; weaker than a pin, so the parent visibly follows.
        let angle = node.children[child_index].angle;
        let orbit = vec2(angle.cos(), angle.sin()) * node.orbit_radius();
        let target = *pointer - orbit;
        self.force_scratch[parent_index] += (target - node.pos) * self.config.drag_spring;
    }
}
