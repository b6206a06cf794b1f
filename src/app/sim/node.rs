use eframe::egui::{Vec2, vec2};

use crate::feed::PersonOpinion;

pub const CHILD_RADIUS: f32 = 9.0;
pub const ORBIT_OFFSET: f32 = 22.0;

/// Bubble radius is a pure function of the consensus size and the current
/// canvas bounds; the reconciler recomputes it, the simulator never touches it.
pub fn parent_radius(size: f32, half_extent: Vec2) -> f32 {
    let min_dim = half_extent.x.min(half_extent.y).max(1.0) * 2.0;
    (min_dim * (0.045 + (0.085 * size.clamp(0.0, 1.0)))).clamp(16.0, 120.0)
}

#[derive(Clone, Debug)]
pub struct ParentNode {
    pub title: String,
    pub size: f32,
    pub radius: f32,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub pinned: bool,
    pub hovered: bool,
    pub moving: bool,
    pub fade_in: f32,
    pub leaving: bool,
    pub fade_out: f32,
    pub children: Vec<ChildNode>,
}

#[derive(Clone, Debug)]
pub struct ChildNode {
    pub name: String,
    pub angle: f32,
    pub opinion: PersonOpinion,
}

impl ParentNode {
    pub fn orbit_radius(&self) -> f32 {
        self.radius + ORBIT_OFFSET
    }

    /// Radius of the full footprint including the orbiting children.
    pub fn full_extent(&self) -> f32 {
        if self.children.is_empty() {
            self.radius
        } else {
            self.orbit_radius() + CHILD_RADIUS
        }
    }

    pub fn child_pos(&self, child: &ChildNode) -> Vec2 {
        self.pos + (vec2(child.angle.cos(), child.angle.sin()) * self.orbit_radius())
    }

    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|child| child.name == name)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
