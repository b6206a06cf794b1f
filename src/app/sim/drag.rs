use eframe::egui::Vec2;

use super::Simulation;
use super::node::CHILD_RADIUS;
use super::zones::constrain_position;

/// Invisible hit ring around every circle so near-misses still grab.
const HIT_RING_SLOP: f32 = 6.0;

/// One active drag subject per pointer, keyed by node identity.
#[derive(Clone, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Parent {
        title: String,
    },
    Child {
        parent: String,
        child: String,
        pointer: Vec2,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Parent(usize),
    Child { parent: usize, child: usize },
}

impl Simulation {
    /// Children render on top of parents and win the hit test.
    pub fn hit_test(&self, world: Vec2) -> Option<Hit> {
        let mut best_child: Option<(Hit, f32)> = None;
        let mut best_parent: Option<(Hit, f32)> = None;

        for (parent_index, node) in self.nodes.iter().enumerate() {
            for (child_index, child) in node.children.iter().enumerate() {
                let distance = (node.child_pos(child) - world).length();
                if distance <= CHILD_RADIUS + HIT_RING_SLOP
                    && best_child.is_none_or(|(_, best)| distance < best)
                {
                    best_child = Some((
                        Hit::Child {
                            parent: parent_index,
                            child: child_index,
                        },
                        distance,
                    ));
                }
            }

            let distance = (node.pos - world).length();
            if distance <= node.radius + HIT_RING_SLOP
                && best_parent.is_none_or(|(_, best)| distance < best)
            {
                best_parent = Some((Hit::Parent(parent_index), distance));
            }
        }

        best_child.or(best_parent).map(|(hit, _)| hit)
    }

    /// Pointer-down with no resolvable subject is a no-op.
    pub fn begin_drag(&mut self, world: Vec2) -> bool {
        match self.hit_test(world) {
            Some(Hit::Parent(index)) => {
                let title = self.nodes[index].title.clone();
                self.nodes[index].pinned = true;
                self.drag = DragState::Parent { title };
                self.alpha_target = self.config.drag_heat;
                self.reheat();
                self.drag_to(world);
                true
            }
            Some(Hit::Child {
                parent,
                child,
            }) => {
                self.drag = DragState::Child {
                    parent: self.nodes[parent].title.clone(),
                    child: self.nodes[parent].children[child].name.clone(),
                    pointer: world,
                };
                self.alpha_target = self.config.drag_heat;
                self.reheat();
                true
            }
            None => false,
        }
    }

    pub fn drag_to(&mut self, world: Vec2) {
        match &mut self.drag {
            DragState::Idle => {}
            DragState::Parent { title } => {
                let title = title.clone();
                if let Some(&index) = self.index_by_title.get(&title) {
                    let node = &mut self.nodes[index];
                    node.pos = constrain_position(
                        world,
                        node.radius,
                        self.config.zone_margin,
                        self.half_extent,
                        &self.zones,
                    );
                    node.velocity = Vec2::ZERO;
                }
            }
            DragState::Child { pointer, .. } => {
                *pointer = world;
            }
        }
    }

    /// Release or abort: clear the pin/spring and let the layout cool.
    pub fn end_drag(&mut self) {
        if let DragState::Parent { title } = &self.drag
            && let Some(&index) = self.index_by_title.get(title.as_str())
        {
            self.nodes[index].pinned = false;
        }

        self.drag = DragState::Idle;
        self.alpha_target = 0.0;
        self.alpha = self.alpha.max(0.3);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ExclusionZone, SimConfig};
    use super::*;
    use crate::feed::{Classification, PersonOpinion, Suggestion};
    use eframe::egui::vec2;

    fn suggestion(title: &str, size: f32, opinions: &[&str]) -> Suggestion {
        Suggestion {
            title: title.to_owned(),
            size,
            people_opinions: opinions
                .iter()
                .map(|name| PersonOpinion {
                    name: (*name).to_owned(),
                    profile_pic_url: String::new(),
                    message: "fine".to_owned(),
                    classification: Classification::Neutral,
                })
                .collect(),
        }
    }

    #[test]
    fn pointer_down_on_empty_space_is_a_no_op() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.apply_snapshot(&[suggestion("only", 0.5, &[])]);

        assert!(!sim.begin_drag(vec2(500.0, 300.0)));
        assert_eq!(*sim.drag(), DragState::Idle);
    }

    #[test]
    fn parent_drag_pins_follows_and_releases() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.apply_snapshot(&[suggestion("held", 0.5, &[])]);
        let start = sim.node_by_title("held").unwrap().pos;

        assert!(sim.begin_drag(start));
        assert!(sim.node_by_title("held").unwrap().pinned);

        sim.drag_to(vec2(120.0, 80.0));
        assert_eq!(sim.node_by_title("held").unwrap().pos, vec2(120.0, 80.0));

        sim.end_drag();
        assert!(!sim.node_by_title("held").unwrap().pinned);
        assert_eq!(*sim.drag(), DragState::Idle);
    }

    #[test]
    fn dragged_parent_never_enters_an_exclusion_zone() {
        let mut sim = Simulation::new(SimConfig::default());
        let zone = ExclusionZone::new(vec2(100.0, -50.0), vec2(260.0, 50.0), 8.0).unwrap();
        sim.set_zones(vec![zone]);
        sim.apply_snapshot(&[suggestion("held", 0.5, &[])]);

        let start = sim.node_by_title("held").unwrap().pos;
        assert!(sim.begin_drag(start));

        // Sweep the pointer straight through the rectangle.
        for step in 0..24 {
            let x = -60.0 + (step as f32 * 20.0);
            sim.drag_to(vec2(x, 0.0));

            let node = sim.node_by_title("held").unwrap();
            assert!(!zone.contains(node.pos));
            let clearance = (node.pos - zone.closest_point(node.pos)).length();
            assert!(
                clearance >= node.radius,
                "bubble dipped into the zone at sweep step {step}"
            );
        }
    }

    #[test]
    fn dragged_parent_stays_inside_the_canvas() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.apply_snapshot(&[suggestion("held", 0.5, &[])]);
        let start = sim.node_by_title("held").unwrap().pos;
        sim.begin_drag(start);

        sim.drag_to(vec2(10_000.0, -10_000.0));
        let node = sim.node_by_title("held").unwrap();
        let half = sim.half_extent();
        assert!(node.pos.x <= half.x - node.radius);
        assert!(node.pos.y >= -(half.y - node.radius));
    }

    #[test]
    fn child_drag_installs_a_spring_that_pulls_the_parent() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.apply_snapshot(&[suggestion("orbit", 0.5, &["fan"])]);

        let (child_pos, start) = {
            let node = sim.node_by_title("orbit").unwrap();
            (node.child_pos(&node.children[0]), node.pos)
        };

        assert!(sim.begin_drag(child_pos));
        assert!(matches!(*sim.drag(), DragState::Child { .. }));
        // The parent keeps its own body; only the spring moves it.
        assert!(!sim.node_by_title("orbit").unwrap().pinned);

        let target = vec2(200.0, 140.0);
        sim.drag_to(target);
        assert_eq!(sim.child_display_pos(0, 0), target);

        for _ in 0..40 {
            sim.tick();
        }

        let node = sim.node_by_title("orbit").unwrap();
        assert!(
            (node.pos - target).length() < (start - target).length(),
            "parent should follow the dragged child"
        );

        sim.end_drag();
        assert_eq!(*sim.drag(), DragState::Idle);
    }

    #[test]
    fn drag_survives_its_subject_disappearing() {
        let mut sim = Simulation::new(SimConfig::default());
        sim.apply_snapshot(&[suggestion("ghost", 0.5, &[]), suggestion("stay", 0.5, &[])]);
        let start = sim.node_by_title("ghost").unwrap().pos;
        sim.begin_drag(start);

        // Two consecutive snapshots without the dragged node remove it.
        sim.apply_snapshot(&[suggestion("stay", 0.5, &[])]);
        sim.apply_snapshot(&[suggestion("stay", 0.5, &[])]);

        sim.drag_to(vec2(50.0, 50.0));
        sim.end_drag();
        assert_eq!(*sim.drag(), DragState::Idle);
    }
}
