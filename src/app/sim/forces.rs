use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::node::{CHILD_RADIUS, ParentNode};

pub(super) const COLLISION_PADDING: f32 = 2.0;

/// Coincident centers get a deterministic separation axis so collision
/// resolution never divides by zero.
fn separation_direction(delta: Vec2, distance: f32, a: usize, b: usize) -> Vec2 {
    if distance > 0.0001 {
        delta / distance
    } else {
        let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU;
        vec2(angle.cos(), angle.sin())
    }
}

pub(super) fn accumulate_repulsion(
    nodes: &[ParentNode],
    forces: &mut [Vec2],
    strength: f32,
    min_distance: f32,
    max_distance: f32,
    alpha: f32,
) {
    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = nodes[i].pos - nodes[j].pos;
            let distance = delta.length();
            if distance > max_distance {
                continue;
            }

            let direction = separation_direction(delta, distance, i, j);
            let clamped_sq = distance.max(min_distance).powi(2);

            forces[i] += direction * (strength * nodes[j].radius * alpha / clamped_sq);
            forces[j] -= direction * (strength * nodes[i].radius * alpha / clamped_sq);
        }
    }
}

pub(super) fn accumulate_centering(
    nodes: &[ParentNode],
    forces: &mut [Vec2],
    center_pull: f32,
    axis_pull: f32,
    alpha: f32,
) {
    for (node, force) in nodes.iter().zip(forces.iter_mut()) {
        *force -= node.pos * (center_pull * alpha);
        force.x -= node.pos.x * (axis_pull * alpha);
        force.y -= node.pos.y * (axis_pull * alpha);
    }
}

/// Pairwise parent separation on actual bubble radii. Positional correction,
/// split symmetrically; pinned or frozen nodes absorb nothing and push the
/// full correction onto the other body.
pub(super) fn resolve_parent_collisions(
    nodes: &mut [ParentNode],
    immovable: &[bool],
    strength: f32,
    iterations: usize,
    scratch: &mut Vec<Vec2>,
) {
    let n = nodes.len();
    for _ in 0..iterations {
        scratch.clear();
        scratch.resize(n, Vec2::ZERO);

        for i in 0..n {
            for j in (i + 1)..n {
                if immovable[i] && immovable[j] {
                    continue;
                }

                let delta = nodes[i].pos - nodes[j].pos;
                let distance = delta.length();
                let min_distance = nodes[i].radius + nodes[j].radius + COLLISION_PADDING;
                if distance >= min_distance {
                    continue;
                }

                let direction = separation_direction(delta, distance, i, j);
                let push = (min_distance - distance) * strength;

                if immovable[i] {
                    scratch[j] -= direction * push;
                } else if immovable[j] {
                    scratch[i] += direction * push;
                } else {
                    scratch[i] += direction * (push * 0.5);
                    scratch[j] -= direction * (push * 0.5);
                }
            }
        }

        for (node, shift) in nodes.iter_mut().zip(scratch.iter()) {
            node.pos += *shift;
        }
    }
}

/// Children never move on their own; every child violation is corrected
/// through the parents involved.
pub(super) fn resolve_child_collisions(
    nodes: &mut [ParentNode],
    immovable: &[bool],
    strength: f32,
    transfer: f32,
    scratch: &mut Vec<Vec2>,
) {
    let n = nodes.len();
    scratch.clear();
    scratch.resize(n, Vec2::ZERO);

    for a in 0..n {
        for child_index in 0..nodes[a].children.len() {
            let child_pos = nodes[a].child_pos(&nodes[a].children[child_index]);

            for b in 0..n {
                if b == a || (immovable[a] && immovable[b]) {
                    continue;
                }

                // Child against the other parent's actual circle.
                let delta = child_pos - nodes[b].pos;
                let distance = delta.length();
                let min_distance = CHILD_RADIUS + nodes[b].radius + COLLISION_PADDING;
                if distance < min_distance {
                    let direction = separation_direction(delta, distance, a, b);
                    let push = (min_distance - distance) * strength;
                    if immovable[a] {
                        scratch[b] -= direction * push;
                    } else if immovable[b] {
                        scratch[a] += direction * push;
                    } else {
                        scratch[a] += direction * (push * 0.5);
                        scratch[b] -= direction * (push * 0.5);
                    }
                }

                // Child against the other parent's children, correction
                // transferred fractionally to each owner.
                if b <= a {
                    continue;
                }
                for other_index in 0..nodes[b].children.len() {
                    let other_pos = nodes[b].child_pos(&nodes[b].children[other_index]);
                    let delta = child_pos - other_pos;
                    let distance = delta.length();
                    let min_distance = (CHILD_RADIUS * 2.0) + COLLISION_PADDING;
                    if distance >= min_distance {
                        continue;
                    }

                    let direction =
                        separation_direction(delta, distance, a + child_index, b + other_index);
                    let push = (min_distance - distance) * strength * transfer;
                    if immovable[a] {
                        scratch[b] -= direction * push;
                    } else if immovable[b] {
                        scratch[a] += direction * push;
                    } else {
                        scratch[a] += direction * (push * 0.5);
                        scratch[b] -= direction * (push * 0.5);
                    }
                }
            }
        }
    }

    for (node, shift) in nodes.iter_mut().zip(scratch.iter()) {
        node.pos += *shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Classification, PersonOpinion};
    use crate::app::sim::node::ChildNode;

    fn node(title: &str, pos: Vec2, radius: f32) -> ParentNode {
        ParentNode {
            title: title.to_owned(),
            size: 0.5,
            radius,
            pos,
            velocity: Vec2::ZERO,
            pinned: false,
            hovered: false,
            moving: false,
            fade_in: 0.0,
            leaving: false,
            fade_out: 0.0,
            children: Vec::new(),
        }
    }

    fn child(name: &str, angle: f32) -> ChildNode {
        ChildNode {
            name: name.to_owned(),
            angle,
            opinion: PersonOpinion {
                name: name.to_owned(),
                profile_pic_url: String::new(),
                message: "ok".to_owned(),
                classification: Classification::Neutral,
            },
        }
    }

    #[test]
    fn overlapping_pair_separates_symmetrically() {
        let mut nodes = vec![
            node("a", vec2(-5.0, 0.0), 30.0),
            node("b", vec2(5.0, 0.0), 30.0),
        ];
        let immovable = [false, false];
        let mut scratch = Vec::new();

        resolve_parent_collisions(&mut nodes, &immovable, 0.25, 4, &mut scratch);

        let gap = (nodes[0].pos - nodes[1].pos).length();
        assert!(gap > 10.0, "pair should have moved apart, gap {gap}");
        assert!((nodes[0].pos.x + nodes[1].pos.x).abs() < 0.001);
    }

    #[test]
    fn coincident_centers_get_a_finite_separation() {
        let mut nodes = vec![
            node("a", Vec2::ZERO, 24.0),
            node("b", Vec2::ZERO, 24.0),
        ];
        let immovable = [false, false];
        let mut scratch = Vec::new();

        resolve_parent_collisions(&mut nodes, &immovable, 0.25, 4, &mut scratch);

        assert!(nodes[0].pos.x.is_finite() && nodes[0].pos.y.is_finite());
        assert!((nodes[0].pos - nodes[1].pos).length() > 0.0);
    }

    #[test]
    fn immovable_node_absorbs_no_correction() {
        let pinned_pos = vec2(0.0, 0.0);
        let mut nodes = vec![
            node("pinned", pinned_pos, 30.0),
            node("free", vec2(20.0, 0.0), 30.0),
        ];
        let immovable = [true, false];
        let mut scratch = Vec::new();

        resolve_parent_collisions(&mut nodes, &immovable, 0.25, 4, &mut scratch);

        assert_eq!(nodes[0].pos, pinned_pos);
        assert!(nodes[1].pos.x > 20.0);
    }

    #[test]
    fn child_overlap_moves_the_parents_not_the_child() {
        let mut a = node("a", Vec2::ZERO, 30.0);
        a.children.push(child("op", 0.0));
        let child_x = a.child_pos(&a.children[0]).x;
        let b = node("b", vec2(child_x + 5.0, 0.0), 30.0);

        let mut nodes = vec![a, b];
        let immovable = [false, false];
        let mut scratch = Vec::new();

        resolve_child_collisions(&mut nodes, &immovable, 0.3, 0.5, &mut scratch);

        assert_eq!(nodes[0].children[0].angle, 0.0);
        assert!(nodes[0].pos.x < 0.0);
        assert!(nodes[1].pos.x > child_x + 5.0);
    }

    #[test]
    fn repulsion_respects_the_interaction_range() {
        let nodes = vec![
            node("a", vec2(-500.0, 0.0), 20.0),
            node("b", vec2(500.0, 0.0), 20.0),
        ];
        let mut forces = vec![Vec2::ZERO; 2];

        accumulate_repulsion(&nodes, &mut forces, 2600.0, 24.0, 420.0, 1.0);
        assert_eq!(forces[0], Vec2::ZERO);

        let close = vec![
            node("a", vec2(-40.0, 0.0), 20.0),
            node("b", vec2(40.0, 0.0), 20.0),
        ];
        accumulate_repulsion(&close, &mut forces, 2600.0, 24.0, 420.0, 1.0);
        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
    }
}
