use eframe::egui::{Vec2, vec2};

/// Axis-aligned no-go rectangle published by an overlay panel, stored with its
/// padding already folded into the extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExclusionZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl ExclusionZone {
    /// Zero-area rectangles are treated as "no active zone".
    pub fn new(min: Vec2, max: Vec2, padding: f32) -> Option<Self> {
        if max.x - min.x <= 0.0 || max.y - min.y <= 0.0 {
            return None;
        }

        let pad = vec2(padding.max(0.0), padding.max(0.0));
        Some(Self {
            min: min - pad,
            max: max + pad,
        })
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        vec2(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Corrected center position for a circle that intrudes into the zone, or
    /// `None` when the circle already clears it. Centers inside the rectangle
    /// exit through the nearest edge so a drag can never park a bubble inside.
    pub fn resolve(&self, pos: Vec2, radius: f32, margin: f32) -> Option<Vec2> {
        let keep_out = radius + margin;

        if self.contains(pos) {
            let left = pos.x - self.min.x;
            let right = self.max.x - pos.x;
            let top = pos.y - self.min.y;
            let bottom = self.max.y - pos.y;

            let nearest = left.min(right).min(top).min(bottom);
            let exit = if nearest == left {
                vec2(self.min.x - keep_out, pos.y)
            } else if nearest == right {
                vec2(self.max.x + keep_out, pos.y)
            } else if nearest == top {
                vec2(pos.x, self.min.y - keep_out)
            } else {
                vec2(pos.x, self.max.y + keep_out)
            };
            return Some(exit);
        }

        let closest = self.closest_point(pos);
        let delta = pos - closest;
        let distance = delta.length();
        if distance >= keep_out {
            return None;
        }

        let direction = if distance > 0.0001 {
            delta / distance
        } else {
            vec2(0.0, 1.0)
        };
        Some(closest + (direction * keep_out))
    }

    /// Cheapest correction that clears the zone and still fits the canvas.
    /// A plain nearest-edge exit can be clamped straight back into a zone
    /// that touches the canvas border, so every axis exit is considered.
    fn escape(&self, pos: Vec2, radius: f32, margin: f32, half_extent: Vec2) -> Vec2 {
        let keep_out = radius + margin;
        let candidates = [
            self.resolve(pos, radius, margin).unwrap_or(pos),
            vec2(self.min.x - keep_out, pos.y),
            vec2(self.max.x + keep_out, pos.y),
            vec2(pos.x, self.min.y - keep_out),
            vec2(pos.x, self.max.y + keep_out),
        ];

        let mut best: Option<(Vec2, f32)> = None;
        for candidate in candidates {
            let clamped = clamp_to_bounds(candidate, radius, half_extent);
            if self.resolve(clamped, radius, margin).is_some() {
                continue;
            }

            let cost = (clamped - pos).length_sq();
            if best.is_none_or(|(_, lowest)| cost < lowest) {
                best = Some((clamped, cost));
            }
        }

        best.map(|(corrected, _)| corrected)
            .unwrap_or_else(|| clamp_to_bounds(pos, radius, half_extent))
    }
}

/// Clamp a circle inside the canvas and outside every active zone.
pub fn constrain_position(
    pos: Vec2,
    radius: f32,
    margin: f32,
    half_extent: Vec2,
    zones: &[ExclusionZone],
) -> Vec2 {
    let mut corrected = clamp_to_bounds(pos, radius, half_extent);

    for zone in zones {
        if zone.resolve(corrected, radius, margin).is_some() {
            corrected = zone.escape(corrected, radius, margin, half_extent);
        }
    }

    corrected
}

pub fn clamp_to_bounds(pos: Vec2, radius: f32, half_extent: Vec2) -> Vec2 {
    let limit_x = (half_extent.x - radius).max(0.0);
    let limit_y = (half_extent.y - radius).max(0.0);
    vec2(pos.x.clamp(-limit_x, limit_x), pos.y.clamp(-limit_y, limit_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(min: (f32, f32), max: (f32, f32)) -> ExclusionZone {
        ExclusionZone::new(vec2(min.0, min.1), vec2(max.0, max.1), 0.0).unwrap()
    }

    #[test]
    fn degenerate_rectangles_are_no_zones() {
        assert!(ExclusionZone::new(vec2(0.0, 0.0), vec2(0.0, 50.0), 4.0).is_none());
        assert!(ExclusionZone::new(vec2(10.0, 10.0), vec2(5.0, 40.0), 4.0).is_none());
    }

    #[test]
    fn padding_inflates_the_rectangle() {
        let padded = ExclusionZone::new(vec2(0.0, 0.0), vec2(10.0, 10.0), 5.0).unwrap();
        assert!(padded.contains(vec2(-3.0, 5.0)));
    }

    #[test]
    fn clear_circle_is_left_alone() {
        let zone = zone((0.0, 0.0), (100.0, 40.0));
        assert_eq!(zone.resolve(vec2(150.0, 20.0), 30.0, 4.0), None);
    }

    #[test]
    fn intruding_circle_is_pushed_to_the_keep_out_distance() {
        let zone = zone((0.0, 0.0), (100.0, 40.0));
        let resolved = zone.resolve(vec2(50.0, 52.0), 20.0, 4.0).unwrap();
        let clearance = (resolved - zone.closest_point(resolved)).length();
        assert!((clearance - 24.0).abs() < 0.01);
    }

    #[test]
    fn interior_center_exits_through_the_nearest_edge() {
        let zone = zone((0.0, 0.0), (100.0, 40.0));
        let resolved = zone.resolve(vec2(8.0, 20.0), 10.0, 2.0).unwrap();
        assert!(resolved.x < 0.0);
        assert_eq!(zone.resolve(resolved, 10.0, 2.0), None);
    }

    #[test]
    fn constrain_respects_bounds_and_zones_together() {
        let zones = [zone((-200.0, -150.0), (-80.0, -60.0))];
        let half = vec2(200.0, 150.0);
        let corrected = constrain_position(vec2(-190.0, -140.0), 25.0, 4.0, half, &zones);

        assert!(corrected.x.abs() <= half.x - 25.0);
        assert!(corrected.y.abs() <= half.y - 25.0);
        for zone in &zones {
            assert!(zone.resolve(corrected, 25.0, 4.0).is_none());
        }
    }

    #[test]
    fn corner_zone_escape_stays_in_bounds_and_clear() {
        // Rectangle hugging the bottom-left corner, like an overlay card.
        let zones = [zone((-200.0, 60.0), (-20.0, 150.0))];
        let half = vec2(200.0, 150.0);
        let corrected = constrain_position(vec2(-180.0, 130.0), 30.0, 4.0, half, &zones);

        assert!(corrected.x.abs() <= half.x - 30.0);
        assert!(corrected.y.abs() <= half.y - 30.0);
        assert!(zones[0].resolve(corrected, 30.0, 4.0).is_none());
    }
}
