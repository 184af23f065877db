//! Obstacle detection between a ship and its next destination.

use engine_core::Vec3;

/// Bounding sphere of something in the way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

pub trait ObstacleSensor {
    /// First obstacle on the segment `from -> to`, if any.
    fn find_obstacle(&self, from: Vec3, to: Vec3) -> Option<Obstacle>;
}

/// Open space: nothing is ever in the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSpace;

impl ObstacleSensor for OpenSpace {
    fn find_obstacle(&self, _from: Vec3, _to: Vec3) -> Option<Obstacle> {
        None
    }
}

/// Spheres checked analytically, for scenarios without a physics world.
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleSensor for ObstacleField {
    fn find_obstacle(&self, from: Vec3, to: Vec3) -> Option<Obstacle> {
        let segment = to - from;
        let length = segment.length();
        if length < 1e-3 {
            return None;
        }
        let direction = segment / length;
        self.obstacles
            .iter()
            .filter_map(|obstacle| {
                let along = (obstacle.center - from).dot(direction).clamp(0.0, length);
                let closest = from + direction * along;
                (closest.distance(obstacle.center) <= obstacle.radius).then_some((along, *obstacle))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, obstacle)| obstacle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_reports_nearest_blocking_sphere() {
        let field = ObstacleField {
            obstacles: vec![
                Obstacle { center: Vec3::new(0.0, 0.0, -80.0), radius: 5.0 },
                Obstacle { center: Vec3::new(1.0, 0.0, -40.0), radius: 5.0 },
                Obstacle { center: Vec3::new(30.0, 0.0, -20.0), radius: 5.0 },
            ],
        };
        let hit = field.find_obstacle(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0)).unwrap();
        assert_eq!(hit.center, Vec3::new(1.0, 0.0, -40.0));
    }

    #[test]
    fn field_ignores_spheres_beyond_segment() {
        let field = ObstacleField {
            obstacles: vec![Obstacle { center: Vec3::new(0.0, 0.0, -80.0), radius: 5.0 }],
        };
        assert!(field.find_obstacle(Vec3::ZERO, Vec3::new(0.0, 0.0, -50.0)).is_none());
    }
}
