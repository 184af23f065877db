//! Ray queries used for obstacle detection along a ship's course.

use crate::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Result of a raycast query.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The collider that was hit.
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
    /// Surface normal at the hit point.
    pub normal: Vec3,
}

/// An obstacle found between two points.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleHit {
    pub hit: RaycastHit,
    /// Center of the obstacle's bounding sphere.
    pub center: Vec3,
    /// Radius of the obstacle's bounding sphere.
    pub radius: f32,
}

impl PhysicsWorld {
    /// Cast a ray against fixed geometry only and return the first hit.
    pub fn raycast_obstacles(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        let filter = QueryFilter::only_fixed();

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(collider, intersection)| {
                let point = ray.point_at(intersection.time_of_impact);
                RaycastHit {
                    collider,
                    distance: intersection.time_of_impact,
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(
                        intersection.normal.x,
                        intersection.normal.y,
                        intersection.normal.z,
                    ),
                }
            })
    }

    /// First obstacle on the segment `from -> to`, with its bounding sphere.
    pub fn find_obstacle(&self, from: Vec3, to: Vec3) -> Option<ObstacleHit> {
        let direction = to - from;
        let distance = direction.length();
        if distance < 0.001 {
            return None;
        }

        let hit = self.raycast_obstacles(from, direction / distance, distance)?;
        let collider = self.collider_set.get(hit.collider)?;
        let sphere = collider.shape().compute_local_bounding_sphere();
        let local_center = sphere.center();
        let center = collider.position() * local_center;
        Some(ObstacleHit {
            hit,
            center: Vec3::new(center.x, center.y, center.z),
            radius: sphere.radius(),
        })
    }

    /// Check if there's a clear line of sight between two points.
    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        self.find_obstacle(from, to).is_none()
    }
}
