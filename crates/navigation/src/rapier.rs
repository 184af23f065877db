//! Glue between the navigation core and the rapier physics world.

use engine_core::{Quat, Vec3};
use physics::{PhysicsWorld, RigidBodyHandle};

use crate::hull::ShipHull;
use crate::obstacle::{Obstacle, ObstacleSensor};

/// A ship body in a [`PhysicsWorld`], borrowed for one tick.
pub struct RapierHull<'w> {
    world: &'w mut PhysicsWorld,
    body: RigidBodyHandle,
}

impl<'w> RapierHull<'w> {
    pub fn new(world: &'w mut PhysicsWorld, body: RigidBodyHandle) -> Self {
        Self { world, body }
    }
}

impl ShipHull for RapierHull<'_> {
    fn position(&self) -> Vec3 {
        self.world.body_position(self.body)
    }

    fn rotation(&self) -> Quat {
        self.world.body_rotation(self.body)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.world.set_body_rotation(self.body, rotation);
    }

    fn velocity(&self) -> Vec3 {
        self.world.body_velocity(self.body)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.world.set_body_velocity(self.body, velocity);
    }

    fn set_force(&mut self, force: Vec3) {
        self.world.set_body_force(self.body, force);
    }

    fn set_drag(&mut self, drag: f32) {
        self.world.set_body_drag(self.body, drag);
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.world.set_body_enabled(self.body, !frozen);
    }
}

/// Obstacle checks against the fixed colliders of a [`PhysicsWorld`].
///
/// The world's query pipeline must be current; the simulator refreshes it
/// after every physics step.
pub struct PhysicsObstacleSensor<'w> {
    world: &'w PhysicsWorld,
}

impl<'w> PhysicsObstacleSensor<'w> {
    pub fn new(world: &'w PhysicsWorld) -> Self {
        Self { world }
    }
}

impl ObstacleSensor for PhysicsObstacleSensor<'_> {
    fn find_obstacle(&self, from: Vec3, to: Vec3) -> Option<Obstacle> {
        self.world.find_obstacle(from, to).map(|hit| Obstacle {
            center: hit.center,
            radius: hit.radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_writes_reach_the_body() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_ship_body(Vec3::ZERO, Quat::IDENTITY, 2.0, 1.0, 1.0);
        {
            let mut hull = RapierHull::new(&mut world, body);
            hull.set_velocity(Vec3::new(0.0, 0.0, -3.0));
            hull.set_drag(10.0);
            hull.set_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
            assert!((hull.heading() - -Vec3::X).length() < 1e-4);
        }
        assert_eq!(world.body_velocity(body), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(world.body_drag(body), 10.0);
    }

    #[test]
    fn sensor_sees_fixed_obstacles_only() {
        let mut world = PhysicsWorld::new();
        world.add_obstacle(Vec3::new(0.0, 0.0, -50.0), 10.0);
        world.add_ship_body(Vec3::new(0.0, 0.0, -20.0), Quat::IDENTITY, 1.0, 1.0, 2.0);
        world.update_query_pipeline();

        let sensor = PhysicsObstacleSensor::new(&world);
        let obstacle = sensor
            .find_obstacle(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0))
            .unwrap();
        assert!((obstacle.center - Vec3::new(0.0, 0.0, -50.0)).length() < 1e-3);
        assert!((obstacle.radius - 10.0).abs() < 1e-3);
        assert!(sensor.find_obstacle(Vec3::ZERO, Vec3::new(0.0, 0.0, -30.0)).is_none());
    }
}
