//! Physics world management with Rapier3D.
//!
//! Ships are dynamic bodies in zero gravity. Their rotations are locked so the
//! only writer of orientation is the helm (via [`PhysicsWorld::set_body_rotation`]);
//! their linear damping is the hull's drag.

use crate::collision::CollisionGroup;
use engine_core::{Quat, Transform, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

fn groups((membership, filter): (Group, Group)) -> InteractionGroups {
    InteractionGroups::new(membership, filter)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_rotation(rot: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with no gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration timestep in seconds.
    pub fn set_timestep(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Update query pipeline for ray casts made before the first step.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a ship hull: a dynamic body with locked rotations, `mass` and
    /// linear damping `drag`, plus a massless ball collider of `radius`.
    pub fn add_ship_body(
        &mut self,
        position: Vec3,
        rotation: Quat,
        mass: f32,
        drag: f32,
        radius: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .additional_mass(mass)
            .linear_damping(drag)
            .lock_rotations()
            .can_sleep(false)
            .build();
        let body_handle = self.rigid_body_set.insert(rigid_body);
        if let Some(body) = self.rigid_body_set.get_mut(body_handle) {
            body.set_rotation(to_rotation(rotation), true);
        }
        let collider = ColliderBuilder::ball(radius)
            .density(0.0)
            .collision_groups(groups(CollisionGroup::ship()))
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        log::debug!("Added ship hull at {:?} (mass {}, drag {})", position, mass, drag);
        (body_handle, collider_handle)
    }

    /// Add a fixed spherical obstacle (planet, station, asteroid).
    pub fn add_obstacle(&mut self, position: Vec3, radius: f32) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(to_vector(position))
            .collision_groups(groups(CollisionGroup::obstacle()))
            .build();
        log::debug!("Added obstacle at {:?} (radius {})", position, radius);
        self.collider_set.insert(collider)
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| Transform {
            position: from_vector(body.translation()),
            rotation: from_rotation(body.rotation()),
        })
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Vec3 {
        self.rigid_body_set
            .get(handle)
            .map_or(Vec3::ZERO, |body| from_vector(body.translation()))
    }

    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Quat {
        self.rigid_body_set
            .get(handle)
            .map_or(Quat::IDENTITY, |body| from_rotation(body.rotation()))
    }

    /// Teleport a body's orientation. Rotations are locked, so this is the only
    /// way a ship turns.
    pub fn set_body_rotation(&mut self, handle: RigidBodyHandle, rotation: Quat) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_rotation(to_rotation(rotation), true);
        }
    }

    /// Linear velocity in units per second.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Vec3 {
        self.rigid_body_set
            .get(handle)
            .map_or(Vec3::ZERO, |body| from_vector(body.linvel()))
    }

    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(velocity), true);
        }
    }

    /// Replace the persistent force acting on a body.
    pub fn set_body_force(&mut self, handle: RigidBodyHandle, force: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(false);
            body.add_force(to_vector(force), true);
        }
    }

    pub fn set_body_drag(&mut self, handle: RigidBodyHandle, drag: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linear_damping(drag);
        }
    }

    pub fn body_drag(&self, handle: RigidBodyHandle) -> f32 {
        self.rigid_body_set
            .get(handle)
            .map_or(0.0, |body| body.linear_damping())
    }

    /// Freeze (disable) or unfreeze a body. A disabled body is skipped by the
    /// solver entirely.
    pub fn set_body_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_body_keeps_orientation_and_drag() {
        let mut world = PhysicsWorld::new();
        let rotation = Quat::from_rotation_y(0.5);
        let (body, _) = world.add_ship_body(Vec3::ZERO, rotation, 2.0, 1.5, 1.0);
        let t = world.get_body_transform(body).unwrap();
        assert!(t.rotation.angle_between(rotation) < 1e-4);
        assert!((world.body_drag(body) - 1.5).abs() < 1e-6);
        world.set_body_drag(body, 15.0);
        assert!((world.body_drag(body) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn force_accelerates_body_without_gravity() {
        let mut world = PhysicsWorld::new();
        let (body, _) = world.add_ship_body(Vec3::ZERO, Quat::IDENTITY, 1.0, 0.0, 1.0);
        world.set_body_force(body, Vec3::new(0.0, 0.0, -10.0));
        for _ in 0..60 {
            world.step();
        }
        let v = world.body_velocity(body);
        assert!(v.z < -1.0);
        assert!(v.y.abs() < 1e-4);
    }
}
