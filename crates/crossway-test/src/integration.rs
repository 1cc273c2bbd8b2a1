//! End-to-end integration tests
//!
//! Exercises the complete participant flow through the in-memory
//! simulator: per-tick sampling, quorum-gated relay fan-out, replica
//! application through the scene sinks, and condition broadcasts.

#[cfg(test)]
mod tests {
    use crossway_core::{ClientId, EhmiDisplay, Pose, Quat, Role, SubPart, Vec3};
    use crossway_session::DisplayElement;

    use crate::ExperimentSimulator;

    const DT: f32 = 0.02;

    fn pose_at(x: f32, z: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, z), Quat::from_yaw(0.3))
    }

    /// Full quorum, everyone moving: every client sees both remote actors
    /// and never its own data.
    #[test]
    fn test_three_role_pose_sync() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(0.0, 0.0));
        let cyc = sim.connect_at(Role::Cyclist, pose_at(5.0, 0.0));
        let drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));

        sim.set_input(ped, 1.0, 0.0);
        sim.set_input(cyc, 1.0, 0.0);
        sim.set_input(drv, 0.5, 0.1);
        for _ in 0..10 {
            sim.tick(DT);
        }

        let cyc_id = sim.client(cyc).session.id();
        let drv_id = sim.client(drv).session.id();
        let ped_id = sim.client(ped).session.id();

        // Pedestrian sees both vehicle roots, no skeleton of its own
        let ped_scene = &sim.client(ped).scene;
        assert!(ped_scene.roots.contains_key(&cyc_id));
        assert!(ped_scene.roots.contains_key(&drv_id));
        assert!(!ped_scene.joints.keys().any(|(id, _)| *id == ped_id));

        // Vehicles see the pedestrian skeleton and each other
        let cyc_scene = &sim.client(cyc).scene;
        assert_eq!(cyc_scene.joint_senders(), vec![ped_id]);
        assert!(cyc_scene.roots.contains_key(&drv_id));
        assert!(!cyc_scene.roots.contains_key(&cyc_id));

        let drv_scene = &sim.client(drv).scene;
        assert_eq!(drv_scene.joint_senders(), vec![ped_id]);
        assert!(drv_scene.roots.contains_key(&cyc_id));
        assert!(!drv_scene.roots.contains_key(&drv_id));

        // Sub-parts arrive under the fixed schema
        assert!(ped_scene
            .sub_poses
            .contains_key(&(cyc_id, SubPart::WheelFront)));
        assert!(ped_scene
            .sub_poses
            .contains_key(&(drv_id, SubPart::WheelFrontLeft)));
    }

    /// The relay holds everything back until all three roles are present,
    /// then forwards from the next tick on.
    #[test]
    fn test_quorum_gates_forwarding() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(0.0, 0.0));
        let cyc = sim.connect_at(Role::Cyclist, pose_at(5.0, 0.0));
        sim.set_input(ped, 1.0, 0.0);
        sim.set_input(cyc, 1.0, 0.0);

        for _ in 0..5 {
            sim.tick(DT);
        }
        assert!(sim.client(ped).scene.roots.is_empty());
        assert!(sim.client(cyc).scene.joints.is_empty());

        let drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));
        sim.set_input(drv, 1.0, 0.0);
        sim.tick(DT);

        let cyc_id = sim.client(cyc).session.id();
        assert!(sim.client(ped).scene.roots.contains_key(&cyc_id));
        assert!(!sim.client(cyc).scene.joints.is_empty());
    }

    /// Losing a role breaks quorum and stops all forwarding, even between
    /// the two participants still connected.
    #[test]
    fn test_disconnect_stops_forwarding() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(0.0, 0.0));
        let cyc = sim.connect_at(Role::Cyclist, pose_at(5.0, 0.0));
        let drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));
        sim.set_input(cyc, 1.0, 0.0);
        sim.tick(DT);

        let cyc_id = sim.client(cyc).session.id();
        let before = sim.client(ped).scene.roots[&cyc_id];

        sim.disconnect(drv);
        for _ in 0..10 {
            sim.tick(DT);
        }

        // The cyclist kept moving but no update got through
        let after = sim.client(ped).scene.roots[&cyc_id];
        assert_eq!(before, after);
    }

    /// A condition command reaches every connected display, quorum or not.
    #[test]
    fn test_condition_fanout() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect(Role::Pedestrian);
        let cyc = sim.connect(Role::Cyclist);

        assert!(sim.set_condition(7));
        for conn in [ped, cyc] {
            let display = &sim.client(conn).display;
            assert!(display.is_active(DisplayElement::Variant(EhmiDisplay::NonYieldWhom)));
            assert!(display.is_active(DisplayElement::Backplate));
        }
    }

    /// An invalid condition number is rejected server-side: no broadcast,
    /// clients keep the previous display.
    #[test]
    fn test_invalid_condition_not_broadcast() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect(Role::Pedestrian);

        assert!(sim.set_condition(3));
        assert!(!sim.set_condition(13));
        assert!(!sim.set_condition(0));

        let display = &sim.client(ped).display;
        assert!(display.is_active(DisplayElement::Variant(EhmiDisplay::YieldNoContext)));
    }

    /// AV driving broadcasts pass through sessions without touching pose
    /// replicas or displays.
    #[test]
    fn test_driving_broadcasts_do_not_disturb_sessions() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect(Role::Pedestrian);
        sim.set_condition(5);

        sim.start_driving();
        for _ in 0..20 {
            sim.tick(DT);
        }
        sim.stop_driving();

        let client = sim.client(ped);
        assert!(client.scene.roots.is_empty());
        assert!(client
            .display
            .is_active(DisplayElement::Variant(EhmiDisplay::YieldPedestrianWhom)));
    }

    /// A participant whose root never left the sentinel origin produces
    /// role data that receivers drop.
    #[test]
    fn test_stationary_sentinel_root_dropped_end_to_end() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(1.0, 1.0));
        // Cyclist stays at the default origin pose with no input
        let cyc = sim.connect(Role::Cyclist);
        let drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));
        sim.set_input(drv, 1.0, 0.0);

        for _ in 0..5 {
            sim.tick(DT);
        }

        let cyc_id = sim.client(cyc).session.id();
        let drv_id = sim.client(drv).session.id();
        let ped_scene = &sim.client(ped).scene;
        assert!(!ped_scene.roots.contains_key(&cyc_id));
        assert!(ped_scene.roots.contains_key(&drv_id));
    }

    /// Per-tick samples supersede lost ones: a late joiner converges on the
    /// senders' current state within one tick.
    #[test]
    fn test_late_joiner_converges_next_tick() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(0.0, 0.0));
        let cyc = sim.connect_at(Role::Cyclist, pose_at(5.0, 0.0));
        sim.set_input(ped, 1.0, 0.0);
        sim.set_input(cyc, 1.0, 0.0);

        let drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));
        sim.tick(DT);

        let cyc_id = sim.client(cyc).session.id();
        let seen = sim.client(drv).scene.roots[&cyc_id];
        let actual = sim.client(cyc).session.root();
        assert_eq!(seen, actual);
    }

    /// ClientId inside messages matches what the sender's session stamps
    #[test]
    fn test_sender_identity_preserved_through_relay() {
        let mut sim = ExperimentSimulator::new();
        let ped = sim.connect_at(Role::Pedestrian, pose_at(0.0, 0.0));
        let cyc = sim.connect_at(Role::Cyclist, pose_at(5.0, 0.0));
        let _drv = sim.connect_at(Role::Driver, pose_at(-5.0, 10.0));
        sim.set_input(ped, 1.0, 0.0);
        sim.tick(DT);

        let ped_id = sim.client(ped).session.id();
        assert_ne!(ped_id, ClientId::ZERO);
        assert_eq!(sim.client(cyc).scene.joint_senders(), vec![ped_id]);
    }
}
