use vizij_pose_core::{
    collection_point, part_length, pose::Pose, skeleton::anatomy, solve, BodyPart, Joint,
    Proportion, Side, Vec2, COLLECTION_POINT_FRACTION,
};

const BASE: f32 = 150.0;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_vec(a: Vec2, b: Vec2, eps: f32) {
    approx(a.x, b.x, eps);
    approx(a.y, b.y, eps);
}

/// it should produce identical maps for identical inputs (pure solver)
#[test]
fn solve_is_deterministic() {
    let mut pose = Pose::challenge();
    pose.props.insert(
        BodyPart::LLowerArm,
        Proportion { w: 1.3, h: 0.7 },
    );
    let a = solve(&pose, BASE);
    let b = solve(&pose, BASE);
    assert_eq!(a, b);
}

/// it should root the waist at the origin with its own offset as rotation
#[test]
fn waist_is_pose_root() {
    let pose = Pose::rest().with_offset(Joint::Waist, 30.0);
    let map = solve(&pose, BASE);
    let waist = map.get(BodyPart::Waist);
    approx_vec(waist.position, Vec2::ZERO, 1e-6);
    approx(waist.rotation, 30.0, 1e-6);
}

/// it should chain the trunk upward through waist, torso, collar and head
#[test]
fn trunk_chain_geometry_at_rest() {
    let map = solve(&Pose::rest(), BASE);
    let waist_len = anatomy::WAIST * BASE;
    let torso_len = anatomy::TORSO * BASE;
    let collar_len = anatomy::COLLAR * BASE;

    approx_vec(map.get(BodyPart::Torso).position, Vec2::new(0.0, -waist_len), 1e-3);
    approx_vec(
        map.get(BodyPart::Collar).position,
        Vec2::new(0.0, -(waist_len + torso_len)),
        1e-3,
    );
    approx_vec(
        map.get(BodyPart::Head).position,
        Vec2::new(0.0, -(waist_len + torso_len + collar_len)),
        1e-3,
    );
    approx(map.get(BodyPart::Head).rotation, 0.0, 1e-6);
}

/// it should accumulate rotation as parent absolute rotation plus local offset
#[test]
fn rotation_accumulates_down_the_chain() {
    let pose = Pose::rest()
        .with_offset(Joint::Waist, 10.0)
        .with_offset(Joint::Torso, 20.0)
        .with_offset(Joint::Collar, 5.0)
        .with_offset(Joint::Neck, -3.0);
    let map = solve(&pose, BASE);
    approx(map.get(BodyPart::Torso).rotation, 30.0, 1e-4);
    approx(map.get(BodyPart::Collar).rotation, 35.0, 1e-4);
    approx(map.get(BodyPart::Head).rotation, 32.0, 1e-4);
}

/// it should bias shoulders ±90° and anchor them laterally off the collar's
/// distal point
#[test]
fn shoulders_attach_with_side_bias() {
    let map = solve(&Pose::rest(), BASE);
    let collar_end_y = -(anatomy::WAIST + anatomy::TORSO + anatomy::COLLAR) * BASE;
    let sx = 0.30 * BASE;

    let l = map.get(BodyPart::LUpperArm);
    let r = map.get(BodyPart::RUpperArm);
    approx_vec(l.position, Vec2::new(sx, collar_end_y), 1e-3);
    approx_vec(r.position, Vec2::new(-sx, collar_end_y), 1e-3);
    approx(l.rotation, 90.0, 1e-4);
    approx(r.rotation, -90.0, 1e-4);

    // At rest the arms extend horizontally away from the trunk.
    let up_len = anatomy::UPPER_ARM * BASE;
    approx_vec(
        map.get(BodyPart::LLowerArm).position,
        Vec2::new(sx - up_len, collar_end_y),
        1e-3,
    );
    approx_vec(
        map.get(BodyPart::RLowerArm).position,
        Vec2::new(-sx + up_len, collar_end_y),
        1e-3,
    );
}

/// it should anchor hips at the waist position, not the torso's distal point
#[test]
fn hips_are_siblings_of_the_torso() {
    // Fold the torso far over; the legs must not move with it.
    let bent = Pose::rest().with_offset(Joint::Torso, 170.0);
    let straight = Pose::rest();
    let bent_map = solve(&bent, BASE);
    let straight_map = solve(&straight, BASE);

    for part in [
        BodyPart::LUpperLeg,
        BodyPart::RUpperLeg,
        BodyPart::LLowerLeg,
        BodyPart::RLowerLeg,
        BodyPart::LFoot,
        BodyPart::RFoot,
        BodyPart::LToe,
        BodyPart::RToe,
    ] {
        assert_eq!(bent_map.get(part), straight_map.get(part), "{part:?}");
    }
    approx_vec(bent_map.get(BodyPart::LUpperLeg).position, Vec2::ZERO, 1e-6);
}

/// it should follow waist rotation in the hip branch (hip = waist + offset)
#[test]
fn hip_rotation_derives_from_waist() {
    let pose = Pose::rest()
        .with_offset(Joint::Waist, 40.0)
        .with_offset(Joint::Torso, -15.0)
        .with_offset(Joint::LHip, 5.0);
    let map = solve(&pose, BASE);
    // The torso offset plays no part in the hip rotation.
    approx(map.get(BodyPart::LUpperLeg).rotation, 45.0, 1e-4);
}

/// it should scale segment lengths by base unit and the part's h proportion
#[test]
fn proportions_scale_segment_lengths() {
    let pose = Pose::rest().with_proportion(BodyPart::Waist, Proportion { w: 1.0, h: 2.0 });
    let map = solve(&pose, BASE);
    approx_vec(
        map.get(BodyPart::Torso).position,
        Vec2::new(0.0, -anatomy::WAIST * BASE * 2.0),
        1e-3,
    );

    approx(
        part_length(&pose, BASE, BodyPart::Waist),
        anatomy::WAIST * BASE * 2.0,
        1e-3,
    );
}

/// it should stay total over sparse poses (missing keys read as defaults)
#[test]
fn sparse_pose_solves_like_rest() {
    let sparse = Pose {
        offsets: Default::default(),
        props: Default::default(),
    };
    assert_eq!(solve(&sparse, BASE), solve(&Pose::rest(), BASE));
}

/// it should place the collection point a fixed fraction past the wrist
/// along the hand's own rotation
#[test]
fn collection_point_tracks_the_hand() {
    let pose = Pose::rest();
    let map = solve(&pose, BASE);
    let hand = map.get(BodyPart::LHand);
    let reach = anatomy::HAND * BASE * COLLECTION_POINT_FRACTION;

    // Left hand at rest points along +90°: the reach vector lands at -x.
    let expected = Vec2::new(hand.position.x - reach, hand.position.y);
    approx_vec(collection_point(&map, &pose, BASE, Side::Left), expected, 1e-3);

    // Scaling the hand scales the reach.
    let long = pose.with_proportion(BodyPart::LHand, Proportion { w: 1.0, h: 2.0 });
    let long_map = solve(&long, BASE);
    let long_cp = collection_point(&long_map, &long, BASE, Side::Left);
    approx(long_cp.x, hand.position.x - 2.0 * reach, 1e-3);
}
