use glam::{Mat3, Vec2, Vec3};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rw_dff::{
    Atomic, BoundingSphere, Clump, Codec, Frame, Geometry, GeometryFlags, Lighting, Material,
    MorphTarget, Rgba, RwVersion, SurfaceProperties, Texture, Triangle,
};
use test_case::test_case;

fn quad_geometry(version: RwVersion) -> Geometry {
    let positions = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];
    let surface = (version.version() > 0x30400).then(SurfaceProperties::default);

    Geometry {
        flags: GeometryFlags::POSITIONS
            | GeometryFlags::NORMALS
            | GeometryFlags::TEXTURED
            | GeometryFlags::PRELIT
            | GeometryFlags::LIGHT,
        vertex_count: 4,
        lighting: (version.version() < 0x34000).then_some(Lighting {
            ambient: 1.0,
            specular: 1.0,
            diffuse: 1.0,
        }),
        prelit: Some(vec![
            Rgba::new(255, 0, 0, 255),
            Rgba::new(0, 255, 0, 255),
            Rgba::new(0, 0, 255, 255),
            Rgba::WHITE,
        ]),
        tex_coords: vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]],
        triangles: vec![
            Triangle {
                vertices: [0, 1, 2],
                material: 0,
            },
            Triangle {
                vertices: [0, 2, 3],
                material: 1,
            },
        ],
        morph_targets: vec![MorphTarget {
            bounding_sphere: BoundingSphere::enclosing(&positions),
            normals: Some(vec![Vec3::Z; 4]),
            positions: Some(positions),
        }],
        materials: vec![
            Material {
                flags: 0,
                color: Rgba::WHITE,
                texture: Some(Texture {
                    name: "wall01".into(),
                    mask: "wall01a".into(),
                    filter: 6,
                    address_u: 1,
                    address_v: 1,
                    mip_flags: 0,
                }),
                surface,
            },
            Material {
                flags: 0,
                color: Rgba::new(128, 128, 128, 255),
                texture: None,
                surface,
            },
        ],
    }
}

fn sample_clump(version: RwVersion) -> Clump {
    Clump {
        version,
        frames: vec![
            Frame {
                name: Some("root".into()),
                ..Frame::default()
            },
            Frame {
                name: Some("body".into()),
                rotation: Mat3::from_rotation_z(std::f32::consts::FRAC_PI_2),
                position: Vec3::new(0.0, 2.5, -1.0),
                parent: Some(0),
                flags: 3,
            },
        ],
        geometries: vec![quad_geometry(version)],
        atomics: vec![Atomic {
            frame: 1,
            geometry: 0,
            flags: 5,
        }],
    }
}

#[test_case(RwVersion::GTA3 ; "gta3")]
#[test_case(RwVersion::VICE_CITY ; "vice city")]
#[test_case(RwVersion::SAN_ANDREAS ; "san andreas")]
fn test_round_trip(version: RwVersion) {
    let clump = sample_clump(version);
    let bytes = clump.save().unwrap();
    let loaded = Clump::load(&bytes).unwrap();
    assert_eq!(loaded.value, clump);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_second_tex_set_round_trip() {
    let mut clump = sample_clump(RwVersion::SAN_ANDREAS);
    let geometry = &mut clump.geometries[0];
    geometry.flags |= GeometryFlags::TEXTURED2;
    let second = geometry.tex_coords[0].iter().map(|uv| *uv * 2.0).collect();
    geometry.tex_coords.push(second);

    let loaded = Clump::load(&clump.save().unwrap()).unwrap().value;
    assert_eq!(loaded.geometries[0].tex_coords.len(), 2);
    assert_eq!(loaded, clump);
}

#[test]
fn test_empty_clump_round_trip() {
    let clump = Clump::default();
    let loaded = Clump::load(&clump.save().unwrap()).unwrap().value;
    assert_eq!(loaded, clump);
}

#[test]
fn test_triangle_index_out_of_range_fails_save() {
    let mut clump = sample_clump(RwVersion::SAN_ANDREAS);
    clump.geometries[0].triangles[1].vertices[2] = 4;
    let err = clump.save().unwrap_err();
    assert!(
        matches!(err, rw_dff::FormatError::InvalidModel(ref message) if message.contains("vertex index 4")),
        "unexpected error: {err}"
    );
}

#[test]
fn test_mismatched_lighting_fails_save() {
    let mut clump = sample_clump(RwVersion::VICE_CITY);
    clump.geometries[0].lighting = Some(Lighting::default());
    assert!(matches!(
        clump.save(),
        Err(rw_dff::FormatError::InvalidModel(_))
    ));
}

#[test]
fn test_frame_lookup_by_name() {
    let clump = sample_clump(RwVersion::SAN_ANDREAS);
    let (index, frame) = clump.frame_by_name("body").unwrap();
    assert_eq!(index, 1);
    assert_eq!(frame.parent, Some(0));
    assert_eq!(clump.triangle_count(), 2);
}

#[test]
fn test_non_latin1_frame_name_fails_save() {
    let mut clump = sample_clump(RwVersion::SAN_ANDREAS);
    clump.frames[1].name = Some("b\u{2603}dy".into());
    assert!(matches!(
        clump.save(),
        Err(rw_dff::FormatError::InvalidModel(_))
    ));
}

fn finite() -> impl Strategy<Value = f32> {
    -1.0e3f32..1.0e3
}

fn vec3() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(finite()).prop_map(Vec3::from_array)
}

fn vec2() -> impl Strategy<Value = Vec2> {
    prop::array::uniform2(finite()).prop_map(Vec2::from_array)
}

/// Mostly storable names, sometimes with NUL or characters past Latin-1
fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-zA-Z0-9_\u{a0}-\u{ff}]{0,16}",
        1 => any::<String>(),
    ]
}

fn rgba() -> impl Strategy<Value = Rgba> {
    any::<[u8; 4]>().prop_map(|[r, g, b, a]| Rgba::new(r, g, b, a))
}

fn arbitrary_frame() -> impl Strategy<Value = Frame> {
    (
        prop::option::of(name()),
        prop::array::uniform9(finite()),
        vec3(),
        prop::option::of(0usize..4),
        any::<u32>(),
    )
        .prop_map(|(name, rotation, position, parent, flags)| Frame {
            name,
            rotation: Mat3::from_cols_array(&rotation),
            position,
            parent,
            flags,
        })
}

fn arbitrary_texture() -> impl Strategy<Value = Texture> {
    (name(), name(), any::<u8>(), 0u8..16, 0u8..16, any::<u16>()).prop_map(
        |(name, mask, filter, address_u, address_v, mip_flags)| Texture {
            name,
            mask,
            filter,
            address_u,
            address_v,
            mip_flags,
        },
    )
}

fn arbitrary_material(surfaced: bool) -> impl Strategy<Value = Material> {
    (
        any::<u32>(),
        rgba(),
        prop::option::of(arbitrary_texture()),
        prop::array::uniform3(finite()),
    )
        .prop_map(move |(flags, color, texture, [ambient, specular, diffuse])| Material {
            flags,
            color,
            texture,
            surface: surfaced.then_some(SurfaceProperties {
                ambient,
                specular,
                diffuse,
            }),
        })
}

fn arbitrary_morph_target(vertices: usize) -> impl Strategy<Value = MorphTarget> {
    (
        vec3(),
        finite(),
        prop::option::of(prop::collection::vec(vec3(), vertices)),
        prop::option::of(prop::collection::vec(vec3(), vertices)),
    )
        .prop_map(|(center, radius, positions, normals)| MorphTarget {
            bounding_sphere: BoundingSphere { center, radius },
            positions,
            normals,
        })
}

fn arbitrary_geometry(version: RwVersion) -> impl Strategy<Value = Geometry> {
    let lit = version.version() < 0x34000;
    let surfaced = version.version() > 0x30400;
    (0usize..5).prop_flat_map(move |vertices| {
        (
            any::<u32>(),
            prop::option::of(prop::collection::vec(rgba(), vertices)),
            prop::collection::vec(prop::collection::vec(vec2(), vertices), 0..3),
            prop::collection::vec((any::<[u16; 3]>(), any::<u16>()), 0..4),
            prop::collection::vec(arbitrary_morph_target(vertices), 0..3),
            prop::collection::vec(arbitrary_material(surfaced), 1..3),
            prop::array::uniform3(finite()),
        )
            .prop_map(
                move |(bits, prelit, tex_coords, triangles, morph_targets, materials, lighting)| {
                    let derived = GeometryFlags::PRELIT
                        | GeometryFlags::TEXTURED
                        | GeometryFlags::TEXTURED2
                        | GeometryFlags::NATIVE;
                    let mut flags = GeometryFlags::from_bits_retain(
                        bits & !(derived.bits() | rw_dff::types::TEX_SET_COUNT_MASK),
                    );
                    flags.set(GeometryFlags::PRELIT, prelit.is_some());
                    flags.set(GeometryFlags::TEXTURED, tex_coords.len() == 1);
                    flags.set(GeometryFlags::TEXTURED2, tex_coords.len() == 2);

                    let modulus = vertices.max(1) as u16;
                    let triangles = triangles
                        .into_iter()
                        .map(|(corners, material)| Triangle {
                            vertices: corners.map(|v| v % modulus),
                            material: material % materials.len() as u16,
                        })
                        .collect();
                    let [ambient, specular, diffuse] = lighting;

                    Geometry {
                        flags,
                        vertex_count: vertices as u32,
                        lighting: lit.then_some(Lighting {
                            ambient,
                            specular,
                            diffuse,
                        }),
                        prelit,
                        tex_coords,
                        triangles,
                        morph_targets,
                        materials,
                    }
                },
            )
    })
}

fn arbitrary_clump() -> impl Strategy<Value = Clump> {
    prop::sample::select(vec![
        RwVersion::GTA3,
        RwVersion::VICE_CITY,
        RwVersion::SAN_ANDREAS,
    ])
    .prop_flat_map(|version| {
        (
            prop::collection::vec(arbitrary_frame(), 0..4),
            prop::collection::vec(arbitrary_geometry(version), 0..3),
            prop::collection::vec((0usize..4, 0usize..3, any::<u32>()), 0..3),
        )
            .prop_map(move |(frames, geometries, atomics)| Clump {
                version,
                frames,
                geometries,
                atomics: atomics
                    .into_iter()
                    .map(|(frame, geometry, flags)| Atomic {
                        frame,
                        geometry,
                        flags,
                    })
                    .collect(),
            })
    })
}

proptest! {
    #[test]
    fn prop_save_fails_or_round_trips(clump in arbitrary_clump()) {
        if let Ok(bytes) = clump.save() {
            prop_assert_eq!(Clump::load(&bytes).unwrap().value, clump);
        }
    }
}
