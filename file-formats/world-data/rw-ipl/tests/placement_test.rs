use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rw_ipl::{
    Codec, FormatError, Instance, InstanceLayout, IplFile, IplRows, IplSection, Zone, parse,
    serialize,
};
use test_case::test_case;

const VICE_CITY: &str = "\
# Vice Point
inst
2115, vcnmav, 0, -318.25, 1045.5, 12.0, 1, 1, 1, 0, 0, 0.7071, 0.7071
end
cull
-330, 1030, 10, -300, 1060, 30, 0, 0, 0
end
zone
VICE_P, 0, -400.0, 900.0, -50.0, -200.0, 1200.0, 100.0, 1
end
";

#[test]
fn test_parse_vice_city() {
    let file = parse(VICE_CITY).unwrap();
    assert_eq!(file.sections.len(), 3);

    let instance = file.instances().next().unwrap();
    assert_eq!(instance.layout(), Some(InstanceLayout::ViceCity));
    assert_eq!(instance.interior, Some(0));
    assert_eq!(instance.position, Vec3::new(-318.25, 1045.5, 12.0));
    assert_eq!(instance.rotation, Quat::from_xyzw(0.0, 0.0, 0.7071, 0.7071));

    let IplRows::Raw(cull) = &file.sections[1].rows else {
        panic!("expected raw rows");
    };
    assert_eq!(cull[0].len(), 9);

    let zone = file.zones().next().unwrap();
    assert_eq!(zone.name, "VICE_P");
    assert_eq!(zone.max, Vec3::new(-200.0, 1200.0, 100.0));
}

#[test]
fn test_serialize_uses_six_decimals() {
    let text = serialize(&parse(VICE_CITY).unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "inst");
    assert_eq!(
        lines[1],
        "2115, vcnmav, 0, -318.250000, 1045.500000, 12.000000, 1.000000, 1.000000, 1.000000, \
         0.000000, 0.000000, 0.707100, 0.707100"
    );
    // raw rows are written as read
    assert_eq!(lines[4], "-330, 1030, 10, -300, 1060, 30, 0, 0, 0");
    assert_eq!(parse(&text).unwrap(), parse(VICE_CITY).unwrap());
}

#[test_case(InstanceLayout::Gta3 ; "gta3")]
#[test_case(InstanceLayout::ViceCity ; "vice city")]
#[test_case(InstanceLayout::SanAndreas ; "san andreas")]
fn test_instance_layouts_round_trip(layout: InstanceLayout) {
    let (interior, scale, lod) = match layout {
        InstanceLayout::Gta3 => (None, Some(Vec3::new(1.0, 1.0, 2.5)), None),
        InstanceLayout::ViceCity => (Some(3), Some(Vec3::ONE), None),
        InstanceLayout::SanAndreas => (Some(0), None, Some(12)),
    };
    let file = IplFile {
        sections: vec![IplSection {
            name: "inst".into(),
            rows: IplRows::Instances(vec![Instance {
                id: 1321,
                model: "lodbridge".into(),
                interior,
                position: Vec3::new(-1.5, 200.25, 7.125),
                scale,
                rotation: Quat::from_xyzw(0.0, 0.0, -0.5, 0.875),
                lod,
            }]),
        }],
    };
    let text = serialize(&file).unwrap();
    let row = text.lines().nth(1).unwrap();
    assert_eq!(row.split(", ").count(), layout.field_count());

    let loaded = IplFile::load(&file.save().unwrap()).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.value, file);
}

#[test]
fn test_zone_arity_mismatch_reports_line() {
    let text = "# zones\nzone\nVICE_P, 0, -400, 900, -50, -200, 1200, 100\nend\n";
    assert_eq!(
        parse(text).unwrap_err(),
        FormatError::ArityMismatch {
            line: 3,
            expected: vec![9],
            found: 8,
        }
    );
}

#[test]
fn test_instance_arity_mismatch() {
    let err = parse("inst\n1, a, 0, 0, 0, 0, 0, 0, 0, 1\nend\n").unwrap_err();
    assert_eq!(
        err,
        FormatError::ArityMismatch {
            line: 2,
            expected: vec![11, 12, 13],
            found: 10,
        }
    );
    assert_eq!(err.to_string(), "line 2: expected 11, 12 or 13 fields, found 10");
}

#[test]
fn test_malformed_coordinate() {
    assert_eq!(
        parse("inst\n1, a, 0, 0, 0, 1, 1, 1, 0, 0, 0, one\nend\n").unwrap_err(),
        FormatError::MalformedField {
            line: 2,
            field: 12,
            value: "one".into(),
        }
    );
}

#[test]
fn test_binary_file() {
    let mut bytes = b"bnry".to_vec();
    bytes.extend_from_slice(&[0; 72]);
    assert!(matches!(
        IplFile::load(&bytes),
        Err(FormatError::UnsupportedFormatVersion(_))
    ));
}

#[test]
fn test_save_rejects_mixed_layout() {
    let file = IplFile {
        sections: vec![IplSection {
            name: "inst".into(),
            rows: IplRows::Instances(vec![Instance {
                // scale and lod never appear together
                lod: Some(0),
                ..Instance::default()
            }]),
        }],
    };
    assert!(matches!(file.save(), Err(FormatError::InvalidModel(_))));
}

#[test]
fn test_save_rejects_zone_rows_in_inst() {
    let file = IplFile {
        sections: vec![IplSection {
            name: "inst".into(),
            rows: IplRows::Zones(vec![Zone {
                name: "z".into(),
                ..Zone::default()
            }]),
        }],
    };
    assert!(file.save().is_err());
}

#[test]
fn test_save_rejects_unrepresentable_coordinates() {
    let file = IplFile {
        sections: vec![IplSection {
            name: "inst".into(),
            rows: IplRows::Instances(vec![Instance {
                id: 1,
                model: "m".into(),
                position: Vec3::new(0.123_456_7, 1e-7, 2.0),
                ..Instance::default()
            }]),
        }],
    };
    assert!(matches!(file.save(), Err(FormatError::InvalidModel(_))));

    let mut zone_file = IplFile {
        sections: vec![IplSection {
            name: "zone".into(),
            rows: IplRows::Zones(vec![Zone {
                name: "z".into(),
                max: Vec3::new(f32::INFINITY, 0.0, 0.0),
                ..Zone::default()
            }]),
        }],
    };
    assert!(zone_file.save().is_err());
    zone_file.sections[0].rows = IplRows::Zones(vec![Zone {
        name: "z".into(),
        max: Vec3::new(10.5, 0.25, -3.0),
        ..Zone::default()
    }]);
    let loaded = IplFile::load(&zone_file.save().unwrap()).unwrap();
    assert_eq!(loaded.value, zone_file);
}

fn coordinate() -> impl Strategy<Value = f32> {
    prop_oneof![
        any::<f32>(),
        (-40_000i32..40_000).prop_map(|v| v as f32 / 16.0),
    ]
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (coordinate(), coordinate(), coordinate()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

prop_compose! {
    fn arbitrary_instance()(
        id in any::<i32>(),
        model in "[a-zA-Z0-9_ ,#]{0,12}",
        interior in prop::option::of(any::<i32>()),
        position in vec3(),
        scale in prop::option::of(vec3()),
        rotation in (coordinate(), coordinate(), coordinate(), coordinate()),
        lod in prop::option::of(any::<i32>()),
    ) -> Instance {
        Instance {
            id,
            model,
            interior,
            position,
            scale,
            rotation: Quat::from_xyzw(rotation.0, rotation.1, rotation.2, rotation.3),
            lod,
        }
    }
}

prop_compose! {
    fn arbitrary_zone()(
        name in "[A-Z_]{0,8}",
        kind in any::<i32>(),
        min in vec3(),
        max in vec3(),
        level in any::<i32>(),
    ) -> Zone {
        Zone { name, kind, min, max, level }
    }
}

proptest! {
    #[test]
    fn prop_save_fails_or_round_trips(
        instances in prop::collection::vec(arbitrary_instance(), 0..4),
        zones in prop::collection::vec(arbitrary_zone(), 0..3),
    ) {
        let file = IplFile {
            sections: vec![
                IplSection { name: "inst".into(), rows: IplRows::Instances(instances) },
                IplSection { name: "zone".into(), rows: IplRows::Zones(zones) },
            ],
        };
        if let Ok(bytes) = file.save() {
            prop_assert_eq!(IplFile::load(&bytes).unwrap().value, file);
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "[a-z0-9,# \\n.-]{0,200}") {
        let _ = parse(&text);
    }

    #[test]
    fn prop_grid_positions_reparse(x in -8000i32..8000, y in -8000i32..8000, z in -400i32..400) {
        let position = Vec3::new(x as f32 / 8.0, y as f32 / 8.0, z as f32 / 8.0);
        let file = IplFile {
            sections: vec![IplSection {
                name: "inst".into(),
                rows: IplRows::Instances(vec![Instance {
                    id: 1,
                    model: "m".into(),
                    position,
                    ..Instance::default()
                }]),
            }],
        };
        prop_assert_eq!(parse(&serialize(&file).unwrap()).unwrap(), file);
    }
}
