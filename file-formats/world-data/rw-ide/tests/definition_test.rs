use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rw_ide::{
    AnimatedDef, Codec, DrawDistance, FormatError, HierarchyDef, IdeFile, IdeRows, IdeSection,
    ObjectDef, SectionKind, TextureParent, TimedObjectDef, WeaponDef, parse, serialize,
};
use test_case::test_case;

const VICE_CITY: &str = "\
# generic objects
objs
1000, wall01, generic, 299, 0
1001, LODbridge, bridges, 2, 150, 1500, 132
end

tobj
1002, neon_sign, signs, 1, 100, 4, 20, 6
end

hier
1003, cut_obj1, cutobj01
end

weap
258, colt45, colt45, colt45, 1, 30, 0
end

cars
130, landstal, landstal, car, LANDSTAL, LANDSTK, null, normal, 10, 7, 0
end
";

#[test]
fn test_parse_sections() {
    let file = parse(VICE_CITY).unwrap();
    let kinds: Vec<SectionKind> = file.sections.iter().map(IdeSection::kind).collect();
    assert_eq!(
        kinds,
        vec![
            SectionKind::Objects,
            SectionKind::TimedObjects,
            SectionKind::Hierarchy,
            SectionKind::Weapons,
            SectionKind::Other,
        ]
    );

    let bridge = file.object(1001).unwrap();
    assert_eq!(bridge.draw_distance, DrawDistance::PerMesh(vec![150.0, 1500.0]));
    assert_eq!(bridge.flags, 132);

    let IdeRows::TimedObjects(timed) = &file.sections[1].rows else {
        panic!("expected timed objects");
    };
    assert_eq!((timed[0].time_on, timed[0].time_off), (20, 6));
    assert_eq!(file.objects().count(), 3);

    let IdeRows::Raw(cars) = &file.sections[4].rows else {
        panic!("expected raw rows");
    };
    assert_eq!(cars[0].len(), 11);
    assert_eq!(cars[0][3], "car");
}

#[test]
fn test_serialize_is_stable() {
    let file = parse(VICE_CITY).unwrap();
    let text = serialize(&file).unwrap();
    assert!(text.starts_with("objs\n1000, wall01, generic, 299, 0\n"));
    assert_eq!(parse(&text).unwrap(), file);
    assert_eq!(serialize(&parse(&text).unwrap()).unwrap(), text);
}

#[test]
fn test_codec_round_trip() {
    let file = IdeFile {
        sections: vec![
            IdeSection {
                name: "objs".into(),
                rows: IdeRows::Objects(vec![ObjectDef {
                    id: 1400,
                    model: "caf\u{e9}_sign".into(),
                    txd: "signs".into(),
                    draw_distance: DrawDistance::Single(80.5),
                    flags: 2_097_152,
                }]),
            },
            IdeSection {
                name: "TXDP".into(),
                rows: IdeRows::TextureParents(vec![TextureParent {
                    txd: "signs".into(),
                    parent: "generic".into(),
                }]),
            },
        ],
    };
    let bytes = file.save().unwrap();
    // Latin-1 on disk
    assert!(bytes.contains(&0xE9));
    let loaded = IdeFile::load(&bytes).unwrap();
    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.value, file);
}

#[test_case("objs\n1, a, b, 100\nend\n", 2, vec![5, 6, 7, 8], 4 ; "objs too short")]
#[test_case("tobj\n1, a, b, 100, 0, 1\nend\n", 2, vec![7, 8, 9, 10], 6 ; "tobj without hours")]
#[test_case("# c\n\nhier\n1, a\nend\n", 4, vec![3], 2 ; "hier counts original lines")]
#[test_case("anim\n1, a, b, c, 100\nend\n", 2, vec![6], 5 ; "anim")]
#[test_case("txdp\na, b, c\nend\n", 2, vec![2], 3 ; "txdp")]
fn test_arity_mismatch(text: &str, line: usize, expected: Vec<usize>, found: usize) {
    assert_eq!(
        parse(text).unwrap_err(),
        FormatError::ArityMismatch {
            line,
            expected,
            found,
        }
    );
}

#[test_case("objs\nx, a, b, 100, 0\nend\n", 1, "x" ; "id")]
#[test_case("objs\n1, a, b, far, 0\nend\n", 4, "far" ; "distance")]
#[test_case("objs\n1, a, b, 100, -1\nend\n", 5, "-1" ; "negative flags")]
#[test_case("tobj\n1, a, b, 100, 0, 20, 300\nend\n", 7, "300" ; "hour")]
fn test_malformed_field(text: &str, field: usize, value: &str) {
    assert_eq!(
        parse(text).unwrap_err(),
        FormatError::MalformedField {
            line: 2,
            field,
            value: value.into(),
        }
    );
}

#[test]
fn test_save_rejects_unstorable_values() {
    let object = ObjectDef {
        id: 1,
        model: "wall01".into(),
        txd: "generic".into(),
        ..ObjectDef::default()
    };
    let with = |rows: IdeRows, name: &str| IdeFile {
        sections: vec![IdeSection {
            name: name.into(),
            rows,
        }],
    };

    assert!(with(IdeRows::Objects(vec![object.clone()]), "objs").save().is_ok());
    // rows must match the section name
    assert!(with(IdeRows::Objects(vec![object.clone()]), "tobj").save().is_err());

    let mut comma = object.clone();
    comma.model = "wall,01".into();
    assert!(with(IdeRows::Objects(vec![comma]), "objs").save().is_err());

    let mut meshes = object.clone();
    meshes.draw_distance = DrawDistance::PerMesh(vec![1.0; 4]);
    assert!(with(IdeRows::Objects(vec![meshes]), "objs").save().is_err());

    let timed = TimedObjectDef {
        object: object.clone(),
        time_on: 20,
        time_off: 6,
    };
    assert!(with(IdeRows::TimedObjects(vec![timed]), "tobj").save().is_ok());

    assert!(with(IdeRows::Raw(vec![vec!["end".into()]]), "path").save().is_err());
    assert!(with(IdeRows::Raw(vec![Vec::new()]), "path").save().is_err());
}

#[test]
fn test_unterminated_final_section() {
    let file = parse("objs\n1, a, b, 100, 0\n").unwrap();
    assert_eq!(file.object(1).unwrap().model, "a");
}

/// Mostly plain tokens, sometimes text a table can not hold
fn field() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-zA-Z0-9_.\u{e0}-\u{ff}-]{1,10}",
        1 => any::<String>(),
    ]
}

fn distance() -> impl Strategy<Value = f32> {
    prop_oneof![any::<f32>(), (0u16..4000).prop_map(f32::from)]
}

fn arbitrary_object() -> impl Strategy<Value = ObjectDef> {
    (
        any::<i32>(),
        field(),
        field(),
        prop_oneof![
            distance().prop_map(DrawDistance::Single),
            prop::collection::vec(distance(), 0..5).prop_map(DrawDistance::PerMesh),
        ],
        any::<u32>(),
    )
        .prop_map(|(id, model, txd, draw_distance, flags)| ObjectDef {
            id,
            model,
            txd,
            draw_distance,
            flags,
        })
}

fn rows<T: std::fmt::Debug>(row: impl Strategy<Value = T>) -> impl Strategy<Value = Vec<T>> {
    prop::collection::vec(row, 0..3)
}

fn arbitrary_section() -> impl Strategy<Value = IdeSection> {
    prop_oneof![
        (prop::sample::select(vec!["objs", "OBJS"]), rows(arbitrary_object()))
            .prop_map(|(name, rows)| (name.to_string(), IdeRows::Objects(rows))),
        rows((arbitrary_object(), any::<u8>(), any::<u8>()).prop_map(
            |(object, time_on, time_off)| TimedObjectDef {
                object,
                time_on,
                time_off,
            }
        ))
        .prop_map(|rows| ("tobj".to_string(), IdeRows::TimedObjects(rows))),
        rows((any::<i32>(), field(), field()).prop_map(|(id, model, txd)| HierarchyDef {
            id,
            model,
            txd,
        }))
        .prop_map(|rows| ("hier".to_string(), IdeRows::Hierarchy(rows))),
        rows(
            (any::<i32>(), field(), field(), field(), distance(), any::<u32>()).prop_map(
                |(id, model, txd, animation, draw_distance, flags)| AnimatedDef {
                    id,
                    model,
                    txd,
                    animation,
                    draw_distance,
                    flags,
                }
            )
        )
        .prop_map(|rows| ("anim".to_string(), IdeRows::Animated(rows))),
        rows(
            (
                any::<i32>(),
                field(),
                field(),
                field(),
                any::<u32>(),
                distance(),
                any::<u32>(),
            )
                .prop_map(
                    |(id, model, txd, animation, mesh_count, draw_distance, flags)| WeaponDef {
                        id,
                        model,
                        txd,
                        animation,
                        mesh_count,
                        draw_distance,
                        flags,
                    }
                )
        )
        .prop_map(|rows| ("weap".to_string(), IdeRows::Weapons(rows))),
        rows((field(), field()).prop_map(|(txd, parent)| TextureParent { txd, parent }))
            .prop_map(|rows| ("txdp".to_string(), IdeRows::TextureParents(rows))),
        ("[a-z]{1,6}", rows(prop::collection::vec(field(), 0..4)))
            .prop_map(|(name, rows)| (name, IdeRows::Raw(rows))),
    ]
    .prop_map(|(name, rows)| IdeSection { name, rows })
}

proptest! {
    #[test]
    fn prop_save_fails_or_round_trips(sections in prop::collection::vec(arbitrary_section(), 0..4)) {
        let file = IdeFile { sections };
        if let Ok(bytes) = file.save() {
            prop_assert_eq!(IdeFile::load(&bytes).unwrap().value, file);
        }
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "[a-z0-9,# \\n.-]{0,200}") {
        let _ = parse(&text);
    }

    #[test]
    fn prop_objects_reparse(
        id in any::<i32>(),
        distance in 0u16..4000,
        flags in any::<u32>(),
    ) {
        let file = IdeFile {
            sections: vec![IdeSection {
                name: "objs".into(),
                rows: IdeRows::Objects(vec![ObjectDef {
                    id,
                    model: "m".into(),
                    txd: "t".into(),
                    draw_distance: DrawDistance::Single(f32::from(distance) / 4.0),
                    flags,
                }]),
            }],
        };
        prop_assert_eq!(parse(&serialize(&file).unwrap()).unwrap(), file);
    }
}
