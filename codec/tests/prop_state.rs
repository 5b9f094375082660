use codec::{
    decode_autosave, decode_hash, encode_autosave, encode_hash, read_string, write_string,
    CircleElement, Color, CodecLimits, DecodeOptions, LineElement, MarkerElement, Point,
    PolygonElement, StateElement, StateRoot, Style, Viewport,
};
use proptest::prelude::*;

fn point_strategy() -> impl Strategy<Value = Point> {
    (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(lng, lat)| Point::new(lng, lat))
}

fn color_strategy() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(r, g, b, a)| Color::rgba(r, g, b, a))
}

fn style_strategy() -> impl Strategy<Value = Style> {
    (
        (
            prop::option::of(color_strategy()),
            prop::option::of(0.0f64..20.0),
            prop::option::of(0.0f64..1.0),
            prop::option::of(0u32..64),
            prop::option::of(-360.0f64..360.0),
        ),
        (
            prop::option::of(0.0f64..10.0),
            prop::option::of(0.0f64..10.0),
            prop::option::of(0u32..8),
            prop::option::of(".{0,12}"),
            prop::option::of(any::<bool>()),
        ),
    )
        .prop_map(
            |((color, halo, opacity, pattern, rotation), (size, width, align, label, visible))| {
                Style {
                    color,
                    halo,
                    opacity,
                    pattern,
                    rotation,
                    size,
                    width,
                    align,
                    label,
                    visible,
                }
            },
        )
}

fn element_strategy() -> impl Strategy<Value = StateElement> {
    prop_oneof![
        (point_strategy(), style_strategy())
            .prop_map(|(point, style)| StateElement::Marker(MarkerElement { point, style })),
        (prop::collection::vec(point_strategy(), 0..8), style_strategy())
            .prop_map(|(points, style)| StateElement::Line(LineElement { points, style })),
        (
            prop::collection::vec(point_strategy(), 0..8),
            style_strategy(),
            style_strategy()
        )
            .prop_map(|(points, fill, stroke)| StateElement::Polygon(PolygonElement {
                points,
                fill,
                stroke
            })),
        (point_strategy(), 0.0f64..100_000.0, style_strategy(), style_strategy()).prop_map(
            |(center, radius, fill, stroke)| StateElement::Circle(CircleElement {
                center,
                radius,
                fill,
                stroke
            })
        ),
    ]
}

fn root_strategy() -> impl Strategy<Value = StateRoot> {
    (
        prop::option::of(
            (point_strategy(), 0.0f64..1_000_000.0)
                .prop_map(|(center, radius)| Viewport { center, radius }),
        ),
        prop::collection::vec(element_strategy(), 0..6),
    )
        .prop_map(|(viewport, elements)| StateRoot { viewport, elements })
}

proptest! {
    #[test]
    fn prop_hash_roundtrip_is_quantization(root in root_strategy()) {
        let expected = root.quantized().unwrap();
        let hash = encode_hash(&root).unwrap();
        let decoded = decode_hash(&hash, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(&decoded, &expected);

        // Quantization is idempotent, so a second trip is lossless.
        prop_assert_eq!(encode_hash(&decoded).unwrap(), hash);
    }

    #[test]
    fn prop_autosave_matches_hash(root in root_strategy()) {
        let saved = encode_autosave(&root).unwrap();
        let decoded = decode_autosave(&saved, &DecodeOptions::default()).unwrap();
        prop_assert_eq!(decoded, root.quantized().unwrap());
    }

    #[test]
    fn prop_string_roundtrip(value in ".{0,64}") {
        let mut writer = bitstream::BitWriter::new();
        write_string(&mut writer, &value).unwrap();
        let buffer = writer.finish();
        let mut reader = buffer.reader();
        let decoded = read_string(&mut reader, &CodecLimits::unlimited()).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert!(reader.ended());
    }

    #[test]
    fn prop_decode_never_panics(input in "[A-Za-z0-9_-]{0,64}") {
        let options = DecodeOptions::for_testing();
        let _ = decode_hash(&input, &options);
        let _ = decode_autosave(&input, &options);
    }

    #[test]
    fn prop_color_hex_roundtrip(color in color_strategy()) {
        let parsed: Color = color.to_hex().parse().unwrap();
        prop_assert_eq!(parsed, color);
    }
}
