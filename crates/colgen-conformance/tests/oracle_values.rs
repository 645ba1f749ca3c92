use colgen_conformance::{enums, events, nulls, scalars, text};
use colgen_rt::decimal::{decimal128, decimal32, decimal64};
use colgen_rt::oracle::Value;

fn txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn scalars_widen_and_render() {
    let row = scalars::ScalarsTestEncoder::row(
        &7,
        &-2,
        &42,
        &-1,
        &1.5,
        &0.25,
        &12345,
        &-2,
        &17000,
        &1_500_000_000,
        &[
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d,
            0x0e, 0x0f,
        ],
    );
    assert_eq!(
        row,
        vec![
            Value::UInt(7),
            Value::Int(-2),
            Value::UInt(42),
            Value::Int(-1),
            Value::Float(1.5),
            Value::Float(0.25),
            Value::Decimal(decimal32(2, 12345)),
            Value::Decimal(decimal128(4, -2)),
            txt("2016-07-18"),
            // The column's own zone is metadata; the oracle renders in the reference zone.
            txt("2017-07-14T05:40:00"),
            txt("00010203-0405-0607-0809-0a0b0c0d0e0f"),
        ]
    );
    assert_eq!(row[6].to_string(), "123.45");
    assert_eq!(row[7].to_string(), "-0.0002");
}

#[test]
fn epoch_renders_in_reference_zone() {
    let row = scalars::ScalarsTestEncoder::row(
        &0, &0, &0, &0, &0.0, &0.0, &0, &0, &0, &0, &[0; 16],
    );
    assert_eq!(row[8], txt("1970-01-01"));
    assert_eq!(row[9], txt("1970-01-01T03:00:00"));
    assert_eq!(row[10], txt("00000000-0000-0000-0000-000000000000"));
}

#[test]
fn strings_pass_through() {
    let row = text::TextTestEncoder::row(&"abc".to_string(), &"hello".to_string());
    assert_eq!(row, vec![txt("abc"), txt("hello")]);

    // The oracle does not enforce FixedString lengths.
    let row = text::TextTestEncoder::row(&String::new(), &"ab".to_string());
    assert_eq!(row[1], txt("ab"));
}

#[test]
fn composites_nest_without_double_wrapping() {
    let empty = nulls::NullsTestEncoder::row(&None, &vec![], &None, &vec![], &vec![]);
    assert_eq!(
        empty,
        vec![
            Value::Null,
            Value::Array(vec![]),
            Value::Null,
            Value::Array(vec![]),
            Value::Array(vec![]),
        ]
    );

    let full = nulls::NullsTestEncoder::row(
        &Some(7),
        &vec!["a".to_string(), "bc".to_string()],
        &Some(vec![]),
        &vec![Some(1), None],
        &vec![vec![1], vec![-1, 2]],
    );
    assert_eq!(
        full,
        vec![
            Value::UInt(7),
            Value::from(vec!["a", "bc"]),
            Value::Array(vec![]),
            Value::from(vec![Some(1u8), None]),
            Value::Array(vec![
                Value::from(vec![1i8]),
                Value::from(vec![-1i8, 2]),
            ]),
        ]
    );
}

#[test]
fn enum_codes_map_to_names() {
    let row = enums::EnumsTestEncoder::row(&1, &-300, &Some(5));
    assert_eq!(row, vec![txt("B"), txt("low"), txt("it's")]);
    let row = enums::EnumsTestEncoder::row(&0, &300, &None);
    assert_eq!(row, vec![txt("A"), txt("high"), Value::Null]);
}

#[test]
#[should_panic(expected = "value 2 has no key mapped to in enum grade")]
fn unmapped_enum_code_panics() {
    enums::EnumsTestEncoder::row(&2, &300, &None);
}

#[test]
fn enum_helpers_expose_the_mapping() {
    assert_eq!(enums::GRADE_VALUES, &[("A", 0), ("B", 1)]);
    assert_eq!(enums::LEVEL_VALUES, &[("low", -300), ("high", 300)]);
    assert_eq!(enums::grade_name(1), Some("B"));
    assert_eq!(enums::grade_name(7), None);
    assert_eq!(enums::level_code("high"), Some(300));
    assert_eq!(enums::level_code("nope"), None);
    assert_eq!(enums::prior_code("it's"), Some(5));
}

#[test]
fn test_encoder_collects_rows_in_order() {
    let mut oracle = events::EventsTestEncoder::new();
    for (id, kind) in [(1u64, 1i8), (2, 2)] {
        oracle.encode(
            &id,
            &[0xab; 16],
            &kind,
            &"/home".to_string(),
            &Some("https://example.com".to_string()),
            &1_500_000_000,
            &17000,
            &12_345_678,
            &vec!["a".to_string()],
        );
    }
    assert_eq!(oracle.rows.len(), 2);
    assert_eq!(
        oracle.rows[0],
        vec![
            Value::UInt(1),
            txt("abababab-abab-abab-abab-abababababab"),
            txt("click"),
            txt("/home"),
            txt("https://example.com"),
            txt("2017-07-14T05:40:00"),
            txt("2016-07-18"),
            Value::Decimal(decimal64(4, 12_345_678)),
            Value::from(vec!["a"]),
        ]
    );
    assert_eq!(oracle.rows[1][2], txt("view"));
    assert_eq!(oracle.rows[1][7].to_string(), "1234.5678");
}
