//! Every leaf type wrapped in Array or Nullable at least once.

use colgen_conformance::wrapped;
use colgen_rt::decimal::{decimal128, decimal32, decimal64};
use colgen_rt::oracle::Value;
use colgen_rt::wire::EncodeError;

struct Row {
    shorts: wrapped::Shorts,
    ints: wrapped::Ints,
    longs: wrapped::Longs,
    ports: wrapped::Ports,
    counters: wrapped::Counters,
    ratio: wrapped::Ratio,
    weights: wrapped::Weights,
    price: wrapped::Price,
    amounts: wrapped::Amounts,
    balances: wrapped::Balances,
    days: wrapped::Days,
    stamps: wrapped::Stamps,
    code: wrapped::Code,
    ids: wrapped::Ids,
    kinds: wrapped::Kinds,
    level: wrapped::Level,
}

impl Row {
    fn full() -> Self {
        Row {
            shorts: vec![-2, 300],
            ints: Some(-1),
            longs: vec![Some(5), None],
            ports: None,
            counters: vec![u64::MAX],
            ratio: Some(1.0),
            weights: vec![],
            price: Some(-150),
            amounts: vec![1234],
            balances: vec![Some(1), None, Some(-1)],
            days: vec![0, 17000],
            stamps: vec![vec![Some(0), None], vec![]],
            code: Some("zz".to_string()),
            ids: Some(vec![[7; 16]]),
            kinds: vec![1, 2],
            level: Some(-1000),
        }
    }

    fn sparse() -> Self {
        Row {
            shorts: vec![],
            ints: None,
            longs: vec![],
            ports: Some(8080),
            counters: vec![],
            ratio: None,
            weights: vec![0.5],
            price: None,
            amounts: vec![],
            balances: vec![],
            days: vec![],
            stamps: vec![],
            code: None,
            ids: Some(vec![]),
            kinds: vec![],
            level: None,
        }
    }

    fn encode(&self, enc: &mut wrapped::WrappedEncoder<Vec<u8>>) -> Result<(), EncodeError> {
        enc.encode(
            &self.shorts,
            &self.ints,
            &self.longs,
            &self.ports,
            &self.counters,
            &self.ratio,
            &self.weights,
            &self.price,
            &self.amounts,
            &self.balances,
            &self.days,
            &self.stamps,
            &self.code,
            &self.ids,
            &self.kinds,
            &self.level,
        )
    }

    fn bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut enc = wrapped::WrappedEncoder::new(Vec::new());
        self.encode(&mut enc)?;
        Ok(enc.into_inner())
    }

    fn oracle(&self) -> Vec<Value> {
        wrapped::WrappedTestEncoder::row(
            &self.shorts,
            &self.ints,
            &self.longs,
            &self.ports,
            &self.counters,
            &self.ratio,
            &self.weights,
            &self.price,
            &self.amounts,
            &self.balances,
            &self.days,
            &self.stamps,
            &self.code,
            &self.ids,
            &self.kinds,
            &self.level,
        )
    }
}

fn txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn wrapped_leaves_encode_exact_bytes() {
    let mut want: Vec<u8> = Vec::new();
    // shorts
    want.extend([0x02, 0xfe, 0xff, 0x2c, 0x01]);
    // ints
    want.extend([0x00, 0xff, 0xff, 0xff, 0xff]);
    // longs
    want.extend([0x02, 0x00, 0x05, 0, 0, 0, 0, 0, 0, 0, 0x01]);
    // ports
    want.push(0x01);
    // counters
    want.push(0x01);
    want.extend([0xff; 8]);
    // ratio
    want.extend([0x00, 0x00, 0x00, 0x80, 0x3f]);
    // weights
    want.push(0x00);
    // price
    want.extend([0x00, 0x6a, 0xff, 0xff, 0xff]);
    // amounts
    want.extend([0x01, 0xd2, 0x04, 0, 0, 0, 0, 0, 0]);
    // balances: low word then high word per element
    want.extend([0x03, 0x00, 0x01]);
    want.extend([0x00; 15]);
    want.push(0x01);
    want.push(0x00);
    want.extend([0xff; 16]);
    // days
    want.extend([0x02, 0x00, 0x00, 0x68, 0x42]);
    // stamps
    want.extend([0x02, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00]);
    // code
    want.extend([0x00, b'z', b'z']);
    // ids
    want.extend([0x00, 0x01]);
    want.extend([0x07; 16]);
    // kinds
    want.extend([0x02, 0x01, 0x02]);
    // level
    want.extend([0x00, 0x18, 0xfc]);

    assert_eq!(Row::full().bytes().expect("encode"), want);
}

#[test]
fn absent_and_empty_wrappers_encode_exact_bytes() {
    let mut want: Vec<u8> = vec![0x00, 0x01, 0x00, 0x00, 0x90, 0x1f, 0x00, 0x01];
    want.extend([0x01, 0, 0, 0, 0, 0, 0, 0xe0, 0x3f]);
    want.extend([0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(Row::sparse().bytes().expect("encode"), want);
}

#[test]
fn wrapped_leaves_produce_nested_oracle_values() {
    assert_eq!(
        Row::full().oracle(),
        vec![
            Value::Array(vec![Value::Int(-2), Value::Int(300)]),
            Value::Int(-1),
            Value::Array(vec![Value::Int(5), Value::Null]),
            Value::Null,
            Value::Array(vec![Value::UInt(u64::MAX)]),
            Value::Float(1.0),
            Value::Array(vec![]),
            Value::Decimal(decimal32(2, -150)),
            Value::Array(vec![Value::Decimal(decimal64(3, 1234))]),
            Value::Array(vec![
                Value::Decimal(decimal128(2, 1)),
                Value::Null,
                Value::Decimal(decimal128(2, -1)),
            ]),
            Value::Array(vec![txt("1970-01-01"), txt("2016-07-18")]),
            Value::Array(vec![
                Value::Array(vec![txt("1970-01-01T03:00:00"), Value::Null]),
                Value::Array(vec![]),
            ]),
            txt("zz"),
            Value::Array(vec![txt("07070707-0707-0707-0707-070707070707")]),
            Value::Array(vec![txt("x"), txt("y")]),
            txt("lo"),
        ]
    );
}

#[test]
fn absent_and_empty_wrappers_produce_oracle_values() {
    let empty = || Value::Array(vec![]);
    assert_eq!(
        Row::sparse().oracle(),
        vec![
            empty(),
            Value::Null,
            empty(),
            Value::UInt(8080),
            empty(),
            Value::Null,
            Value::Array(vec![Value::Float(0.5)]),
            Value::Null,
            empty(),
            empty(),
            empty(),
            empty(),
            Value::Null,
            empty(),
            empty(),
            Value::Null,
        ]
    );
}

#[test]
fn nullable_fixed_string_checks_present_value() {
    let mut row = Row::full();
    row.code = Some("z".to_string());
    let mut enc = wrapped::WrappedEncoder::new(Vec::new());
    match row.encode(&mut enc) {
        Err(EncodeError::FixedStringLength {
            field,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(field, "code");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(enc.into_inner().is_empty());

    row.code = None;
    assert!(row.bytes().is_ok());
}

#[test]
#[should_panic(expected = "value 3 has no key mapped to in enum kinds")]
fn unmapped_code_inside_array_panics() {
    let mut row = Row::full();
    row.kinds = vec![1, 3];
    row.oracle();
}
