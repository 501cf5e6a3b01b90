//! Property-based tests for the round-trip codecs
//!
//! For every representable value `v`, decoding the encoding of `v` yields a
//! value identical to `v` (NaN equal to NaN).

use proptest::prelude::*;
use varinterop_value::{
    Array, ConversionMode, ContentId, FileValue, Value, ValueKind, convert, from_api_string,
    from_binary, to_api_string, to_binary,
};

fn any_real() -> impl Strategy<Value = f64> + Clone {
    prop_oneof![
        any::<f64>(),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(0.0),
        Just(-0.0),
        -1e6..1e6,
    ]
}

fn any_text() -> impl Strategy<Value = String> + Clone {
    prop_oneof![
        any::<String>(),
        "[a-z,\"\\\\{} \n\t]{0,12}",
    ]
}

fn shaped<T: Clone + std::fmt::Debug + 'static>(
    element: impl Strategy<Value = T> + Clone + 'static,
) -> impl Strategy<Value = Array<T>> {
    prop::collection::vec(0usize..4, 1..4).prop_flat_map(move |shape| {
        let count: usize = shape.iter().product();
        prop::collection::vec(element.clone(), count).prop_map(move |elements| {
            Array::from_shape(&shape, elements).expect("count matches shape")
        })
    })
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any_real().prop_map(Value::Real),
        any::<i64>().prop_map(Value::Integer),
        any::<bool>().prop_map(Value::Boolean),
        any_text().prop_map(Value::String),
        (any::<[u8; 32]>(), "[a-z]{0,8}(/[a-z]{1,8})?").prop_map(|(id, mime)| {
            Value::File(FileValue::new(ContentId::from_bytes(id), mime))
        }),
        shaped(any_real()).prop_map(Value::RealArray),
        shaped(any::<i64>()).prop_map(Value::IntegerArray),
        shaped(any::<bool>()).prop_map(Value::BooleanArray),
        shaped(any_text()).prop_map(Value::StringArray),
    ]
}

proptest! {
    #[test]
    fn api_string_round_trip(value in any_value()) {
        let text = to_api_string(&value);
        let back = from_api_string(&text, value.kind()).unwrap();
        prop_assert!(back.identical(&value), "{:?} -> {:?} -> {:?}", value, text, back);
    }

    #[test]
    fn binary_round_trip(value in any_value()) {
        let bytes = to_binary(&value).unwrap();
        let back = from_binary(&bytes, value.kind()).unwrap();
        prop_assert!(back.identical(&value));
    }

    #[test]
    fn integer_binary_is_eight_bytes(x in any::<i64>()) {
        let bytes = to_binary(&Value::Integer(x)).unwrap();
        prop_assert_eq!(bytes.len(), 8);
        prop_assert_eq!(from_binary(&bytes, ValueKind::Integer).unwrap(), Value::Integer(x));
    }

    #[test]
    fn binary_rejects_any_truncation(value in any_value()) {
        let bytes = to_binary(&value).unwrap();
        prop_assume!(!bytes.is_empty());
        let short = &bytes[..bytes.len() - 1];
        prop_assert!(from_binary(short, value.kind()).is_err());
    }

    #[test]
    fn real_to_integer_truncates(x in -1e15f64..1e15) {
        let converted = convert(&Value::Real(x), ValueKind::Integer, ConversionMode::AllowExplicit)
            .unwrap();
        prop_assert_eq!(converted, Value::Integer(x.trunc() as i64));
    }

    #[test]
    fn implicit_edges_never_fail(value in any_value()) {
        for target in ValueKind::ALL {
            if varinterop_value::ConversionEdge::between(value.kind(), target)
                == varinterop_value::ConversionEdge::Implicit
            {
                prop_assert!(convert(&value, target, ConversionMode::ImplicitOnly).is_ok());
            }
        }
    }
}
