// In: src/chunk_pipeline/traits.rs

//! Defines the behavioral traits for value transforms and document sinks.
//!
//! `TransformKind` only names a transform. The `TransformBehavior` impl below
//! is the single source of truth for what each kind does to a canonical value.
//! Because the dispatch is an exhaustive `match`, adding a kind without
//! defining its behaviour does not compile.
//!
//! Every path here is total. A value that cannot be coerced becomes `null`
//! (or an empty array for array kinds fed a null), never an error.

use serde_json::{Number, Value};

use crate::chunk_pipeline::models::{ScalarKind, TransformKind};
use crate::error::CollectError;
use crate::kernels::{curve, delimited, hex, scalar};
use crate::types::{CanonicalValue, Document};

/// A trait implemented by every transform, declaring its effect on one value.
pub trait TransformBehavior {
    fn apply(&self, value: CanonicalValue) -> Value;
}

/// **CONTRACT:** receives finished documents one at a time, in output order.
///
/// The orchestrator hands each document over as soon as it is assembled and
/// keeps no reference to it afterwards.
pub trait DocumentSink {
    fn write_document(&mut self, doc: &Document) -> Result<(), CollectError>;
}

impl DocumentSink for Vec<Document> {
    fn write_document(&mut self, doc: &Document) -> Result<(), CollectError> {
        self.push(doc.clone());
        Ok(())
    }
}

fn float_json(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

fn opt_json<T: Into<Value>>(v: Option<T>) -> Value {
    v.map(Into::into).unwrap_or(Value::Null)
}

impl TransformBehavior for ScalarKind {
    fn apply(&self, value: CanonicalValue) -> Value {
        use CanonicalValue as V;

        match (self, value) {
            (_, V::Null) => Value::Null,

            //======================================================================
            // Group 1: Numeric coercions.
            //======================================================================
            (ScalarKind::Int, V::Integer(i)) => Value::from(i),
            (ScalarKind::Int, V::Float(f)) => opt_json(scalar::float_to_int(f)),
            (ScalarKind::Int, V::String(s)) => opt_json(scalar::parse_int(&s)),
            (ScalarKind::Int, V::Boolean(b)) => Value::from(i64::from(b)),

            (ScalarKind::Float, V::Integer(i)) => float_json(i as f64),
            (ScalarKind::Float, V::Float(f)) => float_json(f),
            (ScalarKind::Float, V::String(s)) => {
                scalar::parse_float(&s).map(float_json).unwrap_or(Value::Null)
            }
            (ScalarKind::Float, V::Boolean(b)) => float_json(if b { 1.0 } else { 0.0 }),

            //======================================================================
            // Group 2: Text and boolean coercions.
            //======================================================================
            (ScalarKind::String, V::String(s)) => Value::String(scalar::clean_string(&s)),
            (ScalarKind::String, V::Integer(i)) => Value::String(i.to_string()),
            (ScalarKind::String, V::Float(f)) => Value::String(f.to_string()),
            (ScalarKind::String, V::Boolean(b)) => Value::String(b.to_string()),
            (ScalarKind::String, V::DateTime(dt)) => Value::String(scalar::format_datetime(&dt)),
            (ScalarKind::String, V::Binary(bytes)) => Value::String(hex::blob_to_hex(&bytes)),

            (ScalarKind::Bool, V::Boolean(b)) => Value::Bool(b),
            (ScalarKind::Bool, V::Integer(i)) => Value::Bool(i != 0),
            (ScalarKind::Bool, V::Float(f)) if f.is_finite() => Value::Bool(f != 0.0),
            (ScalarKind::Bool, V::String(s)) => opt_json(scalar::parse_bool(&s)),

            //======================================================================
            // Group 3: Datetime coercions.
            //======================================================================
            (ScalarKind::DateTime, V::DateTime(dt)) => Value::String(scalar::format_datetime(&dt)),
            (ScalarKind::DateTime, V::String(s)) => scalar::parse_datetime(&s)
                .map(|dt| Value::String(scalar::format_datetime(&dt)))
                .unwrap_or(Value::Null),

            // Everything else has no sensible reading in the target type.
            _ => Value::Null,
        }
    }
}

/// Decodes a `LIST(...)` value and coerces each element with `element`.
fn decode_array(element: ScalarKind, value: CanonicalValue) -> Value {
    let text = match value {
        CanonicalValue::Null => return Value::Array(Vec::new()),
        CanonicalValue::String(s) => s,
        CanonicalValue::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        // A typed scalar means the driver collapsed a one-element list.
        other => return Value::Array(vec![element.apply(other)]),
    };
    let items = delimited::split_delimited(&text)
        .into_iter()
        .map(|item| match item {
            Some(s) => element.apply(CanonicalValue::String(s.to_string())),
            None => Value::Null,
        })
        .collect();
    Value::Array(items)
}

impl TransformBehavior for TransformKind {
    /// This implementation is the single source of truth for the behavior of all transforms.
    fn apply(&self, value: CanonicalValue) -> Value {
        match self {
            TransformKind::Identity => value.into_json(),
            TransformKind::Scalar(kind) => kind.apply(value),
            TransformKind::Memo => match value {
                CanonicalValue::String(s) => Value::String(scalar::memo_string(&s)),
                other => ScalarKind::String.apply(other),
            },
            TransformKind::ArrayOf(kind) => decode_array(*kind, value),
            TransformKind::DecodeCurveValues => match value {
                CanonicalValue::Null => Value::Array(Vec::new()),
                CanonicalValue::Binary(bytes) => match curve::decode_curve_values(&bytes) {
                    Some(samples) => Value::Array(
                        samples.into_iter().map(|f| float_json(f64::from(f))).collect(),
                    ),
                    None => Value::Null,
                },
                _ => Value::Null,
            },
            TransformKind::BlobToHex => match value {
                CanonicalValue::Binary(bytes) => Value::String(hex::blob_to_hex(&bytes)),
                _ => Value::Null,
            },
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn text(s: &str) -> CanonicalValue {
        CanonicalValue::String(s.to_string())
    }

    #[test]
    fn test_array_of_string_null_sentinel() {
        let kind = TransformKind::ArrayOf(ScalarKind::String);
        let out = kind.apply(text("A_purrDELIM_ _purrNULL__purrDELIM_C"));
        assert_eq!(out, json!(["A", null, "C"]));
    }

    #[test]
    fn test_array_of_null_or_blank_is_empty() {
        let kind = TransformKind::ArrayOf(ScalarKind::Float);
        assert_eq!(kind.apply(CanonicalValue::Null), json!([]));
        assert_eq!(kind.apply(text("")), json!([]));
    }

    #[test]
    fn test_array_elements_coerce_independently() {
        let kind = TransformKind::ArrayOf(ScalarKind::Int);
        assert_eq!(
            kind.apply(text("1_purrDELIM_x_purrDELIM__purrNULL__purrDELIM_4")),
            json!([1, null, null, 4])
        );

        let kind = TransformKind::ArrayOf(ScalarKind::DateTime);
        assert_eq!(
            kind.apply(text("2020-01-02 03:04:05.000_purrDELIM_2021-06-07")),
            json!(["2020-01-02 03:04:05", "2021-06-07 00:00:00"])
        );
    }

    #[test]
    fn test_scalar_coercion_failure_is_null() {
        assert_eq!(TransformKind::Scalar(ScalarKind::Int).apply(text("n/a")), Value::Null);
        assert_eq!(TransformKind::Scalar(ScalarKind::Float).apply(CanonicalValue::Float(f64::NAN)), Value::Null);
        assert_eq!(TransformKind::Scalar(ScalarKind::Bool).apply(text("perhaps")), Value::Null);
        assert_eq!(TransformKind::Scalar(ScalarKind::DateTime).apply(CanonicalValue::Integer(5)), Value::Null);
    }

    #[test]
    fn test_scalar_coercions() {
        assert_eq!(TransformKind::Scalar(ScalarKind::Int).apply(CanonicalValue::Float(3.9)), json!(3));
        assert_eq!(TransformKind::Scalar(ScalarKind::Float).apply(text(" 2.5 ")), json!(2.5));
        assert_eq!(TransformKind::Scalar(ScalarKind::Bool).apply(CanonicalValue::Integer(0)), json!(false));
        assert_eq!(TransformKind::Scalar(ScalarKind::String).apply(text("  x\u{0001}y ")), json!("xy"));
        let dt = NaiveDate::from_ymd_opt(2001, 2, 3).unwrap().and_hms_opt(4, 5, 6).unwrap();
        assert_eq!(
            TransformKind::Scalar(ScalarKind::DateTime).apply(CanonicalValue::DateTime(dt)),
            json!("2001-02-03 04:05:06")
        );
    }

    #[test]
    fn test_curve_decode() {
        let mut payload = vec![0u8, 0u8];
        payload.extend_from_slice(&1.5f32.to_le_bytes());
        payload.extend_from_slice(&(-2.0f32).to_le_bytes());
        let out = TransformKind::DecodeCurveValues.apply(CanonicalValue::Binary(payload));
        assert_eq!(out, json!([1.5, -2.0]));
        assert_eq!(TransformKind::DecodeCurveValues.apply(CanonicalValue::Null), json!([]));
        assert_eq!(TransformKind::DecodeCurveValues.apply(CanonicalValue::Binary(vec![9])), Value::Null);
        assert_eq!(TransformKind::DecodeCurveValues.apply(text("abc")), Value::Null);
    }

    #[test]
    fn test_blob_to_hex_and_identity() {
        let bytes = CanonicalValue::Binary(vec![0xde, 0xad]);
        assert_eq!(TransformKind::BlobToHex.apply(bytes.clone()), json!("0xdead"));
        assert_eq!(TransformKind::BlobToHex.apply(CanonicalValue::Null), Value::Null);
        assert_eq!(TransformKind::Identity.apply(bytes), json!("0xdead"));
        assert_eq!(TransformKind::Identity.apply(text(" raw ")), json!(" raw "));
    }

    #[test]
    fn test_memo_keeps_spacing() {
        assert_eq!(TransformKind::Memo.apply(text(" a\nb ")), json!(" ab "));
        assert_eq!(TransformKind::Memo.apply(CanonicalValue::Null), Value::Null);
    }
}
