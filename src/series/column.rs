//! JSON encoding of a numeric column
//!
//! JSON has no representation for NaN or infinities, and `serde_json` writes them as `null`,
//! which cannot be read back as `f64`. Finite values are written as numbers, and non-finite
//! ones as the strings `"NaN"`, `"inf"` and `"-inf"`.
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

const NAN: &str = "NaN";
const INFINITY: &str = "inf";
const NEG_INFINITY: &str = "-inf";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Sample {
    Number(f64),
    Special(String),
}

fn encode(value: f64) -> Sample {
    if value.is_finite() {
        Sample::Number(value)
    } else if value.is_nan() {
        Sample::Special(NAN.to_string())
    } else if value.is_sign_positive() {
        Sample::Special(INFINITY.to_string())
    } else {
        Sample::Special(NEG_INFINITY.to_string())
    }
}

fn decode(sample: Sample) -> std::result::Result<f64, String> {
    match sample {
        Sample::Number(value) => Ok(value),
        Sample::Special(tag) => match tag.as_str() {
            NAN => Ok(f64::NAN),
            INFINITY => Ok(f64::INFINITY),
            NEG_INFINITY => Ok(f64::NEG_INFINITY),
            _ => Err(format!("expected a number, \"{NAN}\", \"{INFINITY}\" or \"{NEG_INFINITY}\", got \"{tag}\"")),
        },
    }
}

pub(super) fn serialize<S: Serializer>(
    values: &[f64],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(values.iter().map(|&v| encode(v)))
}

pub(super) fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<f64>, D::Error> {
    Vec::<Sample>::deserialize(deserializer)?
        .into_iter()
        .map(|sample| decode(sample).map_err(D::Error::custom))
        .collect()
}

/// A borrowed column, for writing
#[derive(Serialize)]
pub(super) struct ColumnRef<'a>(#[serde(serialize_with = "serialize")] pub &'a [f64]);

/// An owned column, for reading
#[derive(Deserialize)]
pub(super) struct Column(#[serde(deserialize_with = "deserialize")] pub Vec<f64>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_values_survive() {
        let values = [1.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -0.25];
        let json = serde_json::to_string(&ColumnRef(&values)).unwrap();
        assert_eq!(json, r#"[1.5,"NaN","inf","-inf",-0.25]"#);

        let Column(back) = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), values.len());
        assert_eq!(back[0], 1.5);
        assert!(back[1].is_nan());
        assert_eq!(back[2], f64::INFINITY);
        assert_eq!(back[3], f64::NEG_INFINITY);
        assert_eq!(back[4], -0.25);
    }

    #[test]
    fn test_integers_and_bad_tags() {
        let Column(values) = serde_json::from_str("[1, 2.5, -3]").unwrap();
        assert_eq!(values, vec![1.0, 2.5, -3.0]);

        assert!(serde_json::from_str::<Column>(r#"["infinity"]"#).is_err());
        assert!(serde_json::from_str::<Column>("[null]").is_err());
    }
}
