//! Query-string codec for `DosageInput`.
//!
//! The query string is the only state Dosemix persists or transmits:
//! one `key=value` pair per field, in `Field::ALL` order.

use crate::{DosageInput, Field};
use url::{form_urlencoded, Url};

/// Encode `input` as a query string (without the leading `?`)
///
/// Values use the shortest decimal form that parses back to the same
/// number, with no exponent and no separators.
pub fn serialize(input: &DosageInput) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (field, value) in input.values() {
        serializer.append_pair(field.key(), &value.to_string());
    }
    serializer.finish()
}

/// Decode a query string, falling back to `defaults` field by field
///
/// A leading `?` is accepted. Unknown keys are ignored, and values that
/// are missing, unparsable or not finite keep the default. When a key
/// appears twice the first occurrence wins. Never fails.
pub fn deserialize(query: &str, defaults: &DosageInput) -> DosageInput {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut input = *defaults;
    let mut seen = [false; Field::ALL.len()];

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let Some(field) = Field::from_key(&key) else {
            tracing::trace!("Ignoring unknown query key {:?}", key);
            continue;
        };

        let index = field as usize;
        if seen[index] {
            continue;
        }
        seen[index] = true;

        match parse_number(&value) {
            Some(number) => field.set(&mut input, number),
            None => tracing::debug!(
                "Unparsable value {:?} for {}, keeping default {}",
                value,
                field,
                field.get(defaults)
            ),
        }
    }

    input
}

/// True if `query` carries at least one recognized field key
pub fn has_recognized_key(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes()).any(|(key, _)| Field::from_key(&key).is_some())
}

/// Extract the query part of a full URL, or return `text` as a bare query
pub fn query_of(text: &str) -> String {
    match Url::parse(text.trim()) {
        Ok(url) if url.has_host() || url.query().is_some() => {
            url.query().unwrap_or_default().to_string()
        }
        _ => text.trim().trim_start_matches('?').to_string(),
    }
}

/// Decode the query part of a shared URL (or a bare query string)
pub fn from_url(text: &str, defaults: &DosageInput) -> DosageInput {
    deserialize(&query_of(text), defaults)
}

/// Parse a decimal number; `None` for garbage and non-finite values
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DosageInput {
        DosageInput {
            concentration_mg_ml: 25.0,
            daily_dose_mg_kgw: 12.5,
            weight_g: 412.0,
            treatment_length_days: 10.0,
            min_daily_dose_ml: 0.05,
        }
    }

    #[test]
    fn test_serialize_uses_stable_field_order() {
        let query = serialize(&DosageInput::default());
        assert_eq!(
            query,
            "concentration_mg_ml=100&daily_dose_mg_kgw=20&weight_g=350\
             &treatment_length_days=14&min_daily_dose_ml=0.2"
        );
    }

    #[test]
    fn test_serialize_has_no_exponent_or_separators() {
        let input = DosageInput {
            weight_g: 1_250_000.0,
            min_daily_dose_ml: 0.0000001,
            ..Default::default()
        };
        let query = serialize(&input);
        assert!(query.contains("weight_g=1250000&"));
        assert!(query.ends_with("min_daily_dose_ml=0.0000001"));
    }

    #[test]
    fn test_roundtrip_with_any_defaults() {
        let inputs = [
            sample(),
            DosageInput::default(),
            DosageInput {
                concentration_mg_ml: 0.1 + 0.2,
                daily_dose_mg_kgw: 1.0 / 3.0,
                weight_g: 87.65,
                treatment_length_days: 5.0,
                min_daily_dose_ml: 0.01,
            },
        ];

        for input in inputs {
            for defaults in [DosageInput::default(), sample()] {
                assert_eq!(deserialize(&serialize(&input), &defaults), input);
            }
        }
    }

    #[test]
    fn test_empty_or_garbage_returns_defaults() {
        let defaults = sample();
        for query in ["", "?", "garbage", "&&==&", "%%%", "foo=bar&baz"] {
            assert_eq!(deserialize(query, &defaults), defaults, "query {:?}", query);
        }
    }

    #[test]
    fn test_unparsable_values_fall_back_per_field() {
        let defaults = DosageInput::default();
        let input = deserialize(
            "?weight_g=abc&concentration_mg_ml=50&treatment_length_days=NaN&min_daily_dose_ml=inf",
            &defaults,
        );
        assert_eq!(input.weight_g, defaults.weight_g);
        assert_eq!(input.concentration_mg_ml, 50.0);
        assert_eq!(input.treatment_length_days, defaults.treatment_length_days);
        assert_eq!(input.min_daily_dose_ml, defaults.min_daily_dose_ml);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let input = deserialize("weight_g=200&weight_g=300", &DosageInput::default());
        assert_eq!(input.weight_g, 200.0);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let input = deserialize("utm_source=chat&weight_g=280", &DosageInput::default());
        assert_eq!(input.weight_g, 280.0);
        assert_eq!(input.concentration_mg_ml, 100.0);
    }

    #[test]
    fn test_has_recognized_key() {
        assert!(has_recognized_key("?weight_g=1"));
        assert!(has_recognized_key("a=1&min_daily_dose_ml=x"));
        assert!(!has_recognized_key(""));
        assert!(!has_recognized_key("?a=1&b=2"));
    }

    #[test]
    fn test_from_url_accepts_full_and_bare() {
        let defaults = DosageInput::default();
        let full = from_url(
            "https://example.org/dosage?weight_g=150&concentration_mg_ml=25#top",
            &defaults,
        );
        assert_eq!(full.weight_g, 150.0);
        assert_eq!(full.concentration_mg_ml, 25.0);

        let bare = from_url("?weight_g=150", &defaults);
        assert_eq!(bare.weight_g, 150.0);

        let no_query = from_url("https://example.org/dosage", &defaults);
        assert_eq!(no_query, defaults);
    }
}
