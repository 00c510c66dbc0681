// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property-based tests spanning `wc-errors` and `wc-field`.

use proptest::prelude::*;
use wc_errors::{Format, ResultExt, inspect};
use wc_field::{Aggregate, ErrorList, FieldError, Path};

fn field_errors() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 1..6)
}

fn aggregate(entries: &[(String, i64)]) -> Aggregate {
    let list: ErrorList = entries
        .iter()
        .map(|(name, value)| FieldError::invalid(&Path::new("spec").child(name.as_str()), *value, ""))
        .collect();
    list.to_aggregate().unwrap()
}

// ── 1. Wrapping never changes what the aggregate says ───────────────

proptest! {
    #[test]
    fn aggregate_survives_wrapping(entries in field_errors(), context in "[a-z ]{1,20}") {
        let agg = aggregate(&entries);
        let expected = agg.to_string();
        let err = Err::<(), _>(agg).wrap(context.clone()).unwrap_err();

        prop_assert_eq!(err.to_string(), context);
        prop_assert_eq!(inspect::root_cause(&err).to_string(), expected.clone());
        prop_assert_eq!(inspect::find::<Aggregate>(&err).map(|a| a.to_string()), Some(expected));
    }
}

// ── 2. JSON stays parseable for arbitrary field values ──────────────

proptest! {
    #[test]
    fn json_is_parseable(entries in field_errors(), code in 22_500i32..22_600) {
        let err = Err::<(), _>(aggregate(&entries)).wrapc(code, "validation").unwrap_err();
        let text = err.display(Format::Json).to_string();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        prop_assert_eq!(&parsed[0]["code"], &serde_json::json!(code));
    }
}
