//! Property tests for casebook-core keys and connection types.

use proptest::prelude::*;

use casebook_core::models::{connection_key, contradiction_key, ConnectionType};

/// Short ids drawn from an alphabet that includes the key separator and its escape.
fn id_strategy() -> impl Strategy<Value = String> {
    "[ab|\\\\]{0,4}"
}

fn unordered(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

proptest! {
    #[test]
    fn contradiction_key_ignores_testimony_order(
        fact in id_strategy(),
        a in id_strategy(),
        b in id_strategy(),
    ) {
        prop_assert_eq!(contradiction_key(&fact, &a, &b), contradiction_key(&fact, &b, &a));
    }

    #[test]
    fn contradiction_keys_collide_only_for_the_same_pair(
        left in (id_strategy(), id_strategy(), id_strategy()),
        right in (id_strategy(), id_strategy(), id_strategy()),
    ) {
        let same = left.0 == right.0 && unordered(&left.1, &left.2) == unordered(&right.1, &right.2);
        prop_assert_eq!(
            contradiction_key(&left.0, &left.1, &left.2) == contradiction_key(&right.0, &right.1, &right.2),
            same
        );
    }

    #[test]
    fn connection_type_parse_is_stable(raw in "[ a-zA-Z_]{0,12}") {
        let parsed = ConnectionType::parse(&raw);
        let rendered: String = parsed.clone().into();
        prop_assert_eq!(&rendered, &raw.trim().to_ascii_lowercase());
        prop_assert_eq!(ConnectionType::from(rendered), parsed);
    }

    #[test]
    fn connection_key_ignores_endpoint_padding(
        from in "[a-z]{1,6}",
        to in "[a-z]{1,6}",
        pad in " {0,3}",
    ) {
        let kind = ConnectionType::Supports;
        prop_assert_eq!(
            connection_key(&format!("{pad}{from}{pad}"), &format!("{pad}{to}"), &kind),
            connection_key(&from, &to, &kind)
        );
    }
}
