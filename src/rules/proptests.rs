//! Property-based tests for the classifier

use super::*;
use proptest::prelude::*;

/// Keywords use letters only so digit-only input can never match
fn arb_keyword() -> impl Strategy<Value = String> {
    "[a-z]{2,6}"
}

fn arb_table() -> impl Strategy<Value = RuleTable> {
    proptest::collection::vec(
        (proptest::collection::vec(arb_keyword(), 1..4), "[a-z ]{1,20}"),
        1..6,
    )
    .prop_map(|rules| {
        let mut builder = RuleTable::builder("generated")
            .greeting("hello", vec![])
            .fallback("fallback", vec![]);
        for (keywords, response) in rules {
            builder = builder.rule(keywords, response, vec![]);
        }
        builder.build().unwrap()
    })
}

proptest! {
    #[test]
    fn prop_classify_is_deterministic(table in arb_table(), input in "[a-zA-Z0-9 ]{0,40}") {
        let first = classify(&input, &table);
        let second = classify(&input, &table);
        prop_assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn prop_unmatched_input_hits_fallback(table in arb_table(), input in "[0-9 ]{0,40}") {
        prop_assert_eq!(classify(&input, &table), table.fallback());
    }

    #[test]
    fn prop_first_declared_rule_wins(table in arb_table(), pad in "[0-9]{0,5}") {
        // Contains a keyword of every rule
        let input: String = table
            .rules()
            .iter()
            .map(|rule| rule.keywords[0].as_str())
            .collect::<Vec<_>>()
            .join(&pad);
        prop_assert!(std::ptr::eq(classify(&input, &table), &table.rules()[0]));
    }

    #[test]
    fn prop_matching_ignores_case(table in arb_table(), idx in any::<prop::sample::Index>()) {
        let rule = idx.get(table.rules());
        let input = rule.keywords[0].to_uppercase();
        let chosen = classify(&input, &table);
        prop_assert!(chosen.matches(&input.to_lowercase()));
        prop_assert_ne!(chosen, table.fallback());
    }
}
