use bubbletea_typeahead::normalize::{contains_normalized, normalize};
use bubbletea_typeahead::typeahead::{
    CandidateSource, FieldNames, MatchFilter, SelectionModel, SuggestionPipeline,
};
use proptest::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

// Latin text with accents, mixed case and padding
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("".to_string()),
        "[a-zA-Z ]{0,20}",
        "[ \t]{0,3}[a-zA-Z\u{00C0}-\u{00D6}\u{00D8}-\u{00F6}\u{00F8}-\u{00FF}]{1,12}[ \t]{0,3}",
    ]
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("".to_string()), "[a-eA-E]{1,2}", "[àáâãäèéê]{1}"]
}

proptest! {
    #[test]
    fn prop_normalize_idempotent(s in text_strategy()) {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }

    #[test]
    fn prop_normalize_ignores_ascii_case(s in "[a-z ]{0,20}") {
        prop_assert_eq!(normalize(&s.to_uppercase()), normalize(&s));
    }

    #[test]
    fn prop_matches_bounded_ordered_and_contain_query(
        names in prop::collection::vec(text_strategy(), 0..30),
        query in query_strategy(),
        limit in 1usize..8,
    ) {
        let source = CandidateSource::from_list(names.clone());
        let fields = FieldNames::default();
        let mut pipeline = SuggestionPipeline::new(Duration::from_millis(0), Some(limit));
        let _ = pipeline.push_input(&query);
        pipeline.trigger(&source, MatchFilter { fields: &fields, excluded: &[] });

        let wanted = normalize(&query);
        let matches = pipeline.matches();
        prop_assert!(matches.len() <= limit);

        let expected: Vec<String> = names
            .iter()
            .filter(|n| contains_normalized(n, &wanted))
            .take(limit)
            .cloned()
            .collect();
        let got: Vec<String> = matches.iter().map(|c| c.display_name(&fields)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_excluded_never_suggested(
        names in prop::collection::vec("[a-c]{1,3}", 1..15),
        pick in 0usize..15,
    ) {
        let excluded = vec![Value::String(names[pick % names.len()].clone())];
        let source = CandidateSource::from_list(names.clone());
        let fields = FieldNames::default();
        let mut pipeline = SuggestionPipeline::new(Duration::from_millis(0), None);
        let _ = pipeline.push_input("");
        pipeline.trigger(&source, MatchFilter { fields: &fields, excluded: &excluded });

        for candidate in pipeline.matches().iter() {
            prop_assert_ne!(&candidate.identity(&fields), &excluded[0]);
        }
    }

    #[test]
    fn prop_tags_unique_and_removable(tags in prop::collection::vec(text_strategy(), 0..12)) {
        let mut selection = SelectionModel::new(true);
        for tag in &tags {
            selection.add_value(Value::String(tag.clone()));
        }

        let distinct: HashSet<String> = tags.iter().map(|t| normalize(t)).collect();
        prop_assert_eq!(selection.value().identities().len(), distinct.len());

        for tag in &tags {
            selection.remove_value(&Value::String(tag.clone()));
        }
        prop_assert!(selection.value().is_empty());
    }
}
