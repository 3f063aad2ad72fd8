//! Property-based tests for placeholder substitution
//!
//! Property: substitution is a single pass. Every placeholder is replaced by
//! exactly its resolved value, values are never re-scanned, and a placeholder
//! without a value is reported by name.

use proptest::prelude::*;
use scaffold_generation::{CaseTransform, ScaffoldError, SubstitutionContext, TemplateEngine};

/// Strategy for variable names
fn name_strategy() -> impl Strategy<Value = String> {
    r"[a-z][a-zA-Z0-9_]{0,10}".prop_map(|s| s.to_string())
}

/// Strategy for words joined by spaces
fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(r"[a-z]{1,6}", 1..4)
}

proptest! {
    /// Property: any value is emitted verbatim
    #[test]
    fn prop_value_emitted_verbatim(name in name_strategy(), value in ".{0,40}") {
        let context: SubstitutionContext = [(name.as_str(), value.as_str())].into_iter().collect();
        let template = format!("<{{{{{}}}}}>", name);

        let rendered = TemplateEngine::new()
            .render(&template, &context, "prop.txt")
            .expect("render failed");

        prop_assert_eq!(rendered, format!("<{}>", value));
    }

    /// Property: placeholder syntax inside a value is never expanded
    #[test]
    fn prop_values_not_rescanned(name in name_strategy(), inner in name_strategy()) {
        prop_assume!(name != inner);
        let value = format!("{{{{{}}}}}", inner);
        let mut context = SubstitutionContext::new();
        context.insert(name.clone(), value.clone());
        context.insert(inner.clone(), "EXPANDED");

        let rendered = TemplateEngine::new()
            .render(&format!("{{{{{}}}}}", name), &context, "prop.txt")
            .expect("render failed");

        prop_assert_eq!(rendered, value);
    }

    /// Property: text without placeholders renders unchanged
    #[test]
    fn prop_plain_text_unchanged(text in r"[^{\\]{0,80}") {
        let rendered = TemplateEngine::new()
            .render(&text, &SubstitutionContext::new(), "prop.txt")
            .expect("render failed");

        prop_assert_eq!(rendered, text);
    }

    /// Property: a placeholder without a value names itself in the error
    #[test]
    fn prop_unresolved_placeholder_reported(name in name_strategy()) {
        let err = TemplateEngine::new()
            .render(&format!("x {{{{{}}}}} y", name), &SubstitutionContext::new(), "prop.txt")
            .unwrap_err();

        match err {
            ScaffoldError::UnresolvedPlaceholder { placeholder, file } => {
                prop_assert_eq!(placeholder, name);
                prop_assert_eq!(file, "prop.txt");
            }
            other => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    /// Property: case filters join words with their separator
    #[test]
    fn prop_case_filters(words in words_strategy()) {
        let input = words.join(" ");

        prop_assert_eq!(CaseTransform::KebabCase.apply(&input), words.join("-"));
        prop_assert_eq!(CaseTransform::SnakeCase.apply(&input), words.join("_"));
        prop_assert_eq!(CaseTransform::UpperCase.apply(&input), input.to_uppercase());
    }

    /// Property: rendering is deterministic
    #[test]
    fn prop_rendering_deterministic(name in name_strategy(), value in "[a-zA-Z0-9 -]{0,20}") {
        let context: SubstitutionContext = [(name.as_str(), value.as_str())].into_iter().collect();
        let template = format!("{{{{{0}}}}} and {{{{{0}|pascal}}}}", name);
        let engine = TemplateEngine::new();

        let first = engine.render(&template, &context, "prop.txt").expect("render failed");
        let second = engine.render(&template, &context, "prop.txt").expect("render failed");

        prop_assert_eq!(first, second);
    }
}
