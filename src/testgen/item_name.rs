use super::GenerateError;

/// Turn an arbitrary case description into a Rust item name.
///
/// Lowercases, maps spaces to underscores, drops anything outside
/// `[a-z0-9_]` and strips leading digits. Applying it to its own output is a
/// no-op.
pub fn to_item_name(description: &str) -> Result<String, GenerateError> {
    let item: String = description
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();
    let item = item.trim_start_matches(|c: char| c.is_ascii_digit());

    if item.is_empty() {
        return Err(GenerateError::EmptyItemName {
            description: description.to_string(),
        });
    }
    Ok(item.to_string())
}

/// Crate names use underscores where exercise slugs use dashes.
pub fn to_crate_name(exercise: &str) -> String {
    exercise.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_leading_digits_and_punctuation() {
        assert_eq!(to_item_name("1st edge case!").unwrap(), "st_edge_case");
    }

    #[test]
    fn lowercases_and_joins_words() {
        assert_eq!(
            to_item_name("Reverses a Sentence").unwrap(),
            "reverses_a_sentence"
        );
        assert_eq!(to_item_name("year 1900 (not leap)").unwrap(), "year_1900_not_leap");
    }

    #[test]
    fn keeps_leading_underscores() {
        assert_eq!(to_item_name(" 1 leading").unwrap(), "_1_leading");
    }

    #[test]
    fn empty_result_is_an_error() {
        for input in ["", "123", "!!!", "ñ"] {
            let err = to_item_name(input).unwrap_err();
            assert!(matches!(err, GenerateError::EmptyItemName { ref description } if description == input));
        }
    }

    #[test]
    fn crate_names() {
        assert_eq!(to_crate_name("parallel-letter-frequency"), "parallel_letter_frequency");
        assert_eq!(to_crate_name("grep"), "grep");
    }

    proptest! {
        #[test]
        fn sanitizing_is_idempotent(description in "\\PC{0,40}") {
            if let Ok(item) = to_item_name(&description) {
                prop_assert_eq!(to_item_name(&item).unwrap(), item);
            }
        }

        #[test]
        fn output_is_a_plain_identifier(description in "[ -~]{0,40}") {
            if let Ok(item) = to_item_name(&description) {
                prop_assert!(!item.starts_with(|c: char| c.is_ascii_digit()));
                prop_assert!(item.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            }
        }
    }
}
