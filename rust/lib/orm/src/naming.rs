//! Table-name derivation.

/// Derive a table name from a type name.
///
/// Splits before every uppercase letter that is not the first character,
/// lowercases each word, joins with `_` and appends `s`:
/// `QuestionFollow` becomes `question_follows`.
pub fn tableize(type_name: &str) -> String {
    let mut out = String::with_capacity(type_name.len() + 4);
    for (i, ch) in type_name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out.push('s');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word() {
        assert_eq!(tableize("User"), "users");
        assert_eq!(tableize("Question"), "questions");
    }

    #[test]
    fn camel_case_words_are_joined_with_underscores() {
        assert_eq!(tableize("QuestionFollow"), "question_follows");
        assert_eq!(tableize("QuestionLike"), "question_likes");
    }

    #[test]
    fn suffix_is_naive() {
        // Irregular plurals need an explicit override.
        assert_eq!(tableize("Reply"), "replys");
    }

    #[test]
    fn every_capital_starts_a_word() {
        assert_eq!(tableize("HTTPLog"), "h_t_t_p_logs");
    }
}
