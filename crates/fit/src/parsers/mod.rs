// All nom parsers split amoung files for organisation
mod labels;
mod values;

// Internal re-exports for convenience
pub(crate) use labels::*;
pub(crate) use values::*;

use crate::field::Field;

use gtools_utils::f;
use log::{debug, warn};
use nom::IResult;

/// Signature shared by every label recogniser
pub(crate) type Label = fn(&str) -> IResult<&str, ()>;

/// Extraction rule for a single labelled field
///
/// Each field of a report is found by its own rule. The label locates the
/// line, the value parser reads whatever follows the label, and the
/// validator decides whether the value can be trusted.
pub(crate) struct Rule<T> {
    /// Human readable name used in warnings
    pub name: &'static str,
    /// Recognises the label and its `=`/`:` separator
    pub label: Label,
    /// Parses the value directly following the separator
    pub value: fn(&str) -> IResult<&str, T>,
    /// Physical sanity checks on the parsed value
    pub validate: fn(&T) -> Result<(), String>,
}

/// Split raw report text into lines
///
/// Some reports were written with literal `\n` escape sequences rather than
/// real line breaks. Both forms, and any windows line endings, are normalised
/// before splitting.
pub(crate) fn normalise(text: &str) -> String {
    text.replace("\r\n", "\n").replace("\\n", "\n")
}

/// Find the first occurrence of a label in a line and return what follows
///
/// Labels are only tried at word boundaries so that `mu` is never found
/// inside words like `simulation`.
pub(crate) fn search(line: &str, label: Label) -> Option<&str> {
    let mut previous: Option<char> = None;
    for (idx, c) in line.char_indices() {
        if !previous.is_some_and(|p| p.is_alphanumeric()) {
            if let Ok((remainder, _)) = label(&line[idx..]) {
                return Some(remainder);
            }
        }
        previous = Some(c);
    }
    None
}

/// Apply a rule to every line, keeping the first valid value
///
/// A line with the label but an unusable value is remembered in case nothing
/// better turns up, in which case the field is `Invalid` rather than
/// `Missing`.
pub(crate) fn extract<T: std::fmt::Debug>(lines: &[&str], rule: &Rule<T>) -> Field<T> {
    let mut failure: Option<String> = None;

    for line in lines {
        let Some(remainder) = search(line, rule.label) else {
            continue;
        };

        let reason = match (rule.value)(remainder) {
            Ok((_, value)) => match (rule.validate)(&value) {
                Ok(()) => {
                    debug!("{:<10} = {:?}", rule.name, value);
                    return Field::Parsed(value);
                }
                Err(reason) => reason,
            },
            Err(_) => f!("unable to parse {} from \"{}\"", rule.name, line.trim()),
        };

        warn!("{reason}");
        if failure.is_none() {
            failure = Some(reason);
        }
    }

    match failure {
        Some(reason) => Field::Invalid(reason),
        None => Field::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_newlines() {
        assert_eq!(normalise("a\\nb\r\nc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn label_word_boundary() {
        // 'mu' inside another word is not a label
        assert_eq!(search("Simulation mu = 1", mu_label), Some(" 1"));
        assert_eq!(search("Simumu = 1", mu_label), None);
    }

    #[test]
    fn first_valid_value_wins() {
        let lines = ["R² = 4.2", "R² = 0.95", "R² = 0.80"];
        assert_eq!(extract(&lines, &R_SQUARED), Field::Parsed(0.95));
    }

    #[test]
    fn invalid_is_kept_over_missing() {
        let lines = ["R² = abc"];
        assert!(extract(&lines, &R_SQUARED).is_invalid());

        let lines = ["nothing to see here"];
        assert!(extract(&lines, &R_SQUARED).is_missing());
    }
}
