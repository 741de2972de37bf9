#[cfg(test)]
mod tests {
    use crate::sanitize::{
        only_digits, only_digits_and_letters, only_digits_and_plus, only_h_or_e, only_letters,
    };
    use proptest::prelude::*;

    const GERMAN_LETTERS: &str = "äöüßÄÖÜ";

    fn is_german_letter(c: char) -> bool {
        c.is_ascii_alphabetic() || GERMAN_LETTERS.contains(c)
    }

    proptest! {
        // Filtering twice changes nothing
        #[test]
        fn test_filters_are_idempotent(input in any::<String>()) {
            let once = only_digits(&input);
            prop_assert_eq!(only_digits(&once), once);

            let once = only_letters(&input);
            prop_assert_eq!(only_letters(&once), once);

            let once = only_digits_and_letters(&input);
            prop_assert_eq!(only_digits_and_letters(&once), once);

            let once = only_digits_and_plus(&input);
            prop_assert_eq!(only_digits_and_plus(&once), once);
        }

        // Output is exactly the input's characters from the alphabet, in order
        #[test]
        fn test_digits_alphabet(input in any::<String>()) {
            let expected: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
            prop_assert_eq!(only_digits(&input), expected);
        }

        #[test]
        fn test_letters_alphabet(input in "[a-zA-Z0-9äöüßÄÖÜéÉ .,-]{0,40}") {
            let expected: String = input.chars().filter(|c| is_german_letter(*c)).collect();
            prop_assert_eq!(only_letters(&input), expected);
        }

        #[test]
        fn test_h_or_e_alphabet(input in any::<String>()) {
            let filtered = only_h_or_e(&input);
            prop_assert!(filtered.chars().all(|c| c == 'H' || c == 'E'));
        }
    }
}
