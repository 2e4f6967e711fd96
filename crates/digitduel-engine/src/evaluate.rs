//! Guess evaluator: pure digit-by-digit comparison of a guess against a
//! secret.
//!
//! Deterministic and side-effect-free so it can be tested exhaustively
//! without any session state. Digits are extracted with integer division
//! and modulo rather than string formatting, so the result cannot depend
//! on locale or padding.

use digitduel_protocol::{DigitResult, Hint};

/// Smallest valid secret or guess.
pub const VALUE_MIN: u32 = 1000;
/// Largest valid secret or guess.
pub const VALUE_MAX: u32 = 9999;

/// Returns `true` if `value` is a valid 4-digit number.
pub fn in_range(value: u32) -> bool {
    (VALUE_MIN..=VALUE_MAX).contains(&value)
}

/// Decomposes a 4-digit number into its digits, thousands place first.
pub fn digits(value: u32) -> [u8; 4] {
    [
        (value / 1000) as u8,
        (value / 100 % 10) as u8,
        (value / 10 % 10) as u8,
        (value % 10) as u8,
    ]
}

/// Compares `guess` against `secret` position by position.
///
/// The hint convention is from the guesser's point of view: `Higher` means
/// the guessed digit must go higher to match (`guess_digit < target_digit`),
/// `Lower` means it must go lower.
///
/// Both inputs must already be validated with [`in_range`]; the caller is
/// responsible for rejecting out-of-range values before evaluation.
pub fn evaluate(guess: u32, secret: u32) -> [DigitResult; 4] {
    let guess_digits = digits(guess);
    let target_digits = digits(secret);

    std::array::from_fn(|i| {
        let guess_digit = guess_digits[i];
        let target_digit = target_digits[i];
        let hint = if guess_digit == target_digit {
            Hint::Correct
        } else if guess_digit < target_digit {
            Hint::Higher
        } else {
            Hint::Lower
        };
        DigitResult {
            position: i as u8,
            guess_digit,
            target_digit,
            correct: guess_digit == target_digit,
            hint,
        }
    })
}

/// Returns `true` if every position of an evaluation is correct.
pub fn all_correct(results: &[DigitResult; 4]) -> bool {
    results.iter().all(|r| r.correct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_bounds() {
        assert!(!in_range(999));
        assert!(in_range(1000));
        assert!(in_range(9999));
        assert!(!in_range(10000));
        assert!(!in_range(0));
    }

    #[test]
    fn test_digits_extracts_place_values() {
        assert_eq!(digits(1234), [1, 2, 3, 4]);
        assert_eq!(digits(9070), [9, 0, 7, 0]);
        assert_eq!(digits(1000), [1, 0, 0, 0]);
        assert_eq!(digits(9999), [9, 9, 9, 9]);
    }

    #[test]
    fn test_digits_reconstruct_original_value() {
        // Place values 1000/100/10/1 must reconstruct the input exactly.
        for value in [1000, 1234, 4242, 5678, 9999, 8006] {
            let d = digits(value);
            let rebuilt = d[0] as u32 * 1000
                + d[1] as u32 * 100
                + d[2] as u32 * 10
                + d[3] as u32;
            assert_eq!(rebuilt, value);
        }
    }

    #[test]
    fn test_evaluate_exact_match() {
        let results = evaluate(4242, 4242);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.position, i as u8);
            assert!(r.correct);
            assert_eq!(r.hint, Hint::Correct);
            assert_eq!(r.guess_digit, r.target_digit);
        }
        assert!(all_correct(&results));
    }

    #[test]
    fn test_evaluate_all_digits_low() {
        // Guess 1234 vs secret 5678: every guessed digit is below its
        // target, so every hint says Higher.
        let results = evaluate(1234, 5678);
        assert_eq!(results[0].guess_digit, 1);
        assert_eq!(results[0].target_digit, 5);
        for r in &results {
            assert!(!r.correct);
            assert_eq!(r.hint, Hint::Higher);
        }
        assert!(!all_correct(&results));
    }

    #[test]
    fn test_evaluate_all_digits_high() {
        let results = evaluate(5678, 1234);
        for r in &results {
            assert!(!r.correct);
            assert_eq!(r.hint, Hint::Lower);
        }
    }

    #[test]
    fn test_evaluate_mixed_positions() {
        // 4719 vs 4371: thousands match, hundreds too high, tens too low,
        // ones too high.
        let results = evaluate(4719, 4371);
        assert_eq!(results[0].hint, Hint::Correct);
        assert_eq!(results[1].hint, Hint::Lower);
        assert_eq!(results[2].hint, Hint::Higher);
        assert_eq!(results[3].hint, Hint::Lower);
        assert!(!all_correct(&results));
    }

    #[test]
    fn test_evaluate_always_four_entries_in_order() {
        let results = evaluate(1000, 9999);
        assert_eq!(results.len(), 4);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.position, i as u8);
        }
    }

    #[test]
    fn test_all_correct_iff_equal_values() {
        // Spot-check the defining property across a spread of pairs.
        for guess in (1000..=9999).step_by(487) {
            for secret in (1000..=9999).step_by(991) {
                let results = evaluate(guess, secret);
                assert_eq!(all_correct(&results), guess == secret);
            }
        }
    }
}
