// 🤖 Human verification - single-digit arithmetic challenges
//
// Easy for a person, a nuisance for a bot. Reviews need one solved challenge,
// new businesses need two.

use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
        }
    }
}

/// Two operands in 1..=9 and an operation.
///
/// Subtraction always stores the larger operand on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationChallenge {
    left: u8,
    right: u8,
    operation: Operation,
}

impl VerificationChallenge {
    /// New challenge from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let a = rng.gen_range(1..=9);
        let b = rng.gen_range(1..=9);

        if rng.gen_bool(0.5) {
            VerificationChallenge { left: a, right: b, operation: Operation::Add }
        } else {
            VerificationChallenge {
                left: a.max(b),
                right: a.min(b),
                operation: Operation::Subtract,
            }
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operands(&self) -> (u8, u8) {
        (self.left, self.right)
    }

    pub fn prompt(&self) -> String {
        format!("What is {} {} {}?", self.left, self.operation.symbol(), self.right)
    }

    pub fn answer(&self) -> u8 {
        match self.operation {
            Operation::Add => self.left + self.right,
            Operation::Subtract => self.left - self.right,
        }
    }

    /// Accepts only the exact answer written with ASCII digits
    pub fn check(&self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        input.parse::<u32>().map_or(false, |value| value == u32::from(self.answer()))
    }
}

impl fmt::Display for VerificationChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prompt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn challenges(count: usize) -> Vec<VerificationChallenge> {
        let mut rng = StdRng::seed_from_u64(7);
        (0..count).map(|_| VerificationChallenge::generate_with(&mut rng)).collect()
    }

    #[test]
    fn test_correct_answer_always_passes() {
        for challenge in challenges(500) {
            let answer = challenge.answer().to_string();
            assert!(challenge.check(&answer), "{} -> {}", challenge, answer);
            assert!(challenge.check(&format!("  {}\n", answer)));
        }
    }

    #[test]
    fn test_wrong_or_malformed_answers_fail() {
        for challenge in challenges(200) {
            let answer = challenge.answer();
            assert!(!challenge.check(&(answer + 1).to_string()));
            assert!(!challenge.check(""));
            assert!(!challenge.check("seven"));
            assert!(!challenge.check(&format!("{}.0", answer)));
            assert!(!challenge.check(&format!("+{}", answer)));
            assert!(!challenge.check("99999999999999999999"));
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        let generated = challenges(1_000);
        let subtractions: Vec<_> = generated
            .iter()
            .filter(|c| c.operation() == Operation::Subtract)
            .collect();
        assert!(!subtractions.is_empty());

        for challenge in subtractions {
            let (left, right) = challenge.operands();
            assert!(left >= right, "{}", challenge);
        }
    }

    #[test]
    fn test_operands_are_single_digits() {
        let generated = challenges(1_000);
        assert!(generated.iter().any(|c| c.operation() == Operation::Add));

        for challenge in generated {
            let (left, right) = challenge.operands();
            assert!((1..=9).contains(&left));
            assert!((1..=9).contains(&right));
            assert!(challenge.answer() <= 18);
        }
    }

    #[test]
    fn test_prompt_format() {
        let challenge = VerificationChallenge {
            left: 7,
            right: 3,
            operation: Operation::Subtract,
        };
        assert_eq!(challenge.prompt(), "What is 7 - 3?");
        assert_eq!(challenge.answer(), 4);
        assert!(challenge.check("4"));
        assert!(!challenge.check("-4"));
    }
}
