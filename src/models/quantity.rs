use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::errors::AppError;

/// How free-text quantities such as `"50 комплектів"` are turned into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityPolicy {
    /// Leading digits of the first token, anything unparseable counts as 0
    #[default]
    Lenient,
    /// The first token must be a plain non-negative integer
    Strict,
}

impl QuantityPolicy {
    /// Parse an agreed amount such as the one given when accepting help.
    /// Only the first token counts; under the lenient policy a missing or
    /// overflowing number is 0.
    pub fn parse_amount(self, text: &str) -> Result<i64, AppError> {
        let first = text.split_whitespace().next().unwrap_or("");
        let (digits, rest) = split_leading_digits(first);

        match self {
            QuantityPolicy::Lenient => Ok(digits.parse::<i64>().unwrap_or(0)),
            QuantityPolicy::Strict => {
                if digits.is_empty() || !rest.is_empty() {
                    return Err(AppError::InvalidQuantity(text.to_string()));
                }
                digits
                    .parse::<i64>()
                    .map_err(|_| AppError::InvalidQuantity(text.to_string()))
            }
        }
    }
}

fn split_leading_digits(token: &str) -> (&str, &str) {
    let end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    token.split_at(end)
}

/// A magnitude with its display unit, kept apart so arithmetic never touches the unit text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    pub amount: i64,
    pub unit: String,
}

/// Result of taking an amount away from a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAdjustment {
    /// Something is left over
    Remaining(i64),
    /// Nothing (or less than nothing) is left; the owner should move to its terminal status
    Depleted,
}

impl Quantity {
    pub fn new(amount: i64, unit: impl Into<String>) -> Self {
        Self {
            amount,
            unit: unit.into(),
        }
    }

    /// Parse the quantity text of a Request or Offer.
    ///
    /// The text must start with a number under either policy, since a record
    /// without an amount could never be reconciled. Whatever follows the
    /// digits is kept as the unit: `"20шт"` becomes 20 of `"шт"`. The strict
    /// policy additionally wants the number as a token of its own.
    pub fn parse(text: &str, policy: QuantityPolicy) -> Result<Self, AppError> {
        let mut tokens = text.split_whitespace();
        let first = tokens.next().unwrap_or("");
        let (digits, glued) = split_leading_digits(first);

        if digits.is_empty() || (policy == QuantityPolicy::Strict && !glued.is_empty()) {
            return Err(AppError::InvalidQuantity(text.to_string()));
        }
        let amount = digits
            .parse::<i64>()
            .map_err(|_| AppError::InvalidQuantity(text.to_string()))?;

        let unit = std::iter::once(glued)
            .chain(tokens)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self { amount, unit })
    }

    /// Subtract `by` from the amount
    pub fn adjust(&self, by: i64) -> QuantityAdjustment {
        let remainder = self.amount.saturating_sub(by);
        if remainder <= 0 {
            QuantityAdjustment::Depleted
        } else {
            QuantityAdjustment::Remaining(remainder)
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.amount)
        } else {
            write!(f, "{} {}", self.amount, self.unit)
        }
    }
}
