//! CPF (Cadastro de Pessoas Físicas), the Brazilian national ID.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cpf`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// The input string is empty.
    #[error("CPF cannot be empty")]
    Empty,
    /// The input contains something other than digits and `.`/`-` separators.
    #[error("CPF may only contain digits, dots and a dash")]
    InvalidCharacter,
    /// The input does not contain exactly 11 digits.
    #[error("CPF must have 11 digits (got {0})")]
    WrongLength(usize),
}

/// A CPF number in its canonical `000.000.000-00` form.
///
/// Users type CPFs both with and without punctuation. Both spellings parse
/// to the same value so the uniqueness constraint on `users.national_id`
/// cannot be bypassed by reformatting. Check digits are not verified.
///
/// ```
/// use hbr_pharmacy_core::Cpf;
///
/// let a = Cpf::parse("123.456.789-09").unwrap();
/// let b = Cpf::parse("12345678909").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "123.456.789-09");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Number of digits in a CPF.
    pub const DIGITS: usize = 11;

    /// Parse a CPF from user input.
    ///
    /// # Errors
    ///
    /// Returns [`CpfError`] if the input is empty, contains characters other
    /// than digits, `.`, `-` and surrounding whitespace, or does not contain
    /// exactly 11 digits.
    pub fn parse(s: &str) -> Result<Self, CpfError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CpfError::Empty);
        }

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' => {}
                _ => return Err(CpfError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(CpfError::WrongLength(digits.len()));
        }

        let (head, check) = digits.split_at(9);
        let (a, rest) = head.split_at(3);
        let (b, c) = rest.split_at(3);

        Ok(Self(format!("{a}.{b}.{c}-{check}")))
    }

    /// Returns the formatted CPF.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Cpf {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Cpf {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_and_bare_digits_are_equal() {
        let formatted = Cpf::parse("529.982.247-25").unwrap();
        let bare = Cpf::parse(" 52998224725 ").unwrap();
        assert_eq!(formatted, bare);
        assert_eq!(bare.as_str(), "529.982.247-25");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Cpf::parse(""), Err(CpfError::Empty));
    }

    #[test]
    fn test_rejects_wrong_digit_count() {
        assert_eq!(Cpf::parse("123.456.789"), Err(CpfError::WrongLength(9)));
        assert_eq!(Cpf::parse("123456789012"), Err(CpfError::WrongLength(12)));
    }

    #[test]
    fn test_rejects_letters() {
        assert_eq!(Cpf::parse("123.abc.789-09"), Err(CpfError::InvalidCharacter));
    }
}
