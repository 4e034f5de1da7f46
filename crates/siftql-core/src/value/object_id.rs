use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// ObjectId
///
/// 12-byte document identifier, written as 24 hexadecimal characters.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const LEN: usize = 12;

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }
}

///
/// ObjectIdError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ObjectIdError {
    #[error("object id must be 24 hex characters, found {0}")]
    Length(usize),

    #[error("object id contains non-hex character '{0}'")]
    NonHex(char),
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN * 2 {
            return Err(ObjectIdError::Length(s.chars().count()));
        }

        let mut bytes = [0u8; 12];
        let digits = s.as_bytes();
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_digit(digits[i * 2])?;
            let lo = hex_digit(digits[i * 2 + 1])?;
            *byte = (hi << 4) | lo;
        }

        Ok(Self(bytes))
    }
}

fn hex_digit(c: u8) -> Result<u8, ObjectIdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(ObjectIdError::NonHex(char::from(c))),
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }

        Ok(())
    }
}
