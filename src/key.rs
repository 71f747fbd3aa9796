//! [`Key`] is a wrapper around an OpenAI compatible API key.

use zeroize::Zeroizing;

/// Error for when a string cannot be used as an API key.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidKey {
    /// The key is empty or only whitespace.
    #[error("Invalid key: empty")]
    Empty,
    /// The key contains a byte that cannot appear in an HTTP header.
    #[error("Invalid key: bad character at byte {index}")]
    BadCharacter {
        /// Byte offset of the offending character.
        index: usize,
    },
}

/// Stores an API key. The key is zeroed on drop and is never written out by
/// [`Debug`]. The [`Display`] implementation writes out the key. **Be sure to
/// zeroize whatever you write it to**. Prefer [`Key::read`] for a borrowed
/// view.
///
/// [`Display`]: std::fmt::Display
pub struct Key {
    inner: Zeroizing<String>,
}

impl Key {
    /// Borrow the key.
    pub fn read(&self) -> &str {
        self.inner.as_str()
    }

    /// Value for the `Authorization` header. The returned string is zeroized
    /// on drop.
    pub(crate) fn bearer(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("Bearer {}", self.read()))
    }
}

impl TryFrom<String> for Key {
    type Error = InvalidKey;

    /// Create a new key from a string. Surrounding whitespace (such as a
    /// trailing newline from a file) is stripped. The original string is
    /// zeroized whether or not conversion succeeds.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = Zeroizing::new(s);
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidKey::Empty);
        }

        // Visible ASCII only, like every provider's key format.
        if let Some(index) = trimmed.bytes().position(|b| !b.is_ascii_graphic())
        {
            return Err(InvalidKey::BadCharacter { index });
        }

        Ok(Self {
            inner: Zeroizing::new(trimmed.to_string()),
        })
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(***)")
    }
}

impl std::fmt::Display for Key {
    /// Write out the key. Make sure to zeroize whatever you write it to if at
    /// all possible.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Not a real key.
    const API_KEY: &str = "sk-test-0123456789abcdefghijklmnopqrstuvwxyz";

    #[test]
    fn test_key() {
        let key = Key::try_from(API_KEY.to_string()).unwrap();
        assert_eq!(key.to_string(), API_KEY);
        assert_eq!(key.read(), API_KEY);
        assert_eq!(key.bearer().as_str(), format!("Bearer {API_KEY}"));
    }

    #[test]
    fn test_key_trims_newline() {
        let key = Key::try_from(format!("{API_KEY}\n")).unwrap();
        assert_eq!(key.read(), API_KEY);
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = Key::try_from(API_KEY.to_string()).unwrap();
        let debug = format!("{:?}", key);
        assert_eq!(debug, "Key(***)");
        assert!(!debug.contains("sk-"));
    }

    #[test]
    fn test_invalid_key() {
        let err = Key::try_from("   ".to_string()).unwrap_err();
        assert_eq!(err, InvalidKey::Empty);
        assert_eq!(err.to_string(), "Invalid key: empty");

        let err = Key::try_from("sk-abc def".to_string()).unwrap_err();
        assert_eq!(err, InvalidKey::BadCharacter { index: 6 });
    }
}
