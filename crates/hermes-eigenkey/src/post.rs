//! Key post-processors.

use sha2::Digest;

/// Transforms a generated key, e.g. by hashing or truncating it.
///
/// Any `Fn(&str) -> String` is a post-processor:
///
/// ```rust
/// use hermes_eigenkey::KeyPostProcessor;
///
/// let upper = |key: &str| key.to_uppercase();
/// assert_eq!(upper.process("get:/x"), "GET:/X");
/// ```
pub trait KeyPostProcessor: Send + Sync {
    /// Returns the transformed key.
    fn process(&self, key: &str) -> String;
}

impl<F> KeyPostProcessor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn process(&self, key: &str) -> String {
        self(key)
    }
}

/// Lower-case hex MD5 digest (32 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl KeyPostProcessor for Md5Digest {
    fn process(&self, key: &str) -> String {
        format!("{:x}", md5::Md5::digest(key.as_bytes()))
    }
}

/// Lower-case hex SHA-1 digest (40 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1Digest;

impl KeyPostProcessor for Sha1Digest {
    fn process(&self, key: &str) -> String {
        format!("{:x}", sha1::Sha1::digest(key.as_bytes()))
    }
}

/// Lower-case hex SHA-256 digest (64 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl KeyPostProcessor for Sha256Digest {
    fn process(&self, key: &str) -> String {
        format!("{:x}", sha2::Sha256::digest(key.as_bytes()))
    }
}

/// Keeps the first `n` characters.
#[derive(Debug, Clone, Copy)]
pub struct Prefix(pub usize);

impl KeyPostProcessor for Prefix {
    fn process(&self, key: &str) -> String {
        key.chars().take(self.0).collect()
    }
}
