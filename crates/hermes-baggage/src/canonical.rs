//! Attribute name canonicalization.

/// Returns the parameter-style canonical form of `name`: lower-cased, with
/// every `_` replaced by `-`.
///
/// ```rust
/// use hermes_baggage::canonical_key;
///
/// assert_eq!(canonical_key("Mozi_Tid"), "mozi-tid");
/// ```
#[must_use]
pub fn canonical_key(name: &str) -> String {
    name.replace('_', "-").to_lowercase()
}

/// Returns the header-style canonical form of `name`.
///
/// Every `_` becomes `-`, then the first letter and every letter following a
/// `-` are upper-cased and the rest lower-cased. A name containing a byte that
/// is not a valid header token character is returned hyphenated but otherwise
/// unchanged.
///
/// ```rust
/// use hermes_baggage::canonical_header_key;
///
/// assert_eq!(canonical_header_key("x-tproxy-user-mozi_uid"), "X-Tproxy-User-Mozi-Uid");
/// assert_eq!(canonical_header_key("bad name"), "bad name");
/// ```
#[must_use]
pub fn canonical_header_key(name: &str) -> String {
    let hyphenated = name.replace('_', "-");
    if !hyphenated.bytes().all(is_token_byte) {
        return hyphenated;
    }
    let mut upper = true;
    hyphenated
        .bytes()
        .map(|byte| {
            let byte = if upper {
                byte.to_ascii_uppercase()
            } else {
                byte.to_ascii_lowercase()
            };
            upper = byte == b'-';
            char::from(byte)
        })
        .collect()
}

/// RFC 7230 `tchar`.
const fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
