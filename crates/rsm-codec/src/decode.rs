//! Bytes-to-text decoding with an explicit fallback flag.

use crate::error::{CodecError, CodecResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// How to treat payloads that are not valid UTF-8.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Fall back to Latin-1, which maps every byte to a character. Entries may
    /// come out garbled but the source still merges.
    #[default]
    Lenient,
    /// Reject non-UTF-8 payloads with [`CodecError::Decode`].
    Strict,
}

impl DecodePolicy {
    pub fn from_fallback_flag(allow_fallback: bool) -> Self {
        if allow_fallback {
            Self::Lenient
        } else {
            Self::Strict
        }
    }
}

/// Decoded payload text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// `true` when the bytes were not UTF-8 and Latin-1 was used instead.
    pub used_fallback: bool,
}

/// Decode `raw` as UTF-8 (a leading byte order mark is dropped), falling back
/// to Latin-1 when `policy` allows it.
pub fn decode(raw: &[u8], origin: &str, policy: DecodePolicy) -> CodecResult<Decoded> {
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    match std::str::from_utf8(body) {
        Ok(text) => Ok(Decoded {
            text: text.to_string(),
            used_fallback: false,
        }),
        Err(e) => match policy {
            DecodePolicy::Lenient => {
                tracing::debug!(origin, error = %e, "payload is not UTF-8, decoding as Latin-1");
                Ok(Decoded {
                    text: body.iter().map(|&b| char::from(b)).collect(),
                    used_fallback: true,
                })
            }
            DecodePolicy::Strict => Err(CodecError::Decode {
                origin: origin.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        let d = decode("payload:\n  - 中文.com\n".as_bytes(), "t", DecodePolicy::Strict).unwrap();
        assert_eq!(d.text, "payload:\n  - 中文.com\n");
        assert!(!d.used_fallback);
    }

    #[test]
    fn bom_is_stripped() {
        let d = decode(b"\xEF\xBB\xBF{}", "t", DecodePolicy::Strict).unwrap();
        assert_eq!(d.text, "{}");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let d = decode(b"caf\xE9", "t", DecodePolicy::Lenient).unwrap();
        assert_eq!(d.text, "café");
        assert!(d.used_fallback);
    }

    #[test]
    fn strict_policy_rejects_invalid_utf8() {
        let err = decode(b"caf\xE9", "https://x/rules.json", DecodePolicy::Strict).unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("https://x/rules.json"));
    }

    #[test]
    fn policy_from_flag() {
        assert_eq!(DecodePolicy::from_fallback_flag(true), DecodePolicy::Lenient);
        assert_eq!(DecodePolicy::from_fallback_flag(false), DecodePolicy::Strict);
    }
}
