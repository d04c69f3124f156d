//! Versioned base64 envelope for the settings blob.
//!
//! This keeps tokens out of casual view on disk. It is not encryption.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::ports::SettingsCipher;

const ENVELOPE_PREFIX: &str = "v1:";

/// Seals settings as `v1:<base64>`.
pub struct EnvelopeCipher;

impl SettingsCipher for EnvelopeCipher {
    fn seal(&self, plaintext: &str) -> String {
        format!("{ENVELOPE_PREFIX}{}", STANDARD.encode(plaintext))
    }

    fn open(&self, sealed: &str) -> Result<String, String> {
        let payload = sealed
            .strip_prefix(ENVELOPE_PREFIX)
            .ok_or_else(|| "unsupported settings envelope".to_string())?;
        let bytes = STANDARD.decode(payload).map_err(|e| format!("invalid settings envelope: {e}"))?;
        String::from_utf8(bytes).map_err(|e| format!("settings envelope is not UTF-8: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sealed_value_opens_to_plaintext() {
        let sealed = EnvelopeCipher.seal("{\"notion_token\":\"secret\"}");
        assert!(sealed.starts_with("v1:"));
        assert!(!sealed.contains("secret"));
        assert_eq!(EnvelopeCipher.open(&sealed).unwrap(), "{\"notion_token\":\"secret\"}");
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = EnvelopeCipher.open("v2:e30=").unwrap_err();
        assert!(err.contains("unsupported"));
    }

    #[test]
    fn corrupt_payload_is_rejected() {
        assert!(EnvelopeCipher.open("v1:***").is_err());
    }
}
