//! Sealing port for the settings blob.

/// Turns settings plaintext into an opaque string and back.
///
/// The mechanism is an external collaborator; callers only rely on
/// `open(seal(x)) == Ok(x)`.
pub trait SettingsCipher: Send + Sync {
    /// Seals plaintext into an opaque string.
    fn seal(&self, plaintext: &str) -> String;

    /// Recovers the plaintext of a sealed string.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the value could not be opened.
    fn open(&self, sealed: &str) -> Result<String, String>;
}
