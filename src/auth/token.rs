use std::fmt;

/// Opaque bearer credential.
///
/// Always trimmed and never blank; the only way to build one is
/// [`Credential::new`].
///
/// # Example
/// ```
/// use repoinit::auth::Credential;
///
/// let credential = Credential::new("  ghu_xyz\n").unwrap();
/// assert_eq!(credential.expose(), "ghu_xyz");
/// assert!(Credential::new("   ").is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim `raw` and wrap it, or return `None` when nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The secret value, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}
