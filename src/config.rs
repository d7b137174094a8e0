/// Knobs for [`crate::Scanner`].
///
/// ```
/// use lua_scanner::ScannerConfig;
///
/// let config = ScannerConfig::new().skip_comments(true);
/// assert!(config.skips_comments());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    skip_comments: bool,
    strip_bom: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skip_comments: false,
            strip_bom: true,
        }
    }

    /// Drop line comments instead of emitting [`crate::TokenKind::Comment`].
    #[must_use]
    pub const fn skip_comments(mut self, yes: bool) -> Self {
        self.skip_comments = yes;
        self
    }

    /// Ignore a leading U+FEFF byte-order mark.
    #[must_use]
    pub const fn strip_bom(mut self, yes: bool) -> Self {
        self.strip_bom = yes;
        self
    }

    #[must_use]
    pub const fn skips_comments(&self) -> bool {
        self.skip_comments
    }

    #[must_use]
    pub const fn strips_bom(&self) -> bool {
        self.strip_bom
    }
}
