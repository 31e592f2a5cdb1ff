use crate::shared::Result;

/// OutputPresenter port for presenting the final formatted output
///
/// Implementations decide where the output goes (stdout, file, ...).
pub trait OutputPresenter {
    /// Presents the formatted output
    ///
    /// # Errors
    /// Returns an error if the output destination cannot be written
    fn present(&self, output: &str) -> Result<()>;
}
