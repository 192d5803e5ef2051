use crate::domain::AppError;

/// Port for opening URLs in the user's browser.
pub trait BrowserLauncher: Send + Sync {
    fn open(&self, url: &str) -> Result<(), AppError>;
}
