//! Capabilities the host environment provides.
//!
//! Every call returns a definite outcome. Declining is a normal answer,
//! not an error: the flow that asked simply does not go ahead.

use crate::models::UserInfo;

/// Yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Lets the user choose an image. `None` means nothing was picked.
pub trait ImagePicker {
    fn pick_image(&self) -> Option<String>;
}

/// Supplies the signed-in user's identity, if the user grants it.
pub trait IdentityProvider {
    fn identity(&self) -> Option<UserInfo>;
}

/// Runs `action` only when `confirm` agrees. `Ok(None)` means declined.
pub fn confirmed<T, E, F>(
    confirm: &dyn Confirm,
    title: &str,
    message: &str,
    action: F,
) -> Result<Option<T>, E>
where
    F: FnOnce() -> Result<T, E>,
{
    if confirm.confirm(title, message) {
        action().map(Some)
    } else {
        tracing::debug!("'{}' declined", title);
        Ok(None)
    }
}
