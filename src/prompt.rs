//! Terminal implementations of the core's collaborator traits.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use kitchenbook_core::{Confirm, IdentityProvider, ImagePicker, UserInfo};

/// `[y/N]` prompt on stdin. With `force` set it agrees without asking.
pub struct StdinConfirm {
    force: bool,
}

impl StdinConfirm {
    pub fn new(force: bool) -> Self {
        Self { force }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.force {
            return true;
        }

        print!("{}: {} [y/N] ", title, message);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(_) => is_yes(&input),
            Err(_) => false,
        }
    }
}

fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("y")
}

/// Picks the image at a path given on the command line, if it exists.
pub struct PathImagePicker {
    path: Option<PathBuf>,
}

impl PathImagePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl ImagePicker for PathImagePicker {
    fn pick_image(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        if path.is_file() {
            Some(path.display().to_string())
        } else {
            tracing::warn!("Image not found: {}", path.display());
            None
        }
    }
}

/// Identity given through `user sign-in` options. No nickname means the
/// user declined to share one.
pub struct ArgsIdentity {
    pub nick_name: Option<String>,
    pub openid: Option<String>,
    pub avatar_url: Option<String>,
}

impl IdentityProvider for ArgsIdentity {
    fn identity(&self) -> Option<UserInfo> {
        let nick_name = self.nick_name.as_deref().map(str::trim)?;
        if nick_name.is_empty() {
            return None;
        }
        let mut user = UserInfo::new(nick_name);
        if let Some(openid) = &self.openid {
            user = user.with_openid(openid);
        }
        if let Some(url) = &self.avatar_url {
            user = user.with_avatar_url(url);
        }
        Some(user)
    }
}
