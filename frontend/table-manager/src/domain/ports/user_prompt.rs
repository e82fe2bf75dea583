//! Driven port for blocking user prompts.

/// Blocking alert and confirmation dialogs.
#[cfg_attr(test, mockall::automock)]
pub trait UserPrompt: Send + Sync {
    /// Show `message` and wait for acknowledgement.
    fn alert(&self, message: &str);

    /// Ask a yes/no question; `true` means the user confirmed.
    fn confirm(&self, message: &str) -> bool;
}
