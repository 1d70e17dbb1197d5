//! User-facing dialogs.

use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Text of the About dialog.
pub const ABOUT_TEXT: &str = concat!(
    "Whirl\n",
    "A Circle-to-Search App\n",
    "Version ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "Draw a box around anything on screen to search it with Google Lens.\n",
    "Press Cmd+Shift+C to start, Escape to cancel."
);

/// Shows messages to the user.
pub trait Notifier {
    /// Shows a blocking error dialog.
    fn error(&mut self, title: &str, message: &str);

    fn about(&mut self);
}

/// Native message boxes via rfd.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogNotifier;

impl Notifier for DialogNotifier {
    fn error(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn about(&mut self) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("About")
            .set_description(ABOUT_TEXT)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
