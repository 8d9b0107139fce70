//! User confirmation prompts for destructive operations

use dialoguer::{theme::ColorfulTheme, Confirm};
use log::debug;

/// Ask before deleting a resource
///
/// `--yes` skips the prompt. In batch mode without `--yes` the answer is
/// always no.
pub fn confirm_delete(resource: &str, id: &str, yes: bool, batch: bool) -> bool {
    if yes {
        debug!("Delete of {} ({}) confirmed by --yes", resource, id);
        return true;
    }
    if batch {
        eprintln!(
            "Refusing to delete {} ({}) in batch mode without --yes",
            resource, id
        );
        return false;
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Delete {} ({})?", resource, id))
        .default(false)
        .interact()
        .unwrap_or(false)
}
