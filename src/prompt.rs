//! Interactive startup prompts.
//!
//! Every run starts with the same conversation: credentials, gateway
//! choice, scan parameters and the optional output file. Stored
//! preferences feed the prompt defaults.

use crate::prefs::Preferences;
use crate::scan::{ScanConfig, ScanMode};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password, Select};

/// Credentials collected from the user.
pub struct Credentials {
    pub user: String,
    pub pwd: String,
}

/// Light sanity check on a login name: one `@`, a dot somewhere in the
/// domain, and no dot hugging either end of it.
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

/// Ask for the account name and password.
pub fn credentials(prefs: &Preferences) -> dialoguer::Result<Credentials> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt("User name (email)")
        .validate_with(|value: &String| {
            if looks_like_email(value) {
                Ok(())
            } else {
                Err("enter a valid email address")
            }
        });
    if let Some(user) = &prefs.user {
        input = input.default(user.clone());
    }
    let user = input.interact_text()?;
    let pwd = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;
    Ok(Credentials { user, pwd })
}

/// Pick one gateway from the account's list, or `None` to exit.
pub fn gateway(gwids: &[String]) -> dialoguer::Result<Option<String>> {
    let mut items: Vec<&str> = gwids.iter().map(String::as_str).collect();
    items.push("Exit");
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a gateway")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(gwids.get(selection).cloned())
}

/// Ask for the scan mode and period.
pub fn scan_parameters() -> dialoguer::Result<ScanConfig> {
    let theme = ColorfulTheme::default();
    let selection = Select::with_theme(&theme)
        .with_prompt("Scan mode")
        .items(&["Active", "Passive"])
        .default(0)
        .interact()?;
    let mode = if selection == 0 {
        ScanMode::Active
    } else {
        ScanMode::Passive
    };
    let period_secs = Input::<u32>::with_theme(&theme)
        .with_prompt("Scan period (seconds)")
        .default(ScanConfig::default().period_secs)
        .interact_text()?;
    Ok(ScanConfig { mode, period_secs })
}

/// Ask whether to log to a file and, if so, which one.
pub fn output_file(prefs: &Preferences) -> dialoguer::Result<Option<String>> {
    let theme = ColorfulTheme::default();
    let wanted = Confirm::with_theme(&theme)
        .with_prompt("Save advertisements to a file?")
        .default(true)
        .interact()?;
    if !wanted {
        return Ok(None);
    }
    let mut input = Input::<String>::with_theme(&theme).with_prompt("File name");
    if let Some(name) = &prefs.data_file_name {
        input = input.default(name.clone());
    }
    Ok(Some(input.interact_text()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_addresses() {
        assert!(looks_like_email("user@example.com"));
        assert!(looks_like_email("first.last@sub.example.org"));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!looks_like_email("no-at-sign"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("user@nodomain"));
        assert!(!looks_like_email("user@.example.com"));
        assert!(!looks_like_email("user@example.com."));
    }
}
