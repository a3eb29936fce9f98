// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for localization settings.

/// Locale used on first run and as the second step of the fallback chain.
pub const DEFAULT_LOCALE: &str = "en";

/// Name of the persisted entry holding the active locale code.
pub const STORAGE_KEY: &str = "language";

/// File name of the user settings inside the config directory.
pub const CONFIG_FILE: &str = "settings.toml";

/// Whether the OS locale is consulted when nothing was persisted yet.
pub const DEFAULT_FOLLOW_SYSTEM_LOCALE: bool = false;

/// Warning key returned when an existing settings file cannot be used.
pub const CONFIG_LOAD_WARNING: &str = "notification-config-load-error";

const _: () = {
    assert!(!DEFAULT_LOCALE.is_empty());
    assert!(!STORAGE_KEY.is_empty());
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_locale_is_english() {
        assert_eq!(DEFAULT_LOCALE, "en");
    }

    #[test]
    fn storage_key_matches_web_app() {
        assert_eq!(STORAGE_KEY, "language");
    }

    #[test]
    fn system_locale_is_opt_in() {
        assert!(!DEFAULT_FOLLOW_SYSTEM_LOCALE);
    }
}
