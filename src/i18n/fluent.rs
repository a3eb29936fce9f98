// SPDX-License-Identifier: MPL-2.0
use super::catalog::{Catalog, CoverageReport};
use super::locale::Locale;
use super::store::SelectionStore;
use crate::config::Config;
use fluent_bundle::FluentArgs;
use std::fmt;

/// Inputs consulted once, when the resolver starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    /// Explicit language request (e.g. `--lang`), tried before the persisted value.
    pub lang_override: Option<String>,
    /// Consult the OS locale when nothing usable was persisted.
    pub follow_system_locale: bool,
}

impl StartupOptions {
    pub fn from_config(config: &Config, lang_override: Option<String>) -> Self {
        Self {
            lang_override,
            follow_system_locale: config.follow_system_locale(),
        }
    }
}

/// Resolves translation keys for the active locale and owns the selection.
///
/// Lookups never fail: a key missing from the active table is taken from the
/// default table, and a key missing there too is returned as-is.
pub struct I18n {
    catalog: Catalog,
    store: Box<dyn SelectionStore>,
    active: Locale,
    /// Last value known to be in the store, which may differ from `active`
    /// when startup used an override or the OS locale.
    persisted: Option<Locale>,
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("active", &self.active)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

impl I18n {
    /// Builds the resolver and performs the one-time startup load.
    pub fn new(
        catalog: Catalog,
        store: impl SelectionStore + 'static,
        options: &StartupOptions,
    ) -> Self {
        catalog.coverage().log();

        let persisted = match store.load() {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "could not read persisted language");
                None
            }
        };
        let active = resolve_locale(options, persisted.as_deref(), sys_locale::get_locale);
        tracing::debug!(locale = %active, "active language at startup");

        Self {
            catalog,
            store: Box::new(store),
            active,
            persisted: persisted.and_then(|code| code.parse().ok()),
        }
    }

    /// Embedded tables with default startup options.
    pub fn with_store(store: impl SelectionStore + 'static) -> Self {
        Self::new(Catalog::embedded(), store, &StartupOptions::default())
    }

    /// Display string for `key` in the active locale.
    pub fn resolve(&self, key: &str) -> String {
        self.resolve_inner(key, None)
    }

    /// Like [`I18n::resolve`], substituting Fluent variables from `args`.
    pub fn resolve_with_args(&self, key: &str, args: &FluentArgs) -> String {
        self.resolve_inner(key, Some(args))
    }

    fn resolve_inner(&self, key: &str, args: Option<&FluentArgs>) -> String {
        if let Some(value) = self.catalog.lookup(self.active, key, args) {
            return value;
        }
        if self.active != Locale::DEFAULT {
            if let Some(value) = self.catalog.lookup(Locale::DEFAULT, key, args) {
                return value;
            }
        }
        key.to_string()
    }

    pub fn active_locale(&self) -> Locale {
        self.active
    }

    /// Switches the active locale and persists the choice.
    ///
    /// The new locale is visible to the next `resolve` before the store is
    /// touched. Store failures are logged and otherwise ignored. Nothing is
    /// written when `locale` is both active and already persisted.
    pub fn set_active_locale(&mut self, locale: Locale) {
        if self.active == locale && self.persisted == Some(locale) {
            return;
        }
        if self.active != locale {
            tracing::debug!(from = %self.active, to = %locale, "switching language");
            self.active = locale;
        }
        self.persist_selection();
    }

    /// String entry point for untyped callers such as language pickers.
    ///
    /// Returns `false` and keeps the current locale when `code` is not a
    /// supported language.
    pub fn set_active_code(&mut self, code: &str) -> bool {
        match code.parse::<Locale>() {
            Ok(locale) => {
                self.set_active_locale(locale);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, current = %self.active, "ignoring language change");
                false
            }
        }
    }

    /// Locales offered to the user, in picker order.
    pub fn available_locales(&self) -> &'static [Locale] {
        &Locale::ALL
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn coverage(&self) -> CoverageReport {
        self.catalog.coverage()
    }

    fn persist_selection(&mut self) {
        match self.store.save(self.active.code()) {
            Ok(()) => self.persisted = Some(self.active),
            Err(err) => {
                tracing::warn!(locale = %self.active, error = %err, "failed to persist language");
            }
        }
    }
}

/// Picks the startup locale: explicit request, persisted value, OS locale
/// (opt-in), then the default. Unusable values fall through to the next source.
fn resolve_locale<F>(options: &StartupOptions, persisted: Option<&str>, system: F) -> Locale
where
    F: FnOnce() -> Option<String>,
{
    if let Some(lang) = options.lang_override.as_deref() {
        match lang.parse::<Locale>() {
            Ok(locale) => return locale,
            Err(err) => tracing::warn!(error = %err, "ignoring requested language"),
        }
    }

    if let Some(saved) = persisted {
        match saved.parse::<Locale>() {
            Ok(locale) => return locale,
            Err(err) => tracing::warn!(error = %err, "ignoring persisted language"),
        }
    }

    if options.follow_system_locale {
        if let Some(locale) = system().and_then(|tag| tag.parse::<Locale>().ok()) {
            return locale;
        }
    }

    Locale::DEFAULT
}
