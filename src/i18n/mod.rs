// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the Arthasetu front-end.
//!
//! This module turns translation keys into display text for the active
//! language using the Fluent localization system, and remembers the user's
//! language choice across restarts.
//!
//! # Features
//!
//! - Closed set of languages: English, Hindi, Kannada, Tulu
//! - Embedded `.ftl` translation tables, validated against the English key set
//! - Fallback chain: active locale, then English, then the key itself
//! - Runtime language switching with best-effort persistence
//!
//! # Examples
//!
//! ```no_run
//! use arthasetu_i18n::i18n::{I18n, Locale, SettingsStore};
//!
//! let mut i18n = I18n::with_store(SettingsStore::new());
//! i18n.set_active_locale(Locale::Kn);
//! assert_eq!(i18n.resolve("login"), "ಲಾಗಿನ್");
//! ```

pub mod catalog;
pub mod fluent;
pub mod locale;
pub mod store;

pub use catalog::{Catalog, CatalogBuilder, CoverageReport, LocaleGaps};
pub use fluent::{I18n, StartupOptions};
pub use locale::{Locale, UnsupportedLocale};
pub use store::{BackgroundStore, MemoryStore, SelectionStore, SettingsStore};
