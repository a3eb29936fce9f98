// SPDX-License-Identifier: MPL-2.0
//! `arthasetu_i18n` resolves user-facing text for the Arthasetu banking
//! front-end in English, Hindi, Kannada and Tulu.
//!
//! It bundles the Fluent translation tables, the locale resolver with its
//! fallback chain, and persistence of the user's language choice in
//! `settings.toml`.

pub mod config;
pub mod error;
pub mod i18n;
pub mod paths;

pub use i18n::{I18n, Locale};
