// SPDX-License-Identifier: MPL-2.0
//! Immutable translation tables, one Fluent bundle per locale.
//!
//! Tables are registered through [`CatalogBuilder`] (or loaded from the
//! embedded `assets/i18n/*.ftl` files) and never change afterwards. Every
//! non-default table is compared against the `en` key set so translation gaps
//! show up in logs and tests instead of only as silent runtime fallbacks.

use super::locale::Locale;
use crate::error::{Error, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use fluent_syntax::ast;
use rust_embed::RustEmbed;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

#[derive(RustEmbed)]
#[folder = "assets/i18n/"]
struct Asset;

pub struct Catalog {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
    keys: BTreeMap<Locale, BTreeSet<String>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("locales", &self.locales())
            .field("keys", &self.keys.values().map(BTreeSet::len).collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Catalog {
    /// Starts an empty catalog to register tables into.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Loads the tables shipped in `assets/i18n/`.
    ///
    /// Files whose stem is not a supported locale are skipped. Entries Fluent
    /// cannot parse are dropped and logged; the rest of the file still loads.
    pub fn embedded() -> Self {
        let mut builder = CatalogBuilder::default();

        for file in Asset::iter() {
            let filename = file.as_ref();
            let Some(stem) = filename.strip_suffix(".ftl") else {
                continue;
            };
            let Ok(locale) = stem.parse::<Locale>() else {
                tracing::warn!(file = filename, "skipping translation file for unsupported locale");
                continue;
            };
            if let Some(content) = Asset::get(filename) {
                let source = String::from_utf8_lossy(content.data.as_ref()).into_owned();
                builder.add_ftl_lossy(locale, source);
            }
        }

        builder.build()
    }

    /// Locales that have a registered table, in picker order.
    pub fn locales(&self) -> Vec<Locale> {
        self.keys.keys().copied().collect()
    }

    pub fn has_locale(&self, locale: Locale) -> bool {
        self.bundles.contains_key(&locale)
    }

    /// Keys defined (with a value) in the table of `locale`.
    pub fn keys(&self, locale: Locale) -> impl Iterator<Item = &str> {
        self.keys
            .get(&locale)
            .into_iter()
            .flat_map(|keys| keys.iter().map(String::as_str))
    }

    /// Looks `key` up in a single table, without any fallback.
    ///
    /// A message that is absent, has no value, formats with errors or formats
    /// to an empty string counts as missing.
    pub fn lookup(&self, locale: Locale, key: &str, args: Option<&FluentArgs>) -> Option<String> {
        let bundle = self.bundles.get(&locale)?;
        let pattern = bundle.get_message(key)?.value()?;

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(%locale, key, ?errors, "message formatted with errors");
            return None;
        }
        if value.is_empty() {
            return None;
        }
        Some(value.into_owned())
    }

    /// Compares every non-default locale's key set against the default's.
    pub fn coverage(&self) -> CoverageReport {
        let empty = BTreeSet::new();
        let reference = self.keys.get(&Locale::DEFAULT).unwrap_or(&empty);
        let mut gaps = BTreeMap::new();

        for locale in Locale::ALL {
            if locale == Locale::DEFAULT {
                continue;
            }
            let keys = self.keys.get(&locale).unwrap_or(&empty);
            let missing: Vec<String> = reference.difference(keys).cloned().collect();
            let extra: Vec<String> = keys.difference(reference).cloned().collect();
            if !missing.is_empty() || !extra.is_empty() {
                gaps.insert(locale, LocaleGaps { missing, extra });
            }
        }

        CoverageReport { gaps }
    }
}

/// Collects tables before they are frozen into a [`Catalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    bundles: HashMap<Locale, FluentBundle<FluentResource>>,
    keys: BTreeMap<Locale, BTreeSet<String>>,
    // Every message id per locale, including attribute-only messages
    ids: HashMap<Locale, HashSet<String>>,
}

impl CatalogBuilder {
    /// Registers a Fluent resource for `locale`.
    ///
    /// Several resources may be registered per locale. Fails on syntax errors
    /// and on keys already registered for that locale; in both cases nothing
    /// from `source` is added.
    pub fn add_ftl(&mut self, locale: Locale, source: impl Into<String>) -> Result<()> {
        let resource = FluentResource::try_new(source.into()).map_err(|(_, errors)| {
            Error::Catalog(format!("{locale}: invalid Fluent syntax: {errors:?}"))
        })?;

        if let Some(dup) = self.first_duplicate(locale, &resource) {
            return Err(Error::Catalog(format!("{locale}: duplicate key `{dup}`")));
        }

        self.insert(locale, resource);
        Ok(())
    }

    /// Registers a Fluent resource, keeping whatever parses.
    ///
    /// Syntax errors and duplicate keys are logged instead of returned.
    pub fn add_ftl_lossy(&mut self, locale: Locale, source: impl Into<String>) {
        let resource = match FluentResource::try_new(source.into()) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                tracing::warn!(%locale, count = errors.len(), ?errors, "dropping unparsable translation entries");
                resource
            }
        };
        self.insert(locale, resource);
    }

    /// A message id repeated within `resource` or already registered for `locale`.
    fn first_duplicate(&self, locale: Locale, resource: &FluentResource) -> Option<String> {
        let registered = self.ids.get(&locale);
        let mut seen = HashSet::new();
        messages(resource)
            .map(|message| message.id.name)
            .find(|id| !seen.insert(*id) || registered.is_some_and(|ids| ids.contains(*id)))
            .map(str::to_string)
    }

    fn insert(&mut self, locale: Locale, resource: FluentResource) {
        let ids: Vec<String> = messages(&resource)
            .map(|message| message.id.name.to_string())
            .collect();

        let bundle = self.bundles.entry(locale).or_insert_with(|| {
            let mut bundle = FluentBundle::new(vec![locale.langid()]);
            bundle.set_use_isolating(false);
            bundle
        });

        if let Err(errors) = bundle.add_resource(resource) {
            tracing::warn!(%locale, ?errors, "translation resource overrides existing keys");
        }

        // The bundle keeps the first definition when a lossy resource repeats an id
        let keys = self.keys.entry(locale).or_default();
        keys.extend(
            ids.iter()
                .filter(|id| bundle.get_message(id).and_then(|msg| msg.value()).is_some())
                .cloned(),
        );
        self.ids.entry(locale).or_default().extend(ids);
    }

    pub fn build(self) -> Catalog {
        Catalog {
            bundles: self.bundles,
            keys: self.keys,
        }
    }
}

fn messages(resource: &FluentResource) -> impl Iterator<Item = &ast::Message<&str>> {
    resource.entries().filter_map(|entry| match entry {
        ast::Entry::Message(message) => Some(message),
        _ => None,
    })
}

/// Keys of one locale that differ from the default locale's key set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleGaps {
    /// Defined in the default locale, absent here.
    pub missing: Vec<String>,
    /// Defined here, absent from the default locale.
    pub extra: Vec<String>,
}

/// Result of [`Catalog::coverage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    gaps: BTreeMap<Locale, LocaleGaps>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    pub fn gaps(&self, locale: Locale) -> Option<&LocaleGaps> {
        self.gaps.get(&locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Locale, &LocaleGaps)> {
        self.gaps.iter().map(|(locale, gaps)| (*locale, gaps))
    }

    /// Emits one warning per locale with gaps.
    pub fn log(&self) {
        for (locale, gaps) in self.iter() {
            tracing::warn!(
                %locale,
                missing = ?gaps.missing,
                extra = ?gaps.extra,
                "translation table differs from default locale"
            );
        }
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            return writeln!(f, "all locales cover every {} key", Locale::DEFAULT);
        }
        for (locale, gaps) in self.iter() {
            writeln!(f, "{locale}:")?;
            for key in &gaps.missing {
                writeln!(f, "  missing {key}")?;
            }
            for key in &gaps.extra {
                writeln!(f, "  extra   {key}")?;
            }
        }
        Ok(())
    }
}
