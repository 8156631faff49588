//! Localization for the banking assistant.
//!
//! UI strings live in Fluent resource files under `locales/<tag>/main.ftl`,
//! one bundle per supported locale.

use anyhow::{Context, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::sync::OnceLock;
use unic_langid::LanguageIdentifier;

/// A supported UI locale. `Az` is the default shown to conversations that
/// have not picked a language yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocaleTag {
    #[default]
    Az,
    En,
    Ru,
}

impl LocaleTag {
    pub const ALL: [LocaleTag; 3] = [LocaleTag::Az, LocaleTag::En, LocaleTag::Ru];

    pub fn as_str(self) -> &'static str {
        match self {
            LocaleTag::Az => "az",
            LocaleTag::En => "en",
            LocaleTag::Ru => "ru",
        }
    }

    pub fn parse(tag: &str) -> Option<LocaleTag> {
        match tag {
            "az" => Some(LocaleTag::Az),
            "en" => Some(LocaleTag::En),
            "ru" => Some(LocaleTag::Ru),
            _ => None,
        }
    }
}

/// Localization manager for the banking assistant
pub struct LocalizationManager {
    bundles: HashMap<LocaleTag, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with all supported locales loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for tag in LocaleTag::ALL {
            bundles.insert(tag, Self::create_bundle(tag)?);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(tag: LocaleTag) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = tag.as_str().parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Unicode isolation marks show up as boxes in some Telegram clients.
        bundle.set_use_isolating(false);

        let resource_path = format!("./locales/{}/main.ftl", tag.as_str());
        let content = fs::read_to_string(&resource_path)
            .with_context(|| format!("Failed to read locale resource {resource_path}"))?;
        let resource = FluentResource::try_new(content)
            .map_err(|_| anyhow::anyhow!("Failed to parse locale resource {resource_path}"))?;
        bundle
            .add_resource(resource)
            .map_err(|_| anyhow::anyhow!("Conflicting message ids in {resource_path}"))?;

        Ok(bundle)
    }

    /// Get a localized message in the given locale
    pub fn get_message(
        &self,
        key: &str,
        locale: LocaleTag,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = &self.bundles[&locale];

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut errors = vec![];
        match args {
            Some(args) => {
                let fluent_args =
                    FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))));
                bundle
                    .format_pattern(pattern, Some(&fluent_args), &mut errors)
                    .into_owned()
            }
            None => bundle.format_pattern(pattern, None, &mut errors).into_owned(),
        }
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(
        &self,
        key: &str,
        args: &[(&str, &str)],
        locale: LocaleTag,
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, locale, Some(&args_map))
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager. Calling it again is a no-op.
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_some() {
        return Ok(());
    }
    let manager = LocalizationManager::new()?;
    let _ = LOCALIZATION_MANAGER.set(manager);
    Ok(())
}

/// Get the global localization manager
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER
        .get()
        .expect("Localization manager not initialized")
}

/// Convenience function to get a localized message
pub fn t(key: &str, locale: LocaleTag) -> String {
    get_localization_manager().get_message(key, locale, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)], locale: LocaleTag) -> String {
    get_localization_manager().get_message_with_args(key, args, locale)
}
