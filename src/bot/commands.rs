//! Command vocabulary for the menu-driven interface.
//!
//! Menu buttons are plain text in the user's language, so inbound text has
//! to be matched against the rendered labels of every supported locale.
//! Internally each button maps to a stable [`MenuAction`] code; the label
//! tables here translate between the two directions.

use crate::localization::{t, LocaleTag};

/// Fixed labels of the three-language chooser keyboard. These stay the same
/// in every locale so a user can always find their own language.
pub const LOCALE_SELECTOR_AZ: &str = "🇦🇿 Azərbaycan dili";
pub const LOCALE_SELECTOR_EN: &str = "🇬🇧 English";
pub const LOCALE_SELECTOR_RU: &str = "🇷🇺 Русский";

/// Match one of the three locale-selector labels
pub fn parse_locale_selector(text: &str) -> Option<LocaleTag> {
    match text {
        LOCALE_SELECTOR_AZ => Some(LocaleTag::Az),
        LOCALE_SELECTOR_EN => Some(LocaleTag::En),
        LOCALE_SELECTOR_RU => Some(LocaleTag::Ru),
        _ => None,
    }
}

/// Locale-independent code for a menu command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Accounts,
    Credits,
    Branches,
    News,
    CurrencyRates,
    Settings,
    ChangeLanguage,
    ContactBank,
    Back,
}

impl MenuAction {
    pub const ALL: [MenuAction; 9] = [
        MenuAction::Accounts,
        MenuAction::Credits,
        MenuAction::Branches,
        MenuAction::News,
        MenuAction::CurrencyRates,
        MenuAction::Settings,
        MenuAction::ChangeLanguage,
        MenuAction::ContactBank,
        MenuAction::Back,
    ];

    fn emoji(self) -> &'static str {
        match self {
            MenuAction::Accounts => "💸",
            MenuAction::Credits => "💳",
            MenuAction::Branches => "🏛",
            MenuAction::News => "📰",
            MenuAction::CurrencyRates => "💲",
            MenuAction::Settings => "⚙",
            MenuAction::ChangeLanguage => "🌍",
            MenuAction::ContactBank => "📞",
            MenuAction::Back => "🔙",
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            MenuAction::Accounts => "button-accounts-view",
            MenuAction::Credits => "button-credits-view",
            MenuAction::Branches => "button-branches",
            MenuAction::News => "button-bank-news",
            MenuAction::CurrencyRates => "button-currency-rates",
            MenuAction::Settings => "button-settings",
            MenuAction::ChangeLanguage => "button-change-language",
            MenuAction::ContactBank => "button-contact-bank",
            MenuAction::Back => "button-back",
        }
    }

    /// The button label shown on keyboards for the given locale
    pub fn label(self, locale: LocaleTag) -> String {
        format!("{} {}", self.emoji(), t(self.label_key(), locale))
    }

    /// The label text without the emoji prefix
    pub fn bare_label(self, locale: LocaleTag) -> String {
        t(self.label_key(), locale)
    }

    /// Match inbound text against the rendered labels of every locale.
    /// Accepts the full button label and the bare text.
    pub fn parse(text: &str) -> Option<MenuAction> {
        for action in MenuAction::ALL {
            for locale in LocaleTag::ALL {
                let bare = action.bare_label(locale);
                if text == bare || text == format!("{} {}", action.emoji(), bare) {
                    return Some(action);
                }
            }
        }
        None
    }
}

/// A bank branch reachable from the inline branch menus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchId {
    HeadOffice,
    IndividualBanking,
    BridgePlaza,
    PortBaku,
    Landmark,
    Shuvalan,
    TwentyEightMay,
    WhiteCity,
    Ganja,
    Zagatala,
    Guba,
}

impl BranchId {
    pub const BAKU: [BranchId; 8] = [
        BranchId::HeadOffice,
        BranchId::IndividualBanking,
        BranchId::BridgePlaza,
        BranchId::PortBaku,
        BranchId::Landmark,
        BranchId::Shuvalan,
        BranchId::TwentyEightMay,
        BranchId::WhiteCity,
    ];

    pub const REGIONAL: [BranchId; 3] = [BranchId::Ganja, BranchId::Zagatala, BranchId::Guba];

    /// Stable callback id carried in inline keyboard buttons
    pub fn id(self) -> &'static str {
        match self {
            BranchId::HeadOffice => "Head_Office",
            BranchId::IndividualBanking => "Individual_Banking",
            BranchId::BridgePlaza => "Bridge_Plaza",
            BranchId::PortBaku => "Port_Baku",
            BranchId::Landmark => "Landmark",
            BranchId::Shuvalan => "Shuvalan",
            BranchId::TwentyEightMay => "28_May",
            BranchId::WhiteCity => "White_City",
            BranchId::Ganja => "Ganja_Branch",
            BranchId::Zagatala => "Zagatala_Branch",
            BranchId::Guba => "Guba_Branch",
        }
    }

    pub fn parse(id: &str) -> Option<BranchId> {
        match id {
            "Head_Office" => Some(BranchId::HeadOffice),
            "Individual_Banking" => Some(BranchId::IndividualBanking),
            "Bridge_Plaza" => Some(BranchId::BridgePlaza),
            "Port_Baku" => Some(BranchId::PortBaku),
            "Landmark" => Some(BranchId::Landmark),
            "Shuvalan" => Some(BranchId::Shuvalan),
            "28_May" => Some(BranchId::TwentyEightMay),
            "White_City" => Some(BranchId::WhiteCity),
            "Ganja_Branch" => Some(BranchId::Ganja),
            "Zagatala_Branch" => Some(BranchId::Zagatala),
            "Guba_Branch" => Some(BranchId::Guba),
            _ => None,
        }
    }

    fn label_key(self) -> &'static str {
        match self {
            BranchId::HeadOffice => "branch-head-office",
            BranchId::IndividualBanking => "branch-individual-banking",
            BranchId::BridgePlaza => "branch-bridge-plaza",
            BranchId::PortBaku => "branch-port-baku",
            BranchId::Landmark => "branch-landmark",
            BranchId::Shuvalan => "branch-shuvalan",
            BranchId::TwentyEightMay => "branch-28-may",
            BranchId::WhiteCity => "branch-white-city",
            BranchId::Ganja => "branch-ganja",
            BranchId::Zagatala => "branch-zagatala",
            BranchId::Guba => "branch-guba",
        }
    }

    pub fn label(self, locale: LocaleTag) -> String {
        t(self.label_key(), locale)
    }
}

/// A recognized inline-keyboard callback action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    AznAccounts,
    UsdAccounts,
    EurAccounts,
    AznCredits,
    UsdCredits,
    BakuBranches,
    RegionalBranches,
    Branch(BranchId),
}

impl CallbackAction {
    pub fn parse(id: &str) -> Option<CallbackAction> {
        match id {
            "AZN_Account" => Some(CallbackAction::AznAccounts),
            "USD_Account" => Some(CallbackAction::UsdAccounts),
            "EUR_Account" => Some(CallbackAction::EurAccounts),
            "AZN_Credits" => Some(CallbackAction::AznCredits),
            "USD_Credits" => Some(CallbackAction::UsdCredits),
            "Baku_Branches" => Some(CallbackAction::BakuBranches),
            "Regional_Branches" => Some(CallbackAction::RegionalBranches),
            other => BranchId::parse(other).map(CallbackAction::Branch),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            CallbackAction::AznAccounts => "AZN_Account",
            CallbackAction::UsdAccounts => "USD_Account",
            CallbackAction::EurAccounts => "EUR_Account",
            CallbackAction::AznCredits => "AZN_Credits",
            CallbackAction::UsdCredits => "USD_Credits",
            CallbackAction::BakuBranches => "Baku_Branches",
            CallbackAction::RegionalBranches => "Regional_Branches",
            CallbackAction::Branch(branch) => branch.id(),
        }
    }
}
