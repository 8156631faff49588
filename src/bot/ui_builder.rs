//! UI Builder module for creating keyboards.
//!
//! Keyboards are described platform-free as [`KeyboardSpec`] so the
//! dispatcher stays testable; the `to_*_markup` helpers translate a spec
//! into teloxide markup right before sending. Row ordering is part of the
//! user-facing contract and must stay stable.

use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    ReplyMarkup,
};

use crate::bot::commands::{
    BranchId, CallbackAction, MenuAction, LOCALE_SELECTOR_AZ, LOCALE_SELECTOR_EN,
    LOCALE_SELECTOR_RU,
};
use crate::localization::{t, LocaleTag};
use crate::session::MenuContext;

/// One button of a reply keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyButton {
    pub label: String,
    pub request_contact: bool,
}

impl ReplyButton {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request_contact: false,
        }
    }

    fn contact(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            request_contact: true,
        }
    }
}

/// One button of an inline keyboard, tapping it produces a callback event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: String,
}

impl InlineButton {
    fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// Platform-free keyboard description attached to an outbound reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardSpec {
    Reply(Vec<Vec<ReplyButton>>),
    Inline(Vec<Vec<InlineButton>>),
    None,
}

/// Build the keyboard for a menu context.
///
/// `locale == None` forces the three-language chooser regardless of
/// context, used right after `/start` and for the change-language command.
/// A message carries a single markup, so contexts with an inline menu
/// (accounts, credits, branches) replace the reply keyboard for that
/// message.
pub fn build(context: MenuContext, locale: Option<LocaleTag>, has_phone: bool) -> KeyboardSpec {
    let Some(locale) = locale else {
        return locale_chooser();
    };

    if has_phone {
        match context {
            MenuContext::Accounts => account_currencies_menu(),
            MenuContext::Credits => credit_currencies_menu(),
            _ => KeyboardSpec::Reply(vec![
                vec![ReplyButton::new(MenuAction::Back.label(locale))],
                vec![
                    ReplyButton::new(MenuAction::Accounts.label(locale)),
                    ReplyButton::new(MenuAction::Credits.label(locale)),
                ],
            ]),
        }
    } else {
        match context {
            MenuContext::Settings => KeyboardSpec::Reply(vec![
                vec![ReplyButton::new(MenuAction::Back.label(locale))],
                vec![ReplyButton::new(MenuAction::ChangeLanguage.label(locale))],
            ]),
            MenuContext::Branches => branch_categories_menu(locale),
            _ => KeyboardSpec::Reply(vec![
                vec![ReplyButton::contact(format!(
                    "📱 {}",
                    t("button-share-phone", locale)
                ))],
                vec![
                    ReplyButton::new(MenuAction::Branches.label(locale)),
                    ReplyButton::new(MenuAction::ContactBank.label(locale)),
                ],
                vec![
                    ReplyButton::new(MenuAction::CurrencyRates.label(locale)),
                    ReplyButton::new(MenuAction::Settings.label(locale)),
                ],
            ]),
        }
    }
}

/// The fixed three-row language chooser
pub fn locale_chooser() -> KeyboardSpec {
    KeyboardSpec::Reply(vec![
        vec![ReplyButton::new(LOCALE_SELECTOR_AZ)],
        vec![ReplyButton::new(LOCALE_SELECTOR_EN)],
        vec![ReplyButton::new(LOCALE_SELECTOR_RU)],
    ])
}

fn account_currencies_menu() -> KeyboardSpec {
    KeyboardSpec::Inline(vec![vec![
        InlineButton::new("AZN", CallbackAction::AznAccounts.id()),
        InlineButton::new("USD", CallbackAction::UsdAccounts.id()),
        InlineButton::new("EUR", CallbackAction::EurAccounts.id()),
    ]])
}

fn credit_currencies_menu() -> KeyboardSpec {
    KeyboardSpec::Inline(vec![vec![
        InlineButton::new("AZN", CallbackAction::AznCredits.id()),
        InlineButton::new("USD", CallbackAction::UsdCredits.id()),
    ]])
}

fn branch_categories_menu(locale: LocaleTag) -> KeyboardSpec {
    KeyboardSpec::Inline(vec![
        vec![InlineButton::new(
            t("baku-branches-label", locale),
            CallbackAction::BakuBranches.id(),
        )],
        vec![InlineButton::new(
            t("regional-branches-label", locale),
            CallbackAction::RegionalBranches.id(),
        )],
    ])
}

/// Inline menu of the Baku branches, two buttons per row
pub fn baku_branches_menu(locale: LocaleTag) -> KeyboardSpec {
    KeyboardSpec::Inline(branch_rows(&BranchId::BAKU, locale))
}

/// Inline menu of the regional branches, two buttons per row
pub fn regional_branches_menu(locale: LocaleTag) -> KeyboardSpec {
    KeyboardSpec::Inline(branch_rows(&BranchId::REGIONAL, locale))
}

fn branch_rows(branches: &[BranchId], locale: LocaleTag) -> Vec<Vec<InlineButton>> {
    branches
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|branch| InlineButton::new(branch.label(locale), branch.id()))
                .collect()
        })
        .collect()
}

/// Translate a keyboard spec into the markup for a new message
pub fn to_reply_markup(spec: &KeyboardSpec) -> Option<ReplyMarkup> {
    match spec {
        KeyboardSpec::Reply(rows) => {
            let keyboard: Vec<Vec<KeyboardButton>> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| {
                            let key = KeyboardButton::new(button.label.clone());
                            if button.request_contact {
                                key.request(ButtonRequest::Contact)
                            } else {
                                key
                            }
                        })
                        .collect()
                })
                .collect();
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(keyboard).resize_keyboard().selective(),
            ))
        }
        KeyboardSpec::Inline(_) => to_inline_markup(spec).map(ReplyMarkup::InlineKeyboard),
        KeyboardSpec::None => None,
    }
}

/// Translate a keyboard spec into inline markup, used when editing a
/// previously sent message
pub fn to_inline_markup(spec: &KeyboardSpec) -> Option<InlineKeyboardMarkup> {
    match spec {
        KeyboardSpec::Inline(rows) => {
            let keyboard: Vec<Vec<InlineKeyboardButton>> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| {
                            InlineKeyboardButton::callback(
                                button.label.clone(),
                                button.action.clone(),
                            )
                        })
                        .collect()
                })
                .collect();
            Some(InlineKeyboardMarkup::new(keyboard))
        }
        _ => None,
    }
}
