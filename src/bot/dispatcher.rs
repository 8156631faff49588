//! Conversation dispatcher.
//!
//! Consumes one inbound event together with the conversation's session and
//! decides which reply, keyboard and backend lookups to produce. The
//! dispatcher is platform-free; the message and callback handlers translate
//! teloxide updates into [`InboundEvent`] and deliver the resulting reply.
//!
//! Failed gateway lookups are logged and the event is dropped without a
//! reply. Missing session attributes are a regular state, not an error:
//! the authentication ladder decides what an unrecognized message should
//! prompt for, and callback events that lack required state are ignored.

use tracing::{debug, error};

use crate::bot::commands::{parse_locale_selector, CallbackAction, MenuAction};
use crate::bot::ui_builder::{self, KeyboardSpec};
use crate::gateway::{AccountBalance, BankingGateway};
use crate::localization::{t, t_args, LocaleTag};
use crate::session::{normalize_phone_number, AuthState, MenuContext, Session};

/// One event received from the chat platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    TextCommand {
        chat_id: i64,
        text: String,
    },
    CallbackAction {
        chat_id: i64,
        message_id: i32,
        action: String,
    },
    ContactShared {
        chat_id: i64,
        phone_number: String,
    },
}

/// Where an outbound reply goes: a fresh message or an in-place edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTarget {
    Send { chat_id: i64 },
    Edit { chat_id: i64, message_id: i32 },
}

/// A reply produced by one dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundReply {
    pub target: ReplyTarget,
    pub text: String,
    pub keyboard: KeyboardSpec,
}

/// Outcome of dispatching one inbound event. `reply == None` means the
/// event was dropped on purpose.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub reply: Option<OutboundReply>,
}

impl DispatchResult {
    fn none() -> Self {
        Self { reply: None }
    }

    fn send(chat_id: i64, text: String, keyboard: KeyboardSpec) -> Self {
        Self {
            reply: Some(OutboundReply {
                target: ReplyTarget::Send { chat_id },
                text,
                keyboard,
            }),
        }
    }

    fn edit(chat_id: i64, message_id: i32, text: String, keyboard: KeyboardSpec) -> Self {
        Self {
            reply: Some(OutboundReply {
                target: ReplyTarget::Edit {
                    chat_id,
                    message_id,
                },
                text,
                keyboard,
            }),
        }
    }
}

/// Dispatch one inbound event against the conversation's session.
///
/// The caller holds the per-conversation session lock for the whole call,
/// so session reads, gateway lookups and session writes form one unit per
/// event.
pub async fn dispatch(
    event: InboundEvent,
    session: &mut Session,
    gateway: &dyn BankingGateway,
) -> DispatchResult {
    match event {
        InboundEvent::TextCommand { chat_id, text } => {
            handle_text_command(chat_id, &text, session, gateway).await
        }
        InboundEvent::CallbackAction {
            chat_id,
            message_id,
            action,
        } => handle_callback_action(chat_id, message_id, &action, session, gateway).await,
        InboundEvent::ContactShared {
            chat_id,
            phone_number,
        } => handle_contact_shared(chat_id, &phone_number, session, gateway).await,
    }
}

async fn handle_text_command(
    chat_id: i64,
    text: &str,
    session: &mut Session,
    gateway: &dyn BankingGateway,
) -> DispatchResult {
    // Language selection works from any state and resets the menu.
    if let Some(locale) = parse_locale_selector(text) {
        debug!(chat_id, locale = locale.as_str(), "Locale selected");
        session.locale = Some(locale);
        session.menu_context = MenuContext::None;
        return DispatchResult::send(
            chat_id,
            t("authentication-text", locale),
            KeyboardSpec::None,
        );
    }

    if text == "/start" {
        debug!(chat_id, "Start command received");
        session.phone_number = None;
        session.menu_context = MenuContext::None;
        let locale = session.locale.unwrap_or_default();
        return DispatchResult::send(
            chat_id,
            t("start-text", locale),
            ui_builder::locale_chooser(),
        );
    }

    // A menu label typed before any language was chosen falls through to
    // the authentication ladder.
    match (MenuAction::parse(text), session.locale) {
        (Some(action), Some(locale)) => {
            handle_menu_action(chat_id, action, locale, session, gateway).await
        }
        _ => fallback_reply(chat_id, session),
    }
}

async fn handle_menu_action(
    chat_id: i64,
    action: MenuAction,
    locale: LocaleTag,
    session: &mut Session,
    gateway: &dyn BankingGateway,
) -> DispatchResult {
    match action {
        MenuAction::Accounts => {
            session.menu_context = MenuContext::Accounts;
            let has_phone = session.phone_number.is_some();
            DispatchResult::send(
                chat_id,
                t("accounts-types-text", locale),
                ui_builder::build(MenuContext::Accounts, Some(locale), has_phone),
            )
        }
        MenuAction::Credits => {
            session.menu_context = MenuContext::Credits;
            let has_phone = session.phone_number.is_some();
            DispatchResult::send(
                chat_id,
                t("credits-types-text", locale),
                ui_builder::build(MenuContext::Credits, Some(locale), has_phone),
            )
        }
        MenuAction::Branches => {
            session.menu_context = MenuContext::Branches;
            DispatchResult::send(
                chat_id,
                t("branches-choose-type", locale),
                ui_builder::build(MenuContext::Branches, Some(locale), false),
            )
        }
        MenuAction::News => {
            session.menu_context = MenuContext::None;
            match gateway.get_bank_news(locale).await {
                Ok(news) => DispatchResult::send(
                    chat_id,
                    news,
                    ui_builder::build(MenuContext::None, Some(locale), false),
                ),
                Err(e) => {
                    error!(chat_id, error = %e, "Bank news lookup failed");
                    DispatchResult::none()
                }
            }
        }
        MenuAction::CurrencyRates => {
            session.menu_context = MenuContext::None;
            match gateway.get_currency_rates(locale).await {
                Ok(rates) => DispatchResult::send(
                    chat_id,
                    rates,
                    ui_builder::build(MenuContext::None, Some(locale), false),
                ),
                Err(e) => {
                    error!(chat_id, error = %e, "Currency rates lookup failed");
                    DispatchResult::none()
                }
            }
        }
        MenuAction::Settings => {
            session.menu_context = MenuContext::Settings;
            DispatchResult::send(
                chat_id,
                t("select-action", locale),
                ui_builder::build(MenuContext::Settings, Some(locale), false),
            )
        }
        MenuAction::ChangeLanguage => {
            session.menu_context = MenuContext::None;
            DispatchResult::send(
                chat_id,
                t("choose-language", locale),
                ui_builder::locale_chooser(),
            )
        }
        MenuAction::ContactBank => {
            session.menu_context = MenuContext::None;
            DispatchResult::send(
                chat_id,
                t("bank-phone-numbers", locale),
                ui_builder::build(MenuContext::None, Some(locale), false),
            )
        }
        MenuAction::Back => {
            session.menu_context = MenuContext::None;
            DispatchResult::send(
                chat_id,
                t("button-back", locale),
                ui_builder::build(MenuContext::None, Some(locale), false),
            )
        }
    }
}

/// Authentication ladder for unrecognized text. Prompts for the next piece
/// of state the conversation is missing and never raises on absent
/// attributes.
fn fallback_reply(chat_id: i64, session: &Session) -> DispatchResult {
    match session.auth_state() {
        AuthState::NoLocale => DispatchResult::send(
            chat_id,
            t("select-action", LocaleTag::default()),
            ui_builder::locale_chooser(),
        ),
        AuthState::LocaleNoPhone => {
            let locale = session.locale.unwrap_or_default();
            DispatchResult::send(
                chat_id,
                t("select-action", locale),
                ui_builder::build(MenuContext::None, Some(locale), false),
            )
        }
        AuthState::LocaleWithPhone => {
            let locale = session.locale.unwrap_or_default();
            DispatchResult::send(
                chat_id,
                t("select-action", locale),
                ui_builder::build(MenuContext::None, Some(locale), true),
            )
        }
    }
}

async fn handle_callback_action(
    chat_id: i64,
    message_id: i32,
    action: &str,
    session: &mut Session,
    gateway: &dyn BankingGateway,
) -> DispatchResult {
    let Some(action) = CallbackAction::parse(action) else {
        debug!(chat_id, action, "Ignoring unrecognized callback action");
        return DispatchResult::none();
    };
    let Some(locale) = session.locale else {
        debug!(chat_id, "Callback received before locale selection");
        return DispatchResult::none();
    };

    match action {
        CallbackAction::AznAccounts | CallbackAction::UsdAccounts | CallbackAction::EurAccounts => {
            let Some(phone) = session.phone_number.clone() else {
                debug!(chat_id, "Account callback without a verified phone");
                return DispatchResult::none();
            };
            let accounts = match gateway.get_accounts(&phone).await {
                Ok(accounts) => accounts,
                Err(e) => {
                    error!(chat_id, error = %e, "Account lookup failed");
                    return DispatchResult::none();
                }
            };
            let (list, currency) = match action {
                CallbackAction::AznAccounts => (&accounts.azn, "AZN"),
                CallbackAction::UsdAccounts => (&accounts.usd, "USD"),
                _ => (&accounts.eur, "EUR"),
            };
            DispatchResult::edit(
                chat_id,
                message_id,
                format_accounts(list, currency, locale),
                KeyboardSpec::None,
            )
        }
        CallbackAction::AznCredits | CallbackAction::UsdCredits => {
            let Some(phone) = session.phone_number.clone() else {
                debug!(chat_id, "Credit callback without a verified phone");
                return DispatchResult::none();
            };
            let credits = match gateway.get_credits_summary(&phone).await {
                Ok(credits) => credits,
                Err(e) => {
                    error!(chat_id, error = %e, "Credit summary lookup failed");
                    return DispatchResult::none();
                }
            };
            let (total, currency) = match action {
                CallbackAction::AznCredits => (credits.azn_total, "AZN"),
                _ => (credits.usd_total, "USD"),
            };
            DispatchResult::edit(
                chat_id,
                message_id,
                format_credits(total, currency, locale),
                KeyboardSpec::None,
            )
        }
        CallbackAction::BakuBranches => DispatchResult::edit(
            chat_id,
            message_id,
            t("select-action", locale),
            ui_builder::baku_branches_menu(locale),
        ),
        CallbackAction::RegionalBranches => DispatchResult::edit(
            chat_id,
            message_id,
            t("select-action", locale),
            ui_builder::regional_branches_menu(locale),
        ),
        CallbackAction::Branch(branch) => match gateway.get_branch_address(branch.id()).await {
            Ok(address) => {
                DispatchResult::edit(chat_id, message_id, address, KeyboardSpec::None)
            }
            Err(e) => {
                error!(chat_id, branch = branch.id(), error = %e, "Branch address lookup failed");
                DispatchResult::none()
            }
        },
    }
}

async fn handle_contact_shared(
    chat_id: i64,
    raw_phone: &str,
    session: &mut Session,
    gateway: &dyn BankingGateway,
) -> DispatchResult {
    let phone = normalize_phone_number(raw_phone);
    debug!(chat_id, "Contact shared");
    session.phone_number = Some(phone.clone());

    let locale = session.locale.unwrap_or_default();
    match gateway.get_customer_identity(&phone).await {
        Ok(Some(identity)) => DispatchResult::send(
            chat_id,
            t_args(
                "welcome-text",
                &[
                    ("name", identity.name.as_str()),
                    ("surname", identity.surname.as_str()),
                ],
                locale,
            ),
            ui_builder::build(MenuContext::None, Some(locale), true),
        ),
        Ok(None) => {
            // Unknown customer: forget the number we just stored.
            session.phone_number = None;
            DispatchResult::send(chat_id, t("no-user-information", locale), KeyboardSpec::None)
        }
        Err(e) => {
            error!(chat_id, error = %e, "Customer identity lookup failed");
            DispatchResult::none()
        }
    }
}

fn format_accounts(accounts: &[AccountBalance], currency: &str, locale: LocaleTag) -> String {
    if accounts.is_empty() {
        return t_args("no-accounts-found", &[("currency", currency)], locale);
    }

    let mut body = t_args("accounts-header", &[("currency", currency)], locale);
    for account in accounts {
        let balance = format!("{:.2}", account.balance);
        body.push('\n');
        body.push_str(&t_args(
            "account-balance-line",
            &[
                ("iban", account.iban.as_str()),
                ("balance", balance.as_str()),
                ("currency", currency),
            ],
            locale,
        ));
    }
    body
}

fn format_credits(total: f64, currency: &str, locale: LocaleTag) -> String {
    let amount = format!("{total:.2}");
    t_args(
        "credits-total",
        &[("amount", amount.as_str()), ("currency", currency)],
        locale,
    )
}
