//! Integration tests for the conversation dispatcher, driven through an
//! in-memory banking gateway.

use async_trait::async_trait;
use std::sync::Mutex;

use bankbot::bot::commands::{LOCALE_SELECTOR_AZ, LOCALE_SELECTOR_EN, LOCALE_SELECTOR_RU};
use bankbot::bot::dispatcher::{dispatch, InboundEvent, ReplyTarget};
use bankbot::bot::ui_builder::{self, KeyboardSpec};
use bankbot::gateway::{
    AccountBalance, AccountsByCurrency, BankingGateway, CreditsSummary, CustomerIdentity,
    GatewayError, GatewayResult,
};
use bankbot::localization::{init_localization, t, LocaleTag};
use bankbot::session::{MenuContext, Session};

const CHAT_ID: i64 = 42;
const MESSAGE_ID: i32 = 7;

const AZN_IBAN: &str = "AZ21NABZ00000000137010001944";
const EUR_IBAN: &str = "AZ77NABZ00000000137010002588";

/// In-memory gateway with canned answers. `fail == true` makes every
/// lookup report a transport error.
#[derive(Default)]
struct MockGateway {
    identity: Option<CustomerIdentity>,
    fail: bool,
    identity_requests: Mutex<Vec<String>>,
}

impl MockGateway {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn with_identity(name: &str, surname: &str) -> Self {
        Self {
            identity: Some(CustomerIdentity {
                name: name.to_string(),
                surname: surname.to_string(),
            }),
            ..Self::default()
        }
    }

    fn check_failure<T>(&self, value: T) -> GatewayResult<T> {
        if self.fail {
            Err(GatewayError::Http("connection refused".to_string()))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl BankingGateway for MockGateway {
    async fn get_customer_identity(&self, phone: &str) -> GatewayResult<Option<CustomerIdentity>> {
        self.identity_requests
            .lock()
            .unwrap()
            .push(phone.to_string());
        self.check_failure(self.identity.clone())
    }

    async fn get_accounts(&self, _phone: &str) -> GatewayResult<AccountsByCurrency> {
        self.check_failure(AccountsByCurrency {
            azn: vec![AccountBalance {
                iban: AZN_IBAN.to_string(),
                balance: 250.4,
            }],
            usd: vec![],
            eur: vec![AccountBalance {
                iban: EUR_IBAN.to_string(),
                balance: 99.995,
            }],
        })
    }

    async fn get_credits_summary(&self, _phone: &str) -> GatewayResult<CreditsSummary> {
        self.check_failure(CreditsSummary {
            azn_total: 1250.5,
            usd_total: 300.0,
        })
    }

    async fn get_currency_rates(&self, _locale: LocaleTag) -> GatewayResult<String> {
        self.check_failure("1 USD = 1.70 AZN".to_string())
    }

    async fn get_bank_news(&self, _locale: LocaleTag) -> GatewayResult<String> {
        self.check_failure("Grand opening of the new branch".to_string())
    }

    async fn get_branch_address(&self, branch_id: &str) -> GatewayResult<String> {
        self.check_failure(format!("Address of {branch_id}"))
    }
}

fn setup_localization() {
    init_localization().expect("Failed to initialize localization");
}

fn text_event(text: &str) -> InboundEvent {
    InboundEvent::TextCommand {
        chat_id: CHAT_ID,
        text: text.to_string(),
    }
}

fn callback_event(action: &str) -> InboundEvent {
    InboundEvent::CallbackAction {
        chat_id: CHAT_ID,
        message_id: MESSAGE_ID,
        action: action.to_string(),
    }
}

fn contact_event(phone: &str) -> InboundEvent {
    InboundEvent::ContactShared {
        chat_id: CHAT_ID,
        phone_number: phone.to_string(),
    }
}

fn authenticated_session(locale: LocaleTag) -> Session {
    Session {
        locale: Some(locale),
        phone_number: Some("994501234567".to_string()),
        menu_context: MenuContext::None,
    }
}

#[tokio::test]
async fn test_locale_selection_sets_locale_from_any_state() {
    setup_localization();
    let gateway = MockGateway::default();

    let selectors = [
        (LOCALE_SELECTOR_AZ, LocaleTag::Az),
        (LOCALE_SELECTOR_EN, LocaleTag::En),
        (LOCALE_SELECTOR_RU, LocaleTag::Ru),
    ];

    for (selector, expected) in selectors {
        // Prior state must not matter.
        let mut session = authenticated_session(LocaleTag::Ru);
        session.menu_context = MenuContext::Settings;

        let result = dispatch(text_event(selector), &mut session, &gateway).await;

        assert_eq!(session.locale, Some(expected));
        assert_eq!(session.menu_context, MenuContext::None);

        let reply = result.reply.expect("locale selection must reply");
        assert_eq!(reply.text, t("authentication-text", expected));
        assert_eq!(reply.keyboard, KeyboardSpec::None);
        assert_eq!(reply.target, ReplyTarget::Send { chat_id: CHAT_ID });
    }
}

#[tokio::test]
async fn test_start_clears_phone_and_is_idempotent() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);
    session.menu_context = MenuContext::Accounts;

    for _ in 0..3 {
        let result = dispatch(text_event("/start"), &mut session, &gateway).await;

        assert_eq!(session.phone_number, None);
        assert_eq!(session.menu_context, MenuContext::None);

        let reply = result.reply.expect("/start must reply");
        assert_eq!(reply.text, t("start-text", LocaleTag::En));
        assert_eq!(reply.keyboard, ui_builder::locale_chooser());
    }
}

#[tokio::test]
async fn test_start_without_locale_uses_default_language() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session::default();

    let result = dispatch(text_event("/start"), &mut session, &gateway).await;

    let reply = result.reply.expect("/start must reply");
    assert_eq!(reply.text, t("start-text", LocaleTag::Az));
    assert_eq!(session.locale, None);
}

#[tokio::test]
async fn test_contact_phone_number_is_normalized() {
    setup_localization();
    let gateway = MockGateway::with_identity("Ali", "Aliyev");
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    dispatch(contact_event("+994501234567"), &mut session, &gateway).await;

    assert_eq!(session.phone_number.as_deref(), Some("994501234567"));
    assert_eq!(
        *gateway.identity_requests.lock().unwrap(),
        vec!["994501234567".to_string()]
    );
}

#[tokio::test]
async fn test_contact_with_unknown_identity_clears_phone() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let result = dispatch(contact_event("+994501234567"), &mut session, &gateway).await;

    assert_eq!(session.phone_number, None);
    let reply = result.reply.expect("unknown identity must reply");
    assert_eq!(reply.text, t("no-user-information", LocaleTag::En));
    assert_eq!(reply.keyboard, KeyboardSpec::None);
}

#[tokio::test]
async fn test_contact_with_known_identity_sends_welcome() {
    setup_localization();
    let gateway = MockGateway::with_identity("Ali", "Aliyev");
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let result = dispatch(contact_event("+994501234567"), &mut session, &gateway).await;

    let reply = result.reply.expect("known identity must reply");
    assert!(reply.text.contains("Ali"));
    assert!(reply.text.contains("Aliyev"));
    assert_eq!(
        reply.keyboard,
        ui_builder::build(MenuContext::None, Some(LocaleTag::En), true)
    );

    // The full keyboard carries the phone-dependent menu rows.
    match reply.keyboard {
        KeyboardSpec::Reply(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].len(), 2);
        }
        other => panic!("expected reply keyboard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_contact_lookup_failure_keeps_stored_phone() {
    setup_localization();
    let gateway = MockGateway::failing();
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let result = dispatch(contact_event("+994501234567"), &mut session, &gateway).await;

    // The event is dropped; mutations made before the failing call remain.
    assert!(result.reply.is_none());
    assert_eq!(session.phone_number.as_deref(), Some("994501234567"));
}

#[tokio::test]
async fn test_unrecognized_callback_is_a_no_op() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::Ru);
    let before = session.clone();

    let result = dispatch(callback_event("Unknown_Action"), &mut session, &gateway).await;

    assert!(result.reply.is_none());
    assert_eq!(session, before);
}

#[tokio::test]
async fn test_callback_before_locale_selection_is_ignored() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session::default();

    let result = dispatch(callback_event("AZN_Account"), &mut session, &gateway).await;

    assert!(result.reply.is_none());
}

#[tokio::test]
async fn test_account_callback_without_phone_is_ignored() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let result = dispatch(callback_event("AZN_Account"), &mut session, &gateway).await;

    assert!(result.reply.is_none());
}

#[tokio::test]
async fn test_fallback_without_locale_prompts_language_choice() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session::default();

    let result = dispatch(text_event("hello there"), &mut session, &gateway).await;

    let reply = result.reply.expect("fallback must reply");
    assert_eq!(reply.text, t("select-action", LocaleTag::Az));
    assert_eq!(reply.keyboard, ui_builder::locale_chooser());
}

#[tokio::test]
async fn test_fallback_with_locale_prompts_main_menu() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::Ru),
        ..Session::default()
    };

    let result = dispatch(text_event("что-то"), &mut session, &gateway).await;

    let reply = result.reply.expect("fallback must reply");
    assert_eq!(reply.text, t("select-action", LocaleTag::Ru));
    assert_eq!(
        reply.keyboard,
        ui_builder::build(MenuContext::None, Some(LocaleTag::Ru), false)
    );
}

#[tokio::test]
async fn test_menu_label_without_locale_falls_back_to_language_prompt() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session::default();

    // A valid menu label typed before choosing a language.
    let label = format!("💸 {}", t("button-accounts-view", LocaleTag::En));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    let reply = result.reply.expect("fallback must reply");
    assert_eq!(reply.keyboard, ui_builder::locale_chooser());
    assert_eq!(session.menu_context, MenuContext::None);
}

#[tokio::test]
async fn test_accounts_command_with_phone_offers_currency_drilldown() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);

    let label = format!("💸 {}", t("button-accounts-view", LocaleTag::En));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    assert_eq!(session.menu_context, MenuContext::Accounts);
    let reply = result.reply.expect("accounts command must reply");
    assert_eq!(reply.text, t("accounts-types-text", LocaleTag::En));
    match reply.keyboard {
        KeyboardSpec::Inline(rows) => {
            let actions: Vec<&str> = rows
                .iter()
                .flatten()
                .map(|button| button.action.as_str())
                .collect();
            assert_eq!(actions, ["AZN_Account", "USD_Account", "EUR_Account"]);
        }
        other => panic!("expected inline keyboard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_accounts_command_without_phone_keeps_contact_keyboard() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let label = format!("💸 {}", t("button-accounts-view", LocaleTag::En));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    assert_eq!(session.menu_context, MenuContext::Accounts);
    let reply = result.reply.expect("accounts command must reply");
    match reply.keyboard {
        KeyboardSpec::Reply(rows) => {
            assert!(rows[0][0].request_contact);
        }
        other => panic!("expected reply keyboard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_news_command_uses_gateway_text() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);

    let label = format!("📰 {}", t("button-bank-news", LocaleTag::En));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    let reply = result.reply.expect("news command must reply");
    assert_eq!(reply.text, "Grand opening of the new branch");
    assert_eq!(session.menu_context, MenuContext::None);
}

#[tokio::test]
async fn test_currency_command_uses_gateway_text() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::Az);

    let label = format!("💲 {}", t("button-currency-rates", LocaleTag::Az));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    let reply = result.reply.expect("currency command must reply");
    assert_eq!(reply.text, "1 USD = 1.70 AZN");
}

#[tokio::test]
async fn test_news_lookup_failure_drops_the_event() {
    setup_localization();
    let gateway = MockGateway::failing();
    let mut session = authenticated_session(LocaleTag::En);

    let label = format!("📰 {}", t("button-bank-news", LocaleTag::En));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    assert!(result.reply.is_none());
}

#[tokio::test]
async fn test_settings_command_shows_settings_keyboard() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::Ru),
        ..Session::default()
    };

    let label = format!("⚙ {}", t("button-settings", LocaleTag::Ru));
    let result = dispatch(text_event(&label), &mut session, &gateway).await;

    assert_eq!(session.menu_context, MenuContext::Settings);
    let reply = result.reply.expect("settings command must reply");
    assert_eq!(reply.text, t("select-action", LocaleTag::Ru));
    match reply.keyboard {
        KeyboardSpec::Reply(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].len(), 1);
            assert_eq!(rows[1].len(), 1);
        }
        other => panic!("expected reply keyboard, got {other:?}"),
    }
}

#[tokio::test]
async fn test_account_callback_edits_message_with_balances() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);

    let result = dispatch(callback_event("AZN_Account"), &mut session, &gateway).await;

    let reply = result.reply.expect("account callback must reply");
    assert_eq!(
        reply.target,
        ReplyTarget::Edit {
            chat_id: CHAT_ID,
            message_id: MESSAGE_ID
        }
    );
    assert!(reply.text.contains(AZN_IBAN));
    assert!(reply.text.contains("250.40"));
    assert_eq!(reply.keyboard, KeyboardSpec::None);
}

#[tokio::test]
async fn test_usd_account_callback_reports_missing_accounts() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);

    let result = dispatch(callback_event("USD_Account"), &mut session, &gateway).await;

    let reply = result.reply.expect("account callback must reply");
    assert_eq!(reply.text, "You have no USD accounts.");
}

#[tokio::test]
async fn test_credit_callback_edits_message_with_total() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = authenticated_session(LocaleTag::En);

    let result = dispatch(callback_event("AZN_Credits"), &mut session, &gateway).await;

    let reply = result.reply.expect("credit callback must reply");
    assert!(reply.text.contains("1250.50"));
    assert!(reply.text.contains("AZN"));
}

#[tokio::test]
async fn test_branch_category_callback_attaches_submenu() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::En),
        ..Session::default()
    };

    let result = dispatch(callback_event("Baku_Branches"), &mut session, &gateway).await;

    let reply = result.reply.expect("branch category must reply");
    assert_eq!(
        reply.target,
        ReplyTarget::Edit {
            chat_id: CHAT_ID,
            message_id: MESSAGE_ID
        }
    );
    assert_eq!(reply.text, t("select-action", LocaleTag::En));
    assert_eq!(reply.keyboard, ui_builder::baku_branches_menu(LocaleTag::En));
}

#[tokio::test]
async fn test_branch_address_callback_uses_gateway_text() {
    setup_localization();
    let gateway = MockGateway::default();
    let mut session = Session {
        locale: Some(LocaleTag::Az),
        ..Session::default()
    };

    let result = dispatch(callback_event("Head_Office"), &mut session, &gateway).await;

    let reply = result.reply.expect("branch address must reply");
    assert_eq!(reply.text, "Address of Head_Office");
    assert_eq!(reply.keyboard, KeyboardSpec::None);
}
