//! Swap client amount tests
//!
//! Linked amounts, token selection and feed refresh through `IdoSwapClient`.
//!
//! Run:
//!     cargo test --test swap_client_tests -- --nocapture

use ido_swap_sdk::{
    IdoSwapClient, PrecisionPolicy, QuickFill, SalePhase, SaleStatus, SwapConfig, SwapError,
    SwapSide, TokenCatalog, TokenInfo,
    constants::{ATOM_DENOM, DEFAULT_TOKEN_DECIMALS, JUNO_DENOM, USDC_DENOM},
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use test_helpers::*;

#[test]
fn test_origin_edit_derives_target() {
    let client = active_client(MockExecutor::succeeding());

    assert!(client.set_amount(SwapSide::Origin, 10.0));
    let amount = client.amounts();
    assert_eq!(amount.origin, 10.0);
    assert_eq!(amount.target, 30.0);
    assert_eq!(amount.authoritative, SwapSide::Origin);
}

#[test]
fn test_target_edit_derives_origin() {
    let client = active_client(MockExecutor::succeeding());

    assert!(client.set_amount(SwapSide::Target, 30.0));
    let amount = client.amounts();
    assert_eq!(amount.origin, 10.0);
    assert_eq!(amount.target, 30.0);
    assert_eq!(amount.authoritative, SwapSide::Target);
}

#[test]
fn test_text_input_is_parsed_or_ignored() {
    let client = active_client(MockExecutor::succeeding());

    assert!(client.set_amount_text(SwapSide::Origin, "2.5"));
    assert_eq!(client.amounts().target, 7.5);

    // unparsable and negative input leave the pair untouched
    assert!(!client.set_amount_text(SwapSide::Origin, "abc"));
    assert!(!client.set_amount_text(SwapSide::Origin, "-1"));
    assert_eq!(client.amounts().origin, 2.5);

    assert!(client.set_amount_text(SwapSide::Origin, ""));
    assert!(client.amounts().is_empty());
}

#[test]
fn test_percent_fill_uses_balance() {
    let client = active_client(MockExecutor::succeeding());
    client.apply_balances(juno_balance(200_000_000));
    assert_eq!(client.available_balance(), 200.0);

    client.set_from_percent(0.5).unwrap();
    let amount = client.amounts();
    assert_eq!(amount.origin, 100.0);
    assert_eq!(amount.target, 300.0);

    client.quick_fill(QuickFill::Max);
    assert_eq!(client.amounts().origin, 200.0);
    assert_eq!(client.amounts().target, 600.0);

    client.quick_fill(QuickFill::Quarter);
    assert_eq!(client.amounts().origin, 50.0);
}

#[test]
fn test_percent_fill_rejects_out_of_range() {
    let client = active_client(MockExecutor::succeeding());
    client.apply_balances(juno_balance(200_000_000));
    client.set_amount(SwapSide::Origin, 1.0);

    assert_eq!(client.set_from_percent(1.5), Err(SwapError::InvalidFraction(1.5)));
    assert_eq!(client.set_from_percent(-0.1), Err(SwapError::InvalidFraction(-0.1)));
    assert_eq!(client.amounts().origin, 1.0);
}

#[test]
fn test_select_token_rederives_target_from_origin() {
    let client = active_client(MockExecutor::succeeding());
    client.apply_balances(HashMap::from([
        (JUNO_DENOM.to_string(), 1_000_000),
        (ATOM_DENOM.to_string(), 5_000_000),
    ]));
    client.set_amount(SwapSide::Target, 30.0);
    assert_eq!(client.amounts().origin, 10.0);

    client.select_token(ATOM_DENOM).unwrap();
    let amount = client.amounts();
    assert_eq!(amount.origin, 10.0);
    assert_eq!(amount.target, 200.0);
    assert_eq!(client.selected_token().symbol, "ATOM");
    assert_eq!(client.available_balance(), 5.0);
    assert_eq!(client.rate_label(), "1 ATOM = 20 HOPERS");
}

#[test]
fn test_select_unknown_token_keeps_selection() {
    let client = active_client(MockExecutor::succeeding());

    assert_eq!(client.select_token("uhope"), Err(SwapError::UnknownToken("uhope".to_string())));
    assert_eq!(client.selected_token().denom, JUNO_DENOM);
}

#[test]
fn test_select_token_without_ratio_keeps_selection() {
    let executor = MockExecutor::succeeding();
    let status = SaleStatus::new(SalePhase::Active).with_cost(JUNO_DENOM, 3.0);
    let client = IdoSwapClient::new(sale(), sync_config(), executor, status).unwrap();

    assert_eq!(client.select_token(USDC_DENOM), Err(SwapError::MissingRatio(USDC_DENOM.to_string())));
    assert_eq!(client.selected_token().denom, JUNO_DENOM);
    assert_eq!(client.ratio().value(), 3.0);
}

#[test]
fn test_client_rejects_missing_initial_ratio() {
    let status = SaleStatus::new(SalePhase::Active).with_cost(ATOM_DENOM, 20.0);
    let result = IdoSwapClient::new(sale(), SwapConfig::new(), MockExecutor::succeeding(), status);
    assert!(matches!(result, Err(SwapError::MissingRatio(_))));
}

#[test]
fn test_custom_catalog() {
    let catalog = TokenCatalog::new();
    catalog.insert(TokenInfo::new("uhope", "HOPE", 6));
    let status = SaleStatus::new(SalePhase::Active).with_cost("uhope", 0.25);

    let client = IdoSwapClient::with_catalog(
        sale(),
        sync_config(),
        MockExecutor::succeeding(),
        status,
        Arc::new(catalog),
        "uhope",
    )
    .unwrap();
    client.set_amount(SwapSide::Origin, 8.0);
    assert_eq!(client.amounts().target, 2.0);
    assert_eq!(client.rate_label(), "1 HOPE = 0.25 HOPERS");
    assert_eq!(client.catalog().len(), 1);
}

#[test]
fn test_token_without_decimals_uses_default_precision() {
    let catalog = TokenCatalog::with_known_tokens();
    catalog.insert(TokenInfo::new("ibc/HOPE", "HOPE", 0));
    let status = status(SalePhase::Active).with_cost("ibc/HOPE", 2.0);
    let client = IdoSwapClient::with_catalog(
        sale(),
        sync_config().with_precision_policy(PrecisionPolicy::RoundToDisplay),
        MockExecutor::succeeding(),
        status,
        Arc::new(catalog),
        JUNO_DENOM,
    )
    .unwrap();
    client.apply_balances(HashMap::from([("ibc/HOPE".to_string(), 1_500_000)]));

    client.select_token("ibc/HOPE").unwrap();
    assert_eq!(client.selected_token().decimals, DEFAULT_TOKEN_DECIMALS);
    assert_eq!(client.available_balance(), 1.5);
    assert_eq!(client.balance_label(), "1.5 HOPE");

    client.set_amount(SwapSide::Target, 1.0);
    assert_eq!(client.amounts().origin, 0.5);
}

#[test]
fn test_ratio_update_from_status() {
    let client = active_client(MockExecutor::succeeding());
    client.set_amount(SwapSide::Origin, 10.0);

    let mut update = status(SalePhase::Active);
    update.costs.insert(JUNO_DENOM.to_string(), 4.0);
    client.apply_status(update).unwrap();

    assert_eq!(client.ratio().value(), 4.0);
    assert_eq!(client.amounts().target, 40.0);
}

#[test]
fn test_status_without_selected_ratio_keeps_previous() {
    let client = active_client(MockExecutor::succeeding());
    client.set_amount(SwapSide::Origin, 10.0);

    let update = SaleStatus::new(SalePhase::Active).with_cost(ATOM_DENOM, 20.0);
    assert_eq!(client.apply_status(update), Err(SwapError::MissingRatio(JUNO_DENOM.to_string())));
    assert_eq!(client.ratio().value(), 3.0);
    assert_eq!(client.amounts().target, 30.0);
}

#[test]
fn test_phase_regression_is_ignored() {
    let client = active_client(MockExecutor::succeeding());
    assert_eq!(client.phase(), SalePhase::Active);

    client.apply_status(status(SalePhase::Before)).unwrap();
    assert_eq!(client.phase(), SalePhase::Active);

    client.apply_status(status(SalePhase::Ended)).unwrap();
    assert_eq!(client.phase(), SalePhase::Ended);

    client.apply_status(status(SalePhase::Active)).unwrap();
    assert_eq!(client.phase(), SalePhase::Ended);
}

#[test]
fn test_listeners_see_changes_until_unsubscribed() {
    let client = active_client(MockExecutor::succeeding());
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let id = client.subscribe(move |amount| {
        assert!(amount.origin >= 0.0 && amount.target >= 0.0);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    client.set_amount(SwapSide::Origin, 1.0);
    client.set_amount(SwapSide::Target, 9.0);
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    // rejected input is not a change
    client.set_amount_text(SwapSide::Origin, "abc");
    assert_eq!(seen.load(Ordering::SeqCst), 2);

    assert!(client.unsubscribe(id));
    client.set_amount(SwapSide::Origin, 2.0);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn test_round_to_display_policy() {
    let config = sync_config().with_precision_policy(PrecisionPolicy::RoundToDisplay);
    let client = client_with(SalePhase::Active, config, MockExecutor::succeeding());

    client.set_amount(SwapSide::Target, 10.0);
    assert_eq!(client.amounts().origin, 3.333333);

    let unrounded = active_client(MockExecutor::succeeding());
    unrounded.set_amount(SwapSide::Target, 10.0);
    assert_eq!(unrounded.amounts().origin, 10.0 / 3.0);
}

#[test]
fn test_can_purchase() {
    let client = active_client(MockExecutor::succeeding());
    assert!(!client.can_purchase());
    client.set_amount(SwapSide::Origin, 1.0);
    assert!(client.can_purchase());

    let ended = client_with(SalePhase::Ended, sync_config(), MockExecutor::succeeding());
    ended.set_amount(SwapSide::Origin, 1.0);
    assert!(!ended.can_purchase());
}

#[test]
fn test_labels() {
    let client = active_client(MockExecutor::succeeding());
    client.apply_balances(juno_balance(1_234_567_890));

    assert_eq!(client.balance_label(), "1,234.57 JUNO");
    assert_eq!(client.rate_label(), "1 JUNO = 3 HOPERS");
}

#[tokio::test]
async fn test_refresh_applies_both_feeds() {
    let client = client_with(SalePhase::Before, sync_config(), MockExecutor::succeeding());
    client.set_amount(SwapSide::Origin, 10.0);

    let mut update = status(SalePhase::Active);
    update.costs.insert(JUNO_DENOM.to_string(), 5.0);
    let status_feed = StaticStatusFeed(Some(update));
    let balance_feed = StaticBalanceFeed(juno_balance(42_000_000));

    client.refresh(&status_feed, &balance_feed).await.unwrap();
    assert_eq!(client.phase(), SalePhase::Active);
    assert_eq!(client.available_balance(), 42.0);
    assert_eq!(client.amounts().target, 50.0);
}

#[tokio::test]
async fn test_refresh_failure_leaves_state() {
    let client = active_client(MockExecutor::succeeding());
    client.apply_balances(juno_balance(1_000_000));

    let status_feed = StaticStatusFeed(None);
    let balance_feed = StaticBalanceFeed(juno_balance(9_000_000));

    let err = client.refresh(&status_feed, &balance_feed).await.unwrap_err();
    println!("refresh error: {err:#}");
    assert_eq!(client.available_balance(), 1.0);
    assert_eq!(client.phase(), SalePhase::Active);
}
