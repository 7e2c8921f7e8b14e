#![cfg(test)]

use super::*;
use crate::test::{null_address, setup, setup_with, Setup, FUNDS};
use soroban_sdk::{testutils::Address as _, token, Address, IntoVal, Vec};

fn pause(s: &Setup) {
    s.govern("pause", Vec::new(&s.env));
    assert!(s.client.is_paused());
}

#[test]
fn test_emergency_withdrawal_scenario() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    let half = FUNDS / 2;

    assert!(!s.client.emergency_approve(&s.signer(0), &recipient, &half));
    assert_eq!(s.client.get_emergency_approval_count(), 1);
    assert!(s.client.has_emergency_approval(&s.signer(0)));
    assert_eq!(
        s.client.get_emergency_request(),
        Some(EmergencyRequest {
            token: s.asset.address.clone(),
            recipient: recipient.clone(),
            amount: half,
        })
    );

    assert!(s.client.emergency_approve(&s.signer(1), &recipient, &half));
    assert_eq!(s.asset.balance(&recipient), half);
    assert_eq!(s.client.get_balance(), FUNDS - half);

    assert_eq!(s.client.get_emergency_approval_count(), 0);
    assert_eq!(s.client.get_emergency_request(), None);
    for i in 0..3 {
        assert!(!s.client.has_emergency_approval(&s.signer(i)));
    }
}

#[test]
fn test_emergency_requires_pause() {
    let s = setup(3, 2);
    let recipient = Address::generate(&s.env);
    assert_eq!(
        s.client.try_emergency_approve(&s.signer(0), &recipient, &1),
        Err(Ok(GovernanceError::NotPaused))
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #27)")]
fn test_emergency_double_approval() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    s.client.emergency_approve(&s.signer(0), &recipient, &100);
    s.client.emergency_approve(&s.signer(0), &recipient, &100);
}

#[test]
fn test_emergency_validation() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    let outsider = Address::generate(&s.env);

    assert_eq!(
        s.client.try_emergency_approve(&outsider, &recipient, &1),
        Err(Ok(GovernanceError::NotSigner))
    );
    assert_eq!(
        s.client
            .try_emergency_approve(&s.signer(0), &null_address(&s.env), &1),
        Err(Ok(GovernanceError::InvalidRecipient))
    );
    assert_eq!(
        s.client.try_emergency_approve(&s.signer(0), &s.engine, &1),
        Err(Ok(GovernanceError::InvalidRecipient))
    );
    assert_eq!(
        s.client.try_emergency_approve(&s.signer(0), &recipient, &0),
        Err(Ok(GovernanceError::ZeroAmount))
    );
    assert_eq!(
        s.client
            .try_emergency_approve(&s.signer(0), &recipient, &(FUNDS / 2 + 1)),
        Err(Ok(GovernanceError::ExceedsLimit))
    );
    assert_eq!(s.client.get_emergency_approval_count(), 0);
}

#[test]
fn test_emergency_cap_for_any_fraction_and_balance() {
    for fraction in [1u32, 2_500, 5_000, 9_999, 10_000] {
        for balance in [1i128, 3, 999, 10_000, 1_000_000_007] {
            let mut config = default_config();
            config.emergency_fraction_bps = fraction;
            let s = setup_with(3, 2, config, balance);
            pause(&s);
            let recipient = Address::generate(&s.env);

            let limit = balance * fraction as i128 / BPS_DENOMINATOR as i128;
            assert_eq!(
                s.client
                    .try_emergency_approve(&s.signer(0), &recipient, &(limit + 1)),
                Err(Ok(GovernanceError::ExceedsLimit))
            );
            if limit > 0 {
                assert_eq!(
                    s.client
                        .try_emergency_approve(&s.signer(0), &recipient, &limit),
                    Ok(Ok(false))
                );
            }
        }
    }
}

#[test]
fn test_emergency_request_must_match_round() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    let other = Address::generate(&s.env);

    s.client.emergency_approve(&s.signer(0), &recipient, &100);
    assert_eq!(
        s.client.try_emergency_approve(&s.signer(1), &other, &100),
        Err(Ok(GovernanceError::RequestMismatch))
    );
    assert_eq!(
        s.client.try_emergency_approve(&s.signer(1), &recipient, &99),
        Err(Ok(GovernanceError::RequestMismatch))
    );
    assert_eq!(s.client.get_emergency_approval_count(), 1);
}

#[test]
fn test_emergency_fresh_round_after_withdrawal() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);

    s.client.emergency_approve(&s.signer(0), &recipient, &1_000);
    s.client.emergency_approve(&s.signer(1), &recipient, &1_000);

    // Everyone may approve again, including for a different request.
    let other = Address::generate(&s.env);
    assert!(!s.client.emergency_approve(&s.signer(0), &other, &500));
    assert!(s.client.emergency_approve(&s.signer(2), &other, &500));

    assert_eq!(s.asset.balance(&recipient), 1_000);
    assert_eq!(s.asset.balance(&other), 500);
    assert_eq!(s.client.get_emergency_approval_count(), 0);
}

#[test]
fn test_emergency_follows_current_threshold() {
    let s = setup(3, 2);
    s.govern("change_threshold", soroban_sdk::vec![&s.env, 3u32.into_val(&s.env)]);
    pause(&s);
    let recipient = Address::generate(&s.env);

    assert!(!s.client.emergency_approve(&s.signer(0), &recipient, &10));
    assert!(!s.client.emergency_approve(&s.signer(1), &recipient, &10));
    assert!(s.client.emergency_approve(&s.signer(2), &recipient, &10));
    assert_eq!(s.asset.balance(&recipient), 10);
}

#[test]
fn test_emergency_single_signer_quorum() {
    let s = setup(2, 1);
    pause(&s);
    let recipient = Address::generate(&s.env);
    assert!(s.client.emergency_approve(&s.signer(1), &recipient, &(FUNDS / 2)));
    assert_eq!(s.asset.balance(&recipient), FUNDS / 2);
}

#[test]
fn test_emergency_token_withdrawal() {
    let s = setup(3, 2);
    let issuer = Address::generate(&s.env);
    let other_token = s.env.register_stellar_asset_contract_v2(issuer).address();
    token::StellarAssetClient::new(&s.env, &other_token).mint(&s.engine, &800);
    pause(&s);

    let recipient = Address::generate(&s.env);
    assert_eq!(
        s.client
            .try_emergency_approve_token(&s.signer(0), &other_token, &recipient, &401),
        Err(Ok(GovernanceError::ExceedsLimit))
    );
    s.client
        .emergency_approve_token(&s.signer(0), &other_token, &recipient, &400);
    s.client
        .emergency_approve_token(&s.signer(1), &other_token, &recipient, &400);

    assert_eq!(token::TokenClient::new(&s.env, &other_token).balance(&recipient), 400);
    assert_eq!(s.client.get_balance(), FUNDS);
}

#[test]
fn test_unpause_clears_emergency_round() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    s.client.emergency_approve(&s.signer(0), &recipient, &100);

    s.govern("unpause", Vec::new(&s.env));
    assert_eq!(s.client.get_emergency_approval_count(), 0);
    assert!(!s.client.has_emergency_approval(&s.signer(0)));
}

#[test]
fn test_removed_signer_loses_emergency_approval() {
    let s = setup(3, 2);
    pause(&s);
    let recipient = Address::generate(&s.env);
    s.client.emergency_approve(&s.signer(2), &recipient, &100);

    s.govern("remove_signer", soroban_sdk::vec![&s.env, s.signer(2).into_val(&s.env)]);
    assert!(!s.client.has_emergency_approval(&s.signer(2)));
    assert_eq!(s.client.get_emergency_approval_count(), 0);

    assert!(!s.client.emergency_approve(&s.signer(0), &recipient, &100));
}
