#![cfg(test)]

use super::*;
use crate::test::{setup, Setup, DELAY, EXPIRY, FUNDS};
use soroban_sdk::{
    testutils::{Address as _, Events},
    vec, Address, Env, IntoVal, Map, Symbol, TryFromVal, Val, Vec,
};

/// Names of the events the engine published during the last call.
fn published(s: &Setup) -> Vec<Symbol> {
    let prefix = Symbol::new(&s.env, "governance");
    let mut names = Vec::new(&s.env);
    for (contract, topics, _) in s.env.events().all().iter() {
        if contract != s.engine {
            continue;
        }
        assert_eq!(topics.len(), 2);
        let first = Symbol::try_from_val(&s.env, &topics.get_unchecked(0)).unwrap();
        assert_eq!(first, prefix);
        names.push_back(Symbol::try_from_val(&s.env, &topics.get_unchecked(1)).unwrap());
    }
    names
}

fn names(s: &Setup, expected: &[&str]) -> Vec<Symbol> {
    let mut out = Vec::new(&s.env);
    for name in expected {
        out.push_back(Symbol::new(&s.env, name));
    }
    out
}

/// Data of the `nth` engine event called `name` from the last call.
fn data(s: &Setup, name: &str, nth: u32) -> Map<Symbol, Val> {
    let wanted = Symbol::new(&s.env, name);
    let mut seen = 0;
    for (contract, topics, data) in s.env.events().all().iter() {
        if contract != s.engine {
            continue;
        }
        let topic = Symbol::try_from_val(&s.env, &topics.get_unchecked(1)).unwrap();
        if topic == wanted {
            if seen == nth {
                return Map::try_from_val(&s.env, &data).unwrap();
            }
            seen += 1;
        }
    }
    panic!("event not published");
}

fn field<T: TryFromVal<Env, Val>>(s: &Setup, data: &Map<Symbol, Val>, key: &str) -> T {
    let raw = data.get(Symbol::new(&s.env, key)).unwrap();
    T::try_from_val(&s.env, &raw).ok().unwrap()
}

#[test]
fn test_submit_events() {
    let s = setup(3, 2);
    let recipient = Address::generate(&s.env);
    let id = s.submit_transfer(&recipient, 100);

    assert_eq!(published(&s), names(&s, &["submitted", "confirmed"]));

    let submitted = data(&s, "submitted", 0);
    assert_eq!(field::<u64>(&s, &submitted, "id"), id);
    assert_eq!(field::<Address>(&s, &submitted, "proposer"), s.signer(0));
    assert_eq!(field::<Address>(&s, &submitted, "target"), recipient);
    assert_eq!(field::<i128>(&s, &submitted, "value"), 100);

    let confirmed = data(&s, "confirmed", 0);
    assert_eq!(field::<Address>(&s, &confirmed, "signer"), s.signer(0));
    assert_eq!(field::<u32>(&s, &confirmed, "confirmations"), 1);
}

#[test]
fn test_confirm_and_revoke_events() {
    let s = setup(3, 3);
    let id = s.submit_transfer(&Address::generate(&s.env), 100);

    s.client.confirm(&s.signer(1), &id);
    assert_eq!(published(&s), names(&s, &["confirmed"]));
    let confirmed = data(&s, "confirmed", 0);
    assert_eq!(field::<u64>(&s, &confirmed, "id"), id);
    assert_eq!(field::<u32>(&s, &confirmed, "confirmations"), 2);

    s.client.revoke(&s.signer(1), &id);
    assert_eq!(published(&s), names(&s, &["revoked"]));
    let revoked = data(&s, "revoked", 0);
    assert_eq!(field::<Address>(&s, &revoked, "signer"), s.signer(1));
    assert_eq!(field::<u32>(&s, &revoked, "confirmations"), 1);
}

#[test]
fn test_execute_events() {
    let s = setup(3, 2);
    let id = s.submit_transfer(&Address::generate(&s.env), 100);
    s.client.confirm(&s.signer(1), &id);
    s.advance(DELAY + 1);

    s.client.execute(&s.signer(2), &id);
    assert_eq!(published(&s), names(&s, &["executed"]));
    let executed = data(&s, "executed", 0);
    assert_eq!(field::<u64>(&s, &executed, "id"), id);
    assert_eq!(field::<Address>(&s, &executed, "executor"), s.signer(2));
}

#[test]
fn test_auto_execute_events() {
    let s = setup(3, 2);
    let id = s.submit_transfer(&Address::generate(&s.env), 100);
    s.advance(DELAY + 1);

    assert!(s.client.confirm(&s.signer(1), &id));
    assert_eq!(published(&s), names(&s, &["confirmed", "executed"]));
    let executed = data(&s, "executed", 0);
    assert_eq!(field::<Address>(&s, &executed, "executor"), s.signer(1));
}

#[test]
fn test_failed_execute_publishes_nothing() {
    let s = setup(3, 2);
    let id = s.submit_transfer(&Address::generate(&s.env), FUNDS + 1);
    s.client.confirm(&s.signer(1), &id);
    s.advance(DELAY + 1);

    assert!(s.client.try_execute(&s.signer(0), &id).is_err());
    assert_eq!(published(&s).len(), 0);
}

#[test]
fn test_cancel_events() {
    let s = setup(3, 2);
    let id = s.submit_transfer(&Address::generate(&s.env), 100);
    s.advance(EXPIRY + 1);

    s.client.cancel_expired(&s.signer(2), &id);
    assert_eq!(published(&s), names(&s, &["cancelled"]));
    let cancelled = data(&s, "cancelled", 0);
    assert_eq!(field::<u64>(&s, &cancelled, "id"), id);
    assert_eq!(field::<Address>(&s, &cancelled, "cancelled_by"), s.signer(2));
}

#[test]
fn test_emergency_events() {
    let s = setup(3, 2);
    s.govern("pause", Vec::new(&s.env));
    assert_eq!(published(&s), names(&s, &["paused", "executed"]));

    let recipient = Address::generate(&s.env);
    s.client.emergency_approve(&s.signer(0), &recipient, &1_000);
    assert_eq!(published(&s), names(&s, &["emergency_approval"]));
    let approval = data(&s, "emergency_approval", 0);
    assert_eq!(field::<Address>(&s, &approval, "signer"), s.signer(0));
    assert_eq!(field::<u32>(&s, &approval, "approvals"), 1);

    s.client.emergency_approve(&s.signer(1), &recipient, &1_000);
    assert_eq!(
        published(&s),
        names(&s, &["emergency_approval", "emergency_withdraw"])
    );
    assert_eq!(
        field::<u32>(&s, &data(&s, "emergency_approval", 0), "approvals"),
        2
    );
    let withdrawal = data(&s, "emergency_withdraw", 0);
    assert_eq!(field::<Address>(&s, &withdrawal, "token"), s.asset.address);
    assert_eq!(field::<Address>(&s, &withdrawal, "recipient"), recipient);
    assert_eq!(field::<i128>(&s, &withdrawal, "amount"), 1_000);
}

#[test]
fn test_signer_management_events() {
    let s = setup(3, 2);
    let fresh = Address::generate(&s.env);

    s.govern("add_signer", vec![&s.env, fresh.into_val(&s.env)]);
    assert_eq!(published(&s), names(&s, &["signer_added", "executed"]));
    let added = data(&s, "signer_added", 0);
    assert_eq!(field::<Address>(&s, &added, "signer"), fresh);
    assert_eq!(field::<u32>(&s, &added, "signer_count"), 4);

    s.govern("remove_signer", vec![&s.env, fresh.into_val(&s.env)]);
    assert_eq!(published(&s), names(&s, &["signer_removed", "executed"]));
    let removed = data(&s, "signer_removed", 0);
    assert_eq!(field::<Address>(&s, &removed, "signer"), fresh);
    assert_eq!(field::<u32>(&s, &removed, "signer_count"), 3);

    s.govern("change_threshold", vec![&s.env, 3u32.into_val(&s.env)]);
    assert_eq!(published(&s), names(&s, &["threshold_changed", "executed"]));
    let changed = data(&s, "threshold_changed", 0);
    assert_eq!(field::<u32>(&s, &changed, "old_threshold"), 2);
    assert_eq!(field::<u32>(&s, &changed, "new_threshold"), 3);
}

#[test]
fn test_add_signers_batch_events() {
    let s = setup(3, 2);
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    let batch: Vec<Address> = vec![&s.env, a.clone(), b.clone()];

    s.govern("add_signers_batch", vec![&s.env, batch.into_val(&s.env)]);
    assert_eq!(
        published(&s),
        names(&s, &["signer_added", "signer_added", "batch", "executed"])
    );
    assert_eq!(field::<Address>(&s, &data(&s, "signer_added", 1), "signer"), b);
    let summary = data(&s, "batch", 0);
    assert_eq!(
        field::<Symbol>(&s, &summary, "operation"),
        Symbol::new(&s.env, "add_signers")
    );
    assert_eq!(field::<u32>(&s, &summary, "processed"), 2);
}

#[test]
fn test_batch_processed_event() {
    let s = setup(3, 2);
    let recipient = Address::generate(&s.env);
    for _ in 0..3 {
        s.submit_transfer(&recipient, 1);
    }

    let ids = vec![&s.env, 0u64, 77, 1, 2];
    s.client.batch_confirm(&s.signer(1), &ids);
    assert_eq!(
        published(&s),
        names(&s, &["confirmed", "confirmed", "confirmed", "batch"])
    );
    let summary = data(&s, "batch", 0);
    assert_eq!(
        field::<Symbol>(&s, &summary, "operation"),
        Symbol::new(&s.env, "confirm")
    );
    assert_eq!(field::<u32>(&s, &summary, "processed"), 3);
    assert_eq!(field::<u32>(&s, &summary, "examined"), 4);
}
