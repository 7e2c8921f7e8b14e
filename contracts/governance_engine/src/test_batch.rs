#![cfg(test)]

use super::*;
use crate::test::{setup, setup_with, Setup, DELAY, EXPIRY};
use soroban_sdk::{testutils::Address as _, vec, Address, IntoVal, Vec};

fn submit_many(s: &Setup, count: u32) -> Address {
    let recipient = Address::generate(&s.env);
    for _ in 0..count {
        s.submit_transfer(&recipient, 1);
    }
    recipient
}

fn ids(s: &Setup, range: core::ops::Range<u64>) -> Vec<u64> {
    let mut out = Vec::new(&s.env);
    for id in range {
        out.push_back(id);
    }
    out
}

#[test]
fn test_batch_confirm() {
    let s = setup(3, 2);
    submit_many(&s, 5);

    let result = s.client.batch_confirm(&s.signer(1), &ids(&s, 0..5));
    assert_eq!(
        result,
        BatchResult {
            processed: 5,
            examined: 5
        }
    );
    for id in 0..5 {
        assert!(s.client.has_confirmed(&id, &s.signer(1)));
        assert_eq!(s.client.get_confirmation_count(&id), 2);
    }
}

#[test]
fn test_batch_confirm_skips_ineligible_ids() {
    let s = setup(3, 2);
    submit_many(&s, 3);
    s.client.confirm(&s.signer(1), &2);

    let batch = vec![&s.env, 0u64, 999, 1, 2, 1];
    let result = s.client.batch_confirm(&s.signer(1), &batch);
    assert_eq!(result.processed, 2);
    assert_eq!(result.examined, 5);
}

#[test]
fn test_batch_confirm_does_not_auto_execute() {
    let s = setup(3, 2);
    submit_many(&s, 2);
    s.advance(DELAY + 1);

    s.client.batch_confirm(&s.signer(1), &ids(&s, 0..2));
    assert!(!s.client.get_proposal(&0).executed);
    assert!(!s.client.get_proposal(&1).executed);
    s.client.execute(&s.signer(0), &0);
}

#[test]
fn test_batch_empty() {
    let s = setup(3, 2);
    let result = s.client.batch_confirm(&s.signer(1), &Vec::new(&s.env));
    assert_eq!(result.processed, 0);
    assert_eq!(result.examined, 0);
}

#[test]
fn test_batch_size_limits() {
    let s = setup(3, 2);
    assert_eq!(
        s.client
            .try_batch_confirm(&s.signer(1), &ids(&s, 0..(MAX_BATCH_SIZE as u64 + 1))),
        Err(Ok(GovernanceError::BatchTooLarge))
    );
    assert_eq!(
        s.client
            .try_batch_cancel_expired(&s.signer(1), &ids(&s, 0..(MAX_BATCH_SIZE as u64 + 1))),
        Err(Ok(GovernanceError::BatchTooLarge))
    );

    // Exactly the maximum is fine even when nothing exists.
    let result = s
        .client
        .batch_confirm(&s.signer(1), &ids(&s, 0..MAX_BATCH_SIZE as u64));
    assert_eq!(result.processed, 0);
}

#[test]
fn test_batch_requires_signer() {
    let s = setup(3, 2);
    submit_many(&s, 1);
    let outsider = Address::generate(&s.env);
    assert_eq!(
        s.client.try_batch_confirm(&outsider, &ids(&s, 0..1)),
        Err(Ok(GovernanceError::NotSigner))
    );
    assert_eq!(
        s.client.try_batch_cancel_expired(&outsider, &ids(&s, 0..1)),
        Err(Ok(GovernanceError::NotSigner))
    );
}

#[test]
fn test_batch_stops_when_budget_runs_out() {
    let mut config = default_config();
    config.batch_budget = 3 * CONFIRM_COST + 1;
    let s = setup_with(3, 2, config, 100);
    submit_many(&s, 6);

    let first = s.client.batch_confirm(&s.signer(1), &ids(&s, 0..6));
    assert_eq!(first.processed, 3);
    assert_eq!(first.examined, 3);
    assert!(!s.client.has_confirmed(&3, &s.signer(1)));

    // Resubmitting the remainder picks up where the first call stopped.
    let second = s.client.batch_confirm(&s.signer(1), &ids(&s, 3..6));
    assert_eq!(second.processed, 3);
    for id in 0..6 {
        assert!(s.client.has_confirmed(&id, &s.signer(1)));
    }
}

#[test]
fn test_batch_skips_spend_budget() {
    let mut config = default_config();
    config.batch_budget = CONFIRM_COST + 2 * SKIP_COST;
    let s = setup_with(3, 2, config, 100);
    submit_many(&s, 2);

    // Two unknown ids cost a unit each, leaving room for one confirmation.
    let batch = vec![&s.env, 50u64, 51, 0, 1];
    let result = s.client.batch_confirm(&s.signer(1), &batch);
    assert_eq!(result.processed, 1);
    assert_eq!(result.examined, 3);
}

#[test]
fn test_batch_cancel_expired() {
    let s = setup(3, 2);
    submit_many(&s, 5);
    s.client.confirm(&s.signer(1), &4);
    s.advance(DELAY + 1);
    s.client.execute(&s.signer(0), &4);

    s.advance(EXPIRY);
    let result = s.client.batch_cancel_expired(&s.signer(1), &ids(&s, 0..5));
    assert_eq!(result.processed, 4);
    assert_eq!(result.examined, 5);
    for id in 0..4 {
        assert!(s.client.get_proposal(&id).cancelled);
    }
    assert!(!s.client.get_proposal(&4).cancelled);
    assert_eq!(s.client.get_pending_count(), 0);
}

#[test]
fn test_batch_cancel_skips_unexpired() {
    let s = setup(3, 2);
    submit_many(&s, 2);
    s.advance(EXPIRY + 1);
    submit_many(&s, 2);

    let result = s.client.batch_cancel_expired(&s.signer(0), &ids(&s, 0..4));
    assert_eq!(result.processed, 2);
    assert_eq!(s.client.get_pending_count(), 2);
}

#[test]
fn test_pending_pagination_scenario() {
    let s = setup(3, 2);
    s.env.cost_estimate().budget().reset_unlimited();
    submit_many(&s, 150);

    let page = s.client.list_pending_paginated(&2, &50);
    assert_eq!(page.info.total_count, 150);
    assert_eq!(page.info.total_pages, 3);
    assert_eq!(page.info.page, 2);
    assert_eq!(page.ids.len(), 50);
    assert_eq!(page.ids, ids(&s, 100..150));
}

#[test]
fn test_pending_pagination_is_complete_for_every_page_size() {
    let s = setup(3, 2);
    s.env.cost_estimate().budget().reset_unlimited();
    submit_many(&s, 23);

    // Finalize a few so the pending set has gaps.
    s.client.confirm(&s.signer(1), &4);
    s.client.confirm(&s.signer(1), &17);
    s.advance(DELAY + 1);
    s.client.execute(&s.signer(0), &4);
    s.client.execute(&s.signer(0), &17);

    let mut expected = Vec::new(&s.env);
    for id in 0..23u64 {
        if id != 4 && id != 17 {
            expected.push_back(id);
        }
    }

    for page_size in [1u32, 2, 5, 7, 21, 22, 50, MAX_PAGE_SIZE] {
        let mut collected = Vec::new(&s.env);
        let mut page = 0;
        loop {
            let result = s.client.list_pending_paginated(&page, &page_size);
            assert!(result.ids.len() <= page_size);
            collected.append(&result.ids);
            page += 1;
            if page >= result.info.total_pages {
                break;
            }
        }
        // Removals reorder the index, so compare as sets.
        assert_eq!(collected.len(), expected.len());
        for id in expected.iter() {
            assert!(collected.contains(id));
        }
    }
}

#[test]
fn test_signer_pagination() {
    let s = setup(3, 2);
    let mut fresh = Vec::new(&s.env);
    for _ in 0..10 {
        fresh.push_back(Address::generate(&s.env));
    }
    s.govern("add_signers_batch", vec![&s.env, fresh.into_val(&s.env)]);

    let first = s.client.list_signers_paginated(&0, &5);
    assert_eq!(first.info.total_count, 13);
    assert_eq!(first.info.total_pages, 3);
    assert_eq!(first.signers.len(), 5);

    let last = s.client.list_signers_paginated(&2, &5);
    assert_eq!(last.signers.len(), 3);

    let mut collected = Vec::new(&s.env);
    for page in 0..3 {
        collected.append(&s.client.list_signers_paginated(&page, &5).signers);
    }
    assert_eq!(collected, s.client.get_signers());
}

#[test]
fn test_pagination_errors() {
    let s = setup(3, 2);
    assert_eq!(
        s.client.try_list_signers_paginated(&0, &0),
        Err(Ok(GovernanceError::InvalidPageSize))
    );
    assert_eq!(
        s.client
            .try_list_signers_paginated(&0, &(MAX_PAGE_SIZE + 1)),
        Err(Ok(GovernanceError::InvalidPageSize))
    );
    assert_eq!(
        s.client.try_list_signers_paginated(&999, &5),
        Err(Ok(GovernanceError::PageOutOfBounds))
    );
    assert_eq!(
        s.client.try_list_pending_paginated(&1, &5),
        Err(Ok(GovernanceError::PageOutOfBounds))
    );
}

#[test]
fn test_pending_pagination_empty() {
    let s = setup(3, 2);
    let page = s.client.list_pending_paginated(&0, &5);
    assert_eq!(page.ids.len(), 0);
    assert_eq!(page.info.total_count, 0);
    assert_eq!(page.info.total_pages, 0);
}
