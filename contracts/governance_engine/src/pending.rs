//! Index of proposals that are neither executed nor cancelled.
//!
//! Ids sit in a dense array of positions `0..count`, stored in buckets of
//! `BUCKET_SIZE` ids, with each id's position kept under its own key.
//! Removal moves the last id into the vacated position, so a mutation touches
//! at most two buckets and any page of up to `MAX_PAGE_SIZE` ids spans at most
//! two buckets.

use soroban_sdk::{Env, Vec};

use crate::config::{self, MAX_PAGE_SIZE};
use crate::types::DataKey;

const BUCKET_SIZE: u32 = MAX_PAGE_SIZE;

pub fn count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::PendingCount)
        .unwrap_or(0)
}

fn set_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::PendingCount, &count);
}

fn bucket(env: &Env, index: u32) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::PendingBucket(index))
        .unwrap_or(Vec::new(env))
}

fn save_bucket(env: &Env, index: u32, ids: &Vec<u64>) {
    let key = DataKey::PendingBucket(index);
    if ids.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, ids);
        config::bump_persistent(env, &key);
    }
}

fn set_position(env: &Env, id: u64, position: u32) {
    let key = DataKey::PendingSlot(id);
    env.storage().persistent().set(&key, &position);
    config::bump_persistent(env, &key);
}

pub fn insert(env: &Env, id: u64) {
    let position = count(env);
    let index = position / BUCKET_SIZE;
    let mut ids = bucket(env, index);
    ids.push_back(id);
    save_bucket(env, index, &ids);
    set_position(env, id, position);
    set_count(env, position + 1);
}

pub fn remove(env: &Env, id: u64) {
    let slot_key = DataKey::PendingSlot(id);
    let Some(position) = env.storage().persistent().get::<_, u32>(&slot_key) else {
        return;
    };
    env.storage().persistent().remove(&slot_key);

    let last = count(env) - 1;
    let last_index = last / BUCKET_SIZE;
    let mut tail = bucket(env, last_index);
    let Some(moved) = tail.pop_back() else {
        return;
    };

    if position != last {
        let index = position / BUCKET_SIZE;
        let offset = position % BUCKET_SIZE;
        if index == last_index {
            tail.set(offset, moved);
        } else {
            let mut ids = bucket(env, index);
            ids.set(offset, moved);
            save_bucket(env, index, &ids);
        }
        set_position(env, moved, position);
    }
    save_bucket(env, last_index, &tail);
    set_count(env, last);
}

/// Ids at positions `start..end`.
pub fn range(env: &Env, start: u32, end: u32) -> Vec<u64> {
    let mut out = Vec::new(env);
    if start >= end {
        return out;
    }
    for index in (start / BUCKET_SIZE)..=((end - 1) / BUCKET_SIZE) {
        let ids = bucket(env, index);
        let base = index * BUCKET_SIZE;
        let from = start.max(base) - base;
        let to = end.min(base + BUCKET_SIZE) - base;
        out.append(&ids.slice(from..to));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GovernanceEngine;

    fn all(env: &Env) -> Vec<u64> {
        range(env, 0, count(env))
    }

    #[test]
    fn test_insert_and_remove_keep_index_dense() {
        let env = Env::default();
        let engine = env.register(GovernanceEngine, ());
        env.as_contract(&engine, || {
            for id in 0..250u64 {
                insert(&env, id);
            }
            assert_eq!(count(&env), 250);
            assert_eq!(range(&env, 95, 105).len(), 10);
            assert_eq!(range(&env, 95, 105).first_unchecked(), 95);

            // Removing from the first bucket pulls the last id forward.
            remove(&env, 3);
            assert_eq!(count(&env), 249);
            assert_eq!(range(&env, 3, 4).first_unchecked(), 249);

            // Removing the last id is a plain pop.
            remove(&env, 248);
            assert_eq!(count(&env), 248);
            assert!(!all(&env).contains(248u64));

            // Unknown and already removed ids are ignored.
            remove(&env, 3);
            remove(&env, 9_999);
            assert_eq!(count(&env), 248);

            let ids = all(&env);
            assert_eq!(ids.len(), 248);
            for id in 0..248u64 {
                assert_eq!(ids.contains(id), id != 3);
            }
            assert!(ids.contains(249u64));
        });
    }

    #[test]
    fn test_drain_to_empty() {
        let env = Env::default();
        let engine = env.register(GovernanceEngine, ());
        env.as_contract(&engine, || {
            for id in 0..120u64 {
                insert(&env, id);
            }
            for id in (0..120u64).rev().step_by(2) {
                remove(&env, id);
            }
            for id in 0..120u64 {
                remove(&env, id);
            }
            assert_eq!(count(&env), 0);
            assert_eq!(all(&env).len(), 0);

            insert(&env, 500);
            assert_eq!(all(&env), Vec::from_array(&env, [500u64]));
        });
    }
}
