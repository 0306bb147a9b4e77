//! Property-based tests for the message log and tokenizer.
//!
//! Tests verify that log invariants hold under arbitrary append, delete and
//! clear sequences, and that tokenization is total over arbitrary input.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use shello_core::{ClearScope, Draft, Kind, LogConfig, MessageLog, ParseError, tokenizer};

#[derive(Debug, Clone)]
enum Op {
    Append(Kind),
    AppendWithId(u64),
    Tombstone(usize),
    Clear(ClearScope),
}

fn kind_strategy() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Out),
        Just(Kind::In),
        Just(Kind::Info),
        Just(Kind::Error),
        Just(Kind::Command),
        Just(Kind::TempInfo),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => kind_strategy().prop_map(Op::Append),
        2 => (1u64..500).prop_map(Op::AppendWithId),
        2 => (0usize..64).prop_map(Op::Tombstone),
        1 => prop_oneof![Just(ClearScope::Visible), Just(ClearScope::All)].prop_map(Op::Clear),
    ]
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

proptest! {
    #[test]
    fn prop_ids_never_collide(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut log = MessageLog::new(LogConfig { capacity: 32 });
        let mut highest_seen = 0u64;

        for op in ops {
            match op {
                Op::Append(kind) => {
                    let id = log.append(Draft::new(kind, "x"), now());
                    let id = id.unwrap();
                    prop_assert!(id > highest_seen);
                    highest_seen = id;
                },
                Op::AppendWithId(server_id) => {
                    log.append(Draft::new(Kind::In, "server").server_id(server_id), now());
                },
                Op::Tombstone(index) => {
                    if let Some(entry) = log.entries().get(index).cloned() {
                        let before = log.len();
                        match entry.server_id {
                            Some(server_id) => prop_assert!(log.tombstone(server_id)),
                            None => {
                                // A server id equal to a local id must not reach the local entry.
                                log.tombstone(entry.id);
                                prop_assert_eq!(log.get(entry.id), Some(&entry));
                            },
                        }
                        prop_assert_eq!(log.len(), before);
                    }
                },
                Op::Clear(scope) => log.clear(scope),
            }

            prop_assert!(log.len() <= 32);
            let mut ids: Vec<u64> = log.entries().iter().map(|entry| entry.id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), log.len());

            let mut server_ids: Vec<u64> = log.entries().iter().filter_map(|entry| entry.server_id).collect();
            let with_server_id = server_ids.len();
            server_ids.sort_unstable();
            server_ids.dedup();
            prop_assert_eq!(server_ids.len(), with_server_id);
        }
    }

    #[test]
    fn prop_real_events_evict_transients(kinds in prop::collection::vec(kind_strategy(), 1..40)) {
        let mut log = MessageLog::default();

        for kind in kinds {
            log.append(Draft::new(kind, "x"), now());

            if matches!(kind, Kind::Info | Kind::In) {
                prop_assert!(log.entries().iter().all(|entry| !entry.kind.is_transient()));
            }
        }
    }

    #[test]
    fn prop_date_groups_cover_log(offsets in prop::collection::vec(0i64..(86_400 * 5), 0..40)) {
        let mut log = MessageLog::default();
        for offset in offsets {
            let at = now() + chrono::Duration::seconds(offset);
            log.append(Draft::new(Kind::In, "x").at(at), now());
        }

        let groups = log.group_by_date(&Utc);
        let total: usize = groups.iter().map(|group| group.entries.len()).sum();
        prop_assert_eq!(total, log.len());
        for pair in groups.windows(2) {
            prop_assert_ne!(pair[0].date, pair[1].date);
        }
    }

    #[test]
    fn prop_tokenizer_is_total(line in "\\PC*") {
        match tokenizer::parse(&line) {
            Ok(parsed) => {
                prop_assert!(!parsed.is_empty() || parsed.args.is_empty());
                prop_assert!(parsed.args.iter().all(|arg| !arg.is_empty()));
            },
            Err(ParseError::UnterminatedQuote { column, .. }) => {
                prop_assert!(column < line.chars().count());
            },
        }
    }

    #[test]
    fn prop_unquoted_words_round_trip(words in prop::collection::vec("[a-z0-9#@]{1,8}", 1..8)) {
        let parsed = tokenizer::parse(&words.join(" ")).unwrap();

        prop_assert_eq!(&parsed.command, &words[0]);
        prop_assert_eq!(&parsed.args[..], &words[1..]);
    }
}
