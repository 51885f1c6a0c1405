//! Property tests for the bounded token set

use bjj_engine::catalog::TokenKind;
use bjj_engine::core::{TokenSet, MAX_TOKENS};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(TokenKind),
    Remove(TokenKind),
}

fn token() -> impl Strategy<Value = TokenKind> {
    (0..TokenKind::ALL.len()).prop_map(|i| TokenKind::ALL[i])
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![token().prop_map(Op::Add), token().prop_map(Op::Remove)]
}

proptest! {
    #[test]
    fn never_more_than_two_distinct_tokens(ops in prop::collection::vec(op(), 0..64)) {
        let mut set = TokenSet::new();
        for op in ops {
            let before = set.clone();
            match op {
                Op::Add(token) => {
                    let added = set.add(token);
                    // refused exactly when already held or full
                    prop_assert_eq!(added, !before.contains(token) && !before.is_full());
                    if !added {
                        prop_assert_eq!(&set, &before);
                    }
                }
                Op::Remove(token) => {
                    let removed = set.remove(token);
                    prop_assert_eq!(removed, before.contains(token));
                    prop_assert!(!set.contains(token));
                }
            }

            prop_assert!(set.len() <= MAX_TOKENS);
            let slice = set.as_slice();
            for (i, a) in slice.iter().enumerate() {
                prop_assert!(!slice[i + 1..].contains(a));
            }
        }
    }

    #[test]
    fn oldest_is_first_added(first in token(), second in token()) {
        let mut set = TokenSet::new();
        set.add(first);
        set.add(second);
        prop_assert_eq!(set.oldest(), Some(first));
    }
}
