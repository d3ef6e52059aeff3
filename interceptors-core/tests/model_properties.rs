// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Property tests for interception model invariants

use interceptors_core::{InterceptionModel, InterceptionType, InterceptorError, MethodSelector};
use proptest::prelude::*;
use std::collections::HashSet;

const OPERATIONS: [&str; 3] = ["getName", "setName", "getPlayers"];

fn arb_type() -> impl Strategy<Value = InterceptionType> {
    prop::sample::select(InterceptionType::ALL.to_vec())
}

fn arb_selector() -> impl Strategy<Value = MethodSelector> {
    prop::sample::select(OPERATIONS.to_vec()).prop_map(MethodSelector::no_args)
}

#[derive(Debug, Clone)]
struct Append {
    interception_type: InterceptionType,
    selector: Option<MethodSelector>,
    ids: Vec<u8>,
}

fn arb_append() -> impl Strategy<Value = Append> {
    (
        arb_type(),
        prop::option::of(arb_selector()),
        prop::collection::vec(0u8..6, 1..4),
    )
        .prop_map(|(interception_type, selector, ids)| Append {
            interception_type,
            selector,
            ids,
        })
}

/// Apply every append, returning the batches that were accepted.
fn build(appends: &[Append]) -> (InterceptionModel<(), u8>, Vec<Append>) {
    let mut model = InterceptionModel::new(());
    let mut accepted = Vec::new();
    for append in appends {
        let result = model.append(
            append.interception_type,
            append.selector.clone(),
            append.ids.iter().copied(),
        );
        if result.is_ok() {
            accepted.push(append.clone());
        }
    }
    (model, accepted)
}

fn selector_for(t: InterceptionType, sel: &MethodSelector) -> Option<&MethodSelector> {
    (!t.is_lifecycle()).then_some(sel)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_selector_rules(appends in prop::collection::vec(arb_append(), 0..8), t in arb_type(), sel in arb_selector()) {
        let (model, _) = build(&appends);
        let wrong = if t.is_lifecycle() {
            model.resolve(t, Some(&sel))
        } else {
            model.resolve(t, None)
        };
        let is_invalid_selector = matches!(wrong, Err(InterceptorError::InvalidSelector { .. }));
        prop_assert!(is_invalid_selector);
    }

    #[test]
    fn prop_resolve_is_idempotent(appends in prop::collection::vec(arb_append(), 0..8), t in arb_type(), sel in arb_selector()) {
        let (model, _) = build(&appends);
        let first = model.resolve(t, selector_for(t, &sel)).unwrap();
        let second = model.resolve(t, selector_for(t, &sel)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_resolved_lists_have_no_duplicates(appends in prop::collection::vec(arb_append(), 0..12), t in arb_type(), sel in arb_selector()) {
        let (model, _) = build(&appends);
        let resolved = model.resolve(t, selector_for(t, &sel)).unwrap();
        let unique: HashSet<_> = resolved.iter().collect();
        prop_assert_eq!(unique.len(), resolved.len());
    }

    #[test]
    fn prop_all_interceptors_is_first_seen_union(appends in prop::collection::vec(arb_append(), 0..12)) {
        let (model, accepted) = build(&appends);
        let mut expected: Vec<u8> = Vec::new();
        for append in &accepted {
            for id in &append.ids {
                if !expected.contains(id) {
                    expected.push(*id);
                }
            }
        }
        let actual: Vec<u8> = model.all_interceptors().iter().copied().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_operation_bindings_follow_global(
        global in prop::collection::hash_set(0u8..4, 0..4),
        bound in prop::collection::hash_set(4u8..8, 1..4),
        sel in arb_selector(),
    ) {
        let global: Vec<u8> = global.into_iter().collect();
        let bound: Vec<u8> = bound.into_iter().collect();
        let mut model = InterceptionModel::new(());
        model.append(InterceptionType::AroundInvoke, None, global.iter().copied()).unwrap();
        model.append(InterceptionType::AroundInvoke, Some(sel.clone()), bound.iter().copied()).unwrap();

        let resolved = model.resolve(InterceptionType::AroundInvoke, Some(&sel)).unwrap();
        let expected: Vec<u8> = global.iter().chain(bound.iter()).copied().collect();
        prop_assert_eq!(resolved, expected);

        model.set_ignores_global(sel.clone(), true);
        let resolved = model.resolve(InterceptionType::AroundInvoke, Some(&sel)).unwrap();
        prop_assert_eq!(resolved, bound);
    }

    #[test]
    fn prop_cross_scope_duplicate_rejected_in_either_order(
        t in prop::sample::select(vec![InterceptionType::AroundInvoke, InterceptionType::AroundTimeout]),
        sel in arb_selector(),
        id in 0u8..8,
        operation_first in any::<bool>(),
    ) {
        let mut model = InterceptionModel::new(());
        let (first, second) = if operation_first {
            (Some(sel.clone()), None)
        } else {
            (None, Some(sel.clone()))
        };
        model.append(t, first, [id]).unwrap();
        let rejected = model.append(t, second, [id]);
        let is_duplicate = matches!(rejected, Err(InterceptorError::DuplicateInterceptor { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(model.resolve(t, Some(&sel)).unwrap(), vec![id]);
    }

    #[test]
    fn prop_repeated_append_is_rejected(t in arb_type(), id in 0u8..8) {
        let mut model = InterceptionModel::new(());
        model.append(t, None, [id]).unwrap();
        let second = model.append(t, None, [id]);
        let is_duplicate = matches!(second, Err(InterceptorError::DuplicateInterceptor { .. }));
        prop_assert!(is_duplicate);
        prop_assert_eq!(model.resolve(t, selector_for(t, &MethodSelector::no_args("getName"))).unwrap(), vec![id]);
    }
}
