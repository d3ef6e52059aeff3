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

//! Integration tests for descriptor building over class hierarchies

use interceptors_core::{
    ClassMetadata, InterceptionType, InterceptorDescriptor, InterceptorDescriptorBuilder,
    InterceptorError, MethodMetadata, MethodMetadataBuilder, Value, ValueType,
};
use std::sync::Arc;

struct Callbacks;

fn around(name: &str) -> MethodMetadataBuilder {
    MethodMetadata::around_invoke::<Callbacks, _>(name, |_, ctx| ctx.proceed())
}

fn post_construct(name: &str) -> MethodMetadataBuilder {
    MethodMetadata::lifecycle::<Callbacks, _>(InterceptionType::PostConstruct, name, |_, _| Ok(()))
}

fn callbacks(descriptor: &InterceptorDescriptor, t: InterceptionType) -> Vec<String> {
    descriptor
        .methods(t)
        .iter()
        .map(|m| format!("{}.{}", m.declaring_type(), m.name()))
        .collect()
}

fn three_levels(
    base: Vec<MethodMetadataBuilder>,
    mid: Vec<MethodMetadataBuilder>,
    leaf: Vec<MethodMetadataBuilder>,
) -> Arc<ClassMetadata> {
    let base = base
        .into_iter()
        .fold(ClassMetadata::builder("Base").extends(ClassMetadata::root()), |b, m| b.method(m))
        .build();
    let mid = mid
        .into_iter()
        .fold(ClassMetadata::builder("Mid").extends(base), |b, m| b.method(m))
        .build();
    leaf.into_iter()
        .fold(ClassMetadata::builder("Leaf").extends(mid), |b, m| b.method(m))
        .build()
}

#[test]
fn test_three_level_ordering() {
    let leaf = three_levels(
        vec![around("baseAround"), post_construct("baseInit")],
        vec![around("midAround")],
        vec![around("leafAround"), post_construct("leafInit")],
    );

    let descriptor = InterceptorDescriptorBuilder::build(&leaf, false).unwrap();
    assert_eq!(
        callbacks(&descriptor, InterceptionType::AroundInvoke),
        vec!["Base.baseAround", "Mid.midAround", "Leaf.leafAround"]
    );
    assert_eq!(
        callbacks(&descriptor, InterceptionType::PostConstruct),
        vec!["Base.baseInit", "Leaf.leafInit"]
    );
    assert!(!descriptor.has_callbacks(InterceptionType::PreDestroy));
    assert_eq!(
        descriptor.interception_types().collect::<Vec<_>>(),
        vec![InterceptionType::AroundInvoke, InterceptionType::PostConstruct]
    );
}

#[test]
fn test_override_collapses_to_most_derived() {
    let leaf = three_levels(
        vec![around("audit")],
        vec![post_construct("init")],
        vec![around("audit")],
    );

    let descriptor = InterceptorDescriptorBuilder::build(&leaf, false).unwrap();
    assert_eq!(
        callbacks(&descriptor, InterceptionType::AroundInvoke),
        vec!["Leaf.audit"]
    );
}

#[test]
fn test_unmarked_override_hides_base_callback() {
    let plain_audit = MethodMetadata::builder("audit")
        .parameters(&[ValueType::Context])
        .returns(ValueType::Any)
        .handler(|_, _| Ok(Value::Null));
    let leaf = three_levels(vec![around("audit")], vec![], vec![plain_audit]);

    let descriptor = InterceptorDescriptorBuilder::build(&leaf, false).unwrap();
    assert!(descriptor.is_empty());
}

#[test]
fn test_private_callbacks_are_not_overridden() {
    let leaf = three_levels(
        vec![post_construct("init").private()],
        vec![],
        vec![post_construct("init").private()],
    );

    let descriptor = InterceptorDescriptorBuilder::build(&leaf, false).unwrap();
    assert_eq!(
        callbacks(&descriptor, InterceptionType::PostConstruct),
        vec!["Base.init", "Leaf.init"]
    );
}

#[test]
fn test_duplicate_type_on_one_level_fails() {
    let leaf = three_levels(
        vec![],
        vec![post_construct("first"), post_construct("second")],
        vec![],
    );

    match InterceptorDescriptorBuilder::build(&leaf, false) {
        Err(InterceptorError::DuplicateInterceptionType {
            class,
            interception_type,
        }) => {
            assert_eq!(class.as_str(), "Mid");
            assert_eq!(interception_type, InterceptionType::PostConstruct);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_same_type_on_different_levels_is_fine() {
    let leaf = three_levels(
        vec![post_construct("a")],
        vec![post_construct("b")],
        vec![post_construct("c")],
    );
    let descriptor = InterceptorDescriptorBuilder::build(&leaf, false).unwrap();
    assert_eq!(descriptor.methods(InterceptionType::PostConstruct).len(), 3);
}

#[test]
fn test_target_descriptor_shapes() {
    let target = ClassMetadata::builder("Order")
        .method(MethodMetadata::target_lifecycle::<Callbacks, _>(
            InterceptionType::PostConstruct,
            "init",
            |_| Ok(()),
        ))
        .method(post_construct("contextInit"))
        .method(around("selfAround"))
        .build();

    // A context-taking lifecycle callback only fits interceptor classes.
    let as_target = InterceptorDescriptorBuilder::build(&target, true).unwrap();
    assert!(as_target.is_target_descriptor());
    assert_eq!(
        callbacks(&as_target, InterceptionType::PostConstruct),
        vec!["Order.init"]
    );
    assert_eq!(
        callbacks(&as_target, InterceptionType::AroundInvoke),
        vec!["Order.selfAround"]
    );

    let as_interceptor = InterceptorDescriptorBuilder::build(&target, false).unwrap();
    assert_eq!(
        callbacks(&as_interceptor, InterceptionType::PostConstruct),
        vec!["Order.contextInit"]
    );
}

#[test]
fn test_one_method_may_serve_several_types() {
    let both = MethodMetadata::lifecycle::<Callbacks, _>(InterceptionType::PostConstruct, "hook", |_, _| Ok(()))
        .marker(InterceptionType::PreDestroy);
    let class = ClassMetadata::builder("Hooks").method(both).build();

    let descriptor = InterceptorDescriptorBuilder::build(&class, false).unwrap();
    assert_eq!(callbacks(&descriptor, InterceptionType::PostConstruct), vec!["Hooks.hook"]);
    assert_eq!(callbacks(&descriptor, InterceptionType::PreDestroy), vec!["Hooks.hook"]);
}
