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

//! Registry of interception models per intercepted class.

use dashmap::DashMap;
use interceptors_core::{
    ClassMetadata, InterceptionConfig, InterceptionModel, InterceptionModelBuilder, Result,
    TypeName,
};
use std::sync::Arc;
use tracing::debug;

/// Interception model of a class, with interceptor classes as identities.
pub type ClassInterceptionModel = InterceptionModel<Arc<ClassMetadata>, Arc<ClassMetadata>>;

/// Builder for a [`ClassInterceptionModel`].
pub type ClassInterceptionModelBuilder =
    InterceptionModelBuilder<Arc<ClassMetadata>, Arc<ClassMetadata>>;

/// Models keyed by the name of the intercepted class.
#[derive(Default)]
pub struct InterceptorRegistry {
    models: DashMap<TypeName, Arc<ClassInterceptionModel>>,
}

impl InterceptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished model, returning the one it replaces.
    pub fn register(&self, model: ClassInterceptionModel) -> Option<Arc<ClassInterceptionModel>> {
        let name = model.intercepted_entity().name().clone();
        debug!(
            class = %name,
            interceptors = model.all_interceptors().len(),
            "Registered interception model"
        );
        self.models.insert(name, Arc::new(model))
    }

    /// Build and register a model from declarative bindings. Interceptor
    /// names are looked up among `interceptors` by class name.
    pub fn register_config(
        &self,
        class: &Arc<ClassMetadata>,
        config: &InterceptionConfig,
        interceptors: &[Arc<ClassMetadata>],
    ) -> Result<()> {
        let mut builder = ClassInterceptionModelBuilder::new_for(Arc::clone(class));
        config.apply(&mut builder, |name| {
            interceptors
                .iter()
                .find(|candidate| candidate.name().as_str() == name)
                .cloned()
        })?;
        self.register(builder.build());
        Ok(())
    }

    pub fn get(&self, class: &TypeName) -> Option<Arc<ClassInterceptionModel>> {
        self.models.get(class).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, class: &TypeName) -> Option<Arc<ClassInterceptionModel>> {
        self.models.remove(class).map(|(_, model)| model)
    }

    pub fn contains(&self, class: &TypeName) -> bool {
        self.models.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interceptors_core::{InterceptionType, InterceptorError, MethodSelector};

    fn classes() -> (Arc<ClassMetadata>, Arc<ClassMetadata>) {
        (
            ClassMetadata::builder("FootballTeam").build(),
            ClassMetadata::builder("Audit").build(),
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let (team, audit) = classes();
        let registry = InterceptorRegistry::new();

        let mut builder = ClassInterceptionModelBuilder::new_for(Arc::clone(&team));
        builder.intercept_post_construct().with([Arc::clone(&audit)]).unwrap();
        assert!(registry.register(builder.build()).is_none());

        let model = registry.get(team.name()).unwrap();
        assert_eq!(
            model.resolve(InterceptionType::PostConstruct, None).unwrap(),
            vec![audit]
        );
        assert!(registry.contains(team.name()));
        assert!(registry.remove(team.name()).is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_config() {
        let (team, audit) = classes();
        let config = InterceptionConfig::from_toml(
            r#"
            [[bindings]]
            type = "around_invoke"
            method = { name = "getName" }
            interceptors = ["Audit"]
            "#,
        )
        .unwrap();

        let registry = InterceptorRegistry::new();
        registry
            .register_config(&team, &config, &[Arc::clone(&audit)])
            .unwrap();
        let model = registry.get(team.name()).unwrap();
        assert_eq!(
            model
                .resolve(
                    InterceptionType::AroundInvoke,
                    Some(&MethodSelector::no_args("getName"))
                )
                .unwrap(),
            vec![audit]
        );
    }

    #[test]
    fn test_register_config_unknown_interceptor() {
        let (team, _) = classes();
        let config = InterceptionConfig::from_json(
            r#"{"bindings": [{"type": "pre_destroy", "interceptors": ["Ghost"]}]}"#,
        )
        .unwrap();

        let registry = InterceptorRegistry::new();
        let err = registry.register_config(&team, &config, &[]).unwrap_err();
        assert!(matches!(err, InterceptorError::UnknownInterceptor(_)));
        assert!(registry.is_empty());
    }
}
