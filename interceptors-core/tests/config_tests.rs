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

//! Integration tests for loading binding configuration from disk

use interceptors_core::{
    ConfigError, InterceptionConfig, InterceptionModelBuilder, InterceptionType, InterceptorError,
    MethodSelector, ValueType,
};
use std::io::Write;
use tempfile::NamedTempFile;

const TEAM_TOML: &str = r#"
entity = "FootballTeam"

[[bindings]]
interceptors = ["Audit"]

[[bindings]]
type = "around_invoke"
method = { name = "getName" }
interceptors = ["Timing"]

[[bindings]]
type = "around_invoke"
method = { name = "setName", parameter_types = ["string"] }
interceptors = ["Validation"]

[[ignore_global]]
name = "setName"
parameter_types = ["string"]
"#;

fn write_config(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn known(name: &str) -> Option<String> {
    ["Audit", "Timing", "Validation", "Init"]
        .contains(&name)
        .then(|| name.to_string())
}

#[test]
fn test_load_toml_and_apply() {
    let file = write_config(".toml", TEAM_TOML);
    let config = InterceptionConfig::load(file.path()).unwrap();
    assert_eq!(config.entity.as_deref(), Some("FootballTeam"));

    let mut builder = InterceptionModelBuilder::new_for("FootballTeam");
    config.apply(&mut builder, known).unwrap();
    let model = builder.build();

    let get_name = MethodSelector::no_args("getName");
    let set_name = MethodSelector::new("setName", &[ValueType::String]);
    assert_eq!(
        model
            .resolve(InterceptionType::AroundInvoke, Some(&get_name))
            .unwrap(),
        vec!["Audit", "Timing"]
    );
    assert_eq!(
        model
            .resolve(InterceptionType::AroundInvoke, Some(&set_name))
            .unwrap(),
        vec!["Validation"]
    );
    assert_eq!(
        model.resolve(InterceptionType::PreDestroy, None).unwrap(),
        vec!["Audit"]
    );
    let all: Vec<_> = model.all_interceptors().iter().cloned().collect();
    assert_eq!(all, vec!["Audit", "Timing", "Validation"]);
}

#[test]
fn test_load_json() {
    let file = write_config(
        ".json",
        r#"{"bindings": [{"type": "post_construct", "interceptors": ["Init"]}]}"#,
    );
    let config = InterceptionConfig::load(file.path()).unwrap();

    let mut builder = InterceptionModelBuilder::new_for(());
    config.apply(&mut builder, known).unwrap();
    assert_eq!(
        builder
            .model()
            .resolve(InterceptionType::PostConstruct, None)
            .unwrap(),
        vec!["Init"]
    );
}

#[test]
fn test_load_unsupported_extension() {
    let file = write_config(".yaml", "bindings: []");
    assert!(matches!(
        InterceptionConfig::load(file.path()),
        Err(ConfigError::UnsupportedFormat(ext)) if ext == "yaml"
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        InterceptionConfig::load(&missing),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_invalid_binding_blocks_apply() {
    let file = write_config(
        ".toml",
        r#"
[[bindings]]
type = "pre_destroy"
method = { name = "close" }
interceptors = ["Audit"]
"#,
    );
    let config = InterceptionConfig::load(file.path()).unwrap();

    let mut builder = InterceptionModelBuilder::new_for(());
    let err = config.apply(&mut builder, known).unwrap_err();
    assert!(matches!(
        err,
        InterceptorError::Config(ConfigError::InvalidBinding { index: 0, .. })
    ));
    assert!(builder.model().all_interceptors().is_empty());
}

#[test]
fn test_duplicate_across_bindings_is_reported() {
    let config = InterceptionConfig::from_toml(
        r#"
[[bindings]]
type = "around_invoke"
interceptors = ["Audit"]

[[bindings]]
type = "around_invoke"
method = { name = "getName" }
interceptors = ["Audit"]
"#,
    )
    .unwrap();

    let mut builder = InterceptionModelBuilder::new_for(());
    assert!(matches!(
        config.apply(&mut builder, known),
        Err(InterceptorError::DuplicateInterceptor { .. })
    ));
}
