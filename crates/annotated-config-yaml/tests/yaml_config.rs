//! End-to-end tests binding derived configurations to YAML files.

use std::collections::BTreeMap;
use std::fs;

use annotated_config_core::{ConfigError, DefaultResource};
use annotated_config_derive::Configuration;
use annotated_config_yaml::YamlConfig;
use tempfile::TempDir;

#[derive(Debug, Configuration)]
struct TestConfig {
    #[config(property = "boolean", comment = "Comment")]
    boolean_value: bool,
    #[config(property = "double", comment = "Comment")]
    double_value: f64,
    #[config(property = "integer", comment = "Comment")]
    int_value: i32,
    #[config(property = "list", comment = "Comment")]
    list_test: Vec<String>,
    #[config(property = "long", comment = "Comment")]
    long_value: i64,
    #[config(section = "a", comment = "Section A")]
    a: SectionA,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            boolean_value: false,
            double_value: 1.11,
            int_value: 1,
            list_test: ["Hello", "John", "was", "here!"].map(String::from).to_vec(),
            long_value: 1,
            a: SectionA::default(),
        }
    }
}

#[derive(Debug, Default, Configuration)]
struct SectionA {
    #[config(property, comment = "This is a name.")]
    name: Option<String>,
    #[config(section = "b", comment = "Section B")]
    b: SectionB,
}

#[derive(Debug, Configuration)]
struct SectionB {
    #[config(property, comment = "This is a name.")]
    name: Option<String>,
    #[config(section = "c", comment = "Section C")]
    c: Named,
    #[config(section = "d", comment = "Section D")]
    d: Named,
}

impl Default for SectionB {
    fn default() -> Self {
        Self {
            name: Some("Tommy".into()),
            c: Named { name: None },
            d: Named {
                name: Some("Samuel".into()),
            },
        }
    }
}

#[derive(Debug, Configuration)]
struct Named {
    #[config(property, comment = "This is a name.")]
    name: Option<String>,
}

fn normalized(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[test]
fn save_writes_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.yml");
    let config = YamlConfig::<TestConfig>::create(&path).unwrap();

    let expected = normalized(include_str!("resources/save.yml"));
    assert_eq!(config.render().unwrap(), expected);
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn load_updates_fields_and_keeps_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("load.yml");
    let config = YamlConfig::<TestConfig>::builder(&path)
        .default_resource(DefaultResource::text(include_str!("resources/load.yml")))
        .build()
        .unwrap();

    assert_eq!(
        config.render().unwrap(),
        normalized(include_str!("resources/load.yml"))
    );
    assert_eq!(config.int_value, 414);
    assert_eq!(config.long_value, 1484);
    assert_eq!(config.double_value, -1.231);
    assert_eq!(config.list_test, ["Hello", "John", "was not", "here!"]);
    assert!(config.boolean_value);
    assert_eq!(config.a.name, None);
    assert!(config.last_load().is_clean());
}

#[test]
fn default_resource_from_file_is_copied_once() {
    let dir = TempDir::new().unwrap();
    let resource = dir.path().join("defaults.yml");
    fs::write(&resource, "integer: 99\n").unwrap();
    let path = dir.path().join("nested/dir/config.yml");

    let config = YamlConfig::<TestConfig>::builder(&path)
        .default_resource(DefaultResource::file(&resource))
        .build()
        .unwrap();
    assert_eq!(config.int_value, 99);

    fs::write(&resource, "integer: 5\n").unwrap();
    let again = YamlConfig::<TestConfig>::builder(&path)
        .default_resource(DefaultResource::file(&resource))
        .build()
        .unwrap();
    assert_eq!(again.int_value, 99);
}

#[test]
fn missing_default_resource_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = YamlConfig::<TestConfig>::builder(dir.path().join("config.yml"))
        .default_resource(DefaultResource::file(dir.path().join("absent.yml")))
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::DefaultResource(_)));
}

#[test]
fn null_is_rejected_for_required_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("null.yml");
    fs::write(&path, "integer: ~\nlong: 12\n").unwrap();

    let config = YamlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.int_value, 1);
    assert_eq!(config.long_value, 12);
    assert_eq!(config.last_load().rejected[0].path, "integer");
    assert!(fs::read_to_string(&path).unwrap().contains("integer: 1\n"));
}

#[test]
fn out_of_range_integers_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("range.yml");
    fs::write(&path, "integer: 4294967296\n").unwrap();

    let config = YamlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.int_value, 1);
    assert!(!config.last_load().is_clean());
}

#[test]
fn comments_and_unknown_keys_survive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.yml");
    fs::write(&path, "# my own words\ninteger: 7\n# keep me\nlegacy:\n  enabled: true\n").unwrap();

    let config = YamlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.int_value, 7);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# my own words\ninteger: 7\n# keep me\nlegacy:\n  enabled: true\n"));
    assert!(written.contains("# Comment\nboolean: false\n"));
}

#[test]
fn unicode_line_separators_survive_a_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("separators.yml");
    let mut config = YamlConfig::<TestConfig>::create(&path).unwrap();
    config.list_test = vec!["a\u{2028}b".into(), "c\u{2029}d\u{85}e".into()];
    config.a.name = Some("line\u{2028}sep".into());
    config.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(!written.contains('\u{2028}'));
    assert!(written.contains("  - \"a\\Lb\"\n"));

    let reloaded = YamlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(reloaded.list_test, ["a\u{2028}b", "c\u{2029}d\u{85}e"]);
    assert_eq!(reloaded.a.name.as_deref(), Some("line\u{2028}sep"));
}

#[test]
fn comments_inside_sequences_do_not_move_to_the_next_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sequence.yml");
    fs::write(&path, "list:\n  - a\n  # about b\n  - b\nlong: 5\n").unwrap();

    let config = YamlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.list_test, ["a", "b"]);
    assert_eq!(config.document().comments("long"), Some(&[][..]));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("list:\n  - a\n  - b\nlong: 5\n"));
    assert!(!written.contains("about b"));
}

#[test]
fn top_level_sequences_are_parse_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.yml");
    fs::write(&path, "- a\n- b\n").unwrap();

    let err = YamlConfig::<TestConfig>::create(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { format: "yaml", .. }));
}

#[derive(Debug, Default, Configuration)]
struct Tags {
    #[config(property, comment = "Labels by name.")]
    labels: BTreeMap<String, String>,
    #[config(property)]
    ratio: f32,
}

#[test]
fn maps_and_narrow_floats_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tags.yml");
    let mut config = YamlConfig::<Tags>::create(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "# Labels by name.\nlabels: {}\nratio: 0.0\n");

    config.labels.insert("env".into(), "prod".into());
    config.labels.insert("tier".into(), "true".into());
    config.ratio = 0.1;
    config.save().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# Labels by name.\nlabels:\n  env: prod\n  tier: \"true\"\nratio: 0.1\n"
    );
    let reloaded = YamlConfig::<Tags>::create(&path).unwrap();
    assert_eq!(reloaded.labels["tier"], "true");
    assert_eq!(reloaded.ratio, 0.1);
}
