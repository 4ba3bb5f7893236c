//! End-to-end tests binding derived configurations to TOML files.

use std::fs;

use annotated_config_core::{ConfigError, DefaultResource};
use annotated_config_derive::Configuration;
use annotated_config_toml::TomlConfig;
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
    let path = dir.path().join("save.toml");
    let config = TomlConfig::<TestConfig>::create(&path).unwrap();

    let expected = normalized(include_str!("resources/save.toml"));
    assert_eq!(config.render().unwrap(), expected);
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn load_updates_fields_and_keeps_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("load.toml");
    let config = TomlConfig::<TestConfig>::builder(&path)
        .default_resource(DefaultResource::text(include_str!("resources/load.toml")))
        .build()
        .unwrap();

    assert_eq!(
        config.render().unwrap(),
        normalized(include_str!("resources/load.toml"))
    );
    assert_eq!(config.int_value, 414);
    assert_eq!(config.long_value, 1484);
    assert_eq!(config.double_value, -1.231);
    assert_eq!(config.list_test, ["Hello", "John", "was not", "here!"]);
    assert!(config.boolean_value);
    assert_eq!(config.a.b.d.name.as_deref(), Some("Samuel"));
    assert!(config.last_load().is_clean());
}

#[test]
fn file_comments_win_over_declared_ones() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "# my own words\ninteger = 7\n\n# mine too\n[a]\n").unwrap();

    let config = TomlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.int_value, 7);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# my own words\ninteger = 7\n# Comment\nboolean = false\n"));
    assert!(written.contains("# mine too\n[a]\n"));
    assert!(!written.contains("# Section A"));
}

#[test]
fn trailing_comments_on_headers_keep_table_comments() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("header.toml");
    fs::write(
        &path,
        "# my section\n[a] # see [docs]\n# my name comment\nname = \"x\"\n",
    )
    .unwrap();

    let config = TomlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.a.name.as_deref(), Some("x"));
    assert_eq!(config.document().comments("a"), Some(&["my section".to_string()][..]));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\n# my section\n[a]\n# my name comment\nname = \"x\"\n"));
}

#[test]
fn incompatible_values_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wrong.toml");
    fs::write(&path, "integer = \"many\"\nboolean = 1\nlist = [1, 2]\n").unwrap();

    let config = TomlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.int_value, 1);
    assert!(!config.boolean_value);
    assert_eq!(config.last_load().rejected.len(), 3);

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("integer = 1\n"));
    assert!(written.contains("boolean = false\n"));
    assert!(written.contains("list = [\"Hello\""));
}

#[test]
fn integers_load_into_float_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("int.toml");
    fs::write(&path, "double = 5\n").unwrap();

    let config = TomlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(config.double_value, 5.0);
    assert!(fs::read_to_string(&path).unwrap().contains("double = 5.0\n"));
}

#[test]
fn unknown_keys_survive_saves() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("extra.toml");
    fs::write(&path, "# keep me\nlegacy = \"value\"\n\n[plugins]\nenabled = true\n").unwrap();

    TomlConfig::<TestConfig>::create(&path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# keep me\nlegacy = \"value\"\n"));
    assert!(written.contains("[plugins]\nenabled = true\n"));
}

#[test]
fn edits_are_written_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edit.toml");
    let mut config = TomlConfig::<TestConfig>::create(&path).unwrap();
    config.a.name = Some("Alice".into());
    config.list_test.clear();
    config.save().unwrap();

    let reloaded = TomlConfig::<TestConfig>::create(&path).unwrap();
    assert_eq!(reloaded.a.name.as_deref(), Some("Alice"));
    assert!(reloaded.list_test.is_empty());
    assert!(
        fs::read_to_string(&path)
            .unwrap()
            .contains("[a]\n# This is a name.\nname = \"Alice\"\n")
    );
}

#[test]
fn syntax_errors_are_reported_with_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[a\n").unwrap();

    let err = TomlConfig::<TestConfig>::create(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { format: "toml", .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[derive(Debug, Default, Configuration)]
struct Dotted {
    #[config(property = "server.port")]
    port: u16,
    #[config(property)]
    r#type: String,
}

#[test]
fn dotted_keys_nest_and_raw_idents_unwrap() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dotted.toml");
    fs::write(&path, "type = \"fast\"\n[server]\nport = 8080\n").unwrap();

    let config = TomlConfig::<Dotted>::create(&path).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.r#type, "fast");
}
