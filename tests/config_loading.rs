// tests/config_loading.rs
use genai_digest::config::ENV_ENGINE_CONFIG_PATH;
use genai_digest::ingest::config::load_sources_default;
use genai_digest::taxonomy::ENV_TAXONOMY_PATH;
use genai_digest::{EngineConfig, SourcePriority, Taxonomy};
use std::{env, fs};

#[test]
fn engine_config_from_toml_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("engine.toml");
    fs::write(&p_toml, "top_n = 5\nimportant_limit = 0\n").unwrap();
    let c = EngineConfig::load_from(&p_toml).unwrap();
    assert_eq!(c.top_n, 5);
    assert_eq!(c.top_overall, 10);
    assert_eq!(c.important_limit, 15);

    let p_json = dir.path().join("engine.json");
    fs::write(&p_json, r#"{"top_overall": 3}"#).unwrap();
    let c = EngineConfig::load_from(&p_json).unwrap();
    assert_eq!(c.top_overall, 3);
    assert_eq!(c.top_n, 10);
}

#[test]
fn invalid_taxonomy_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("taxonomy.json");
    fs::write(
        &p,
        r#"{"default_category": "general",
            "categories": [{"id": "llm", "display_name": "LLM", "keywords": ["gpt"]}]}"#,
    )
    .unwrap();
    let err = Taxonomy::load_from(&p).unwrap_err();
    assert!(format!("{err:#}").contains("general"));
}

#[serial_test::serial]
#[test]
fn defaults_use_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is never read.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_TAXONOMY_PATH);
    env::remove_var(ENV_ENGINE_CONFIG_PATH);
    env::remove_var("DIGEST_SOURCES_PATH");

    // 1) Nothing on disk → built-ins
    assert_eq!(Taxonomy::load_default().unwrap(), Taxonomy::default_seed());
    assert_eq!(EngineConfig::load_default().unwrap(), EngineConfig::default());
    assert!(load_sources_default().unwrap().sources.is_empty());

    // 2) ./config fallbacks
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("engine.toml"), "top_n = 2\n").unwrap();
    fs::write(
        cfg_dir.join("taxonomy.toml"),
        r#"
default_category = "misc"

[[categories]]
id = "misc"
display_name = "Misc"
keywords = ["ai"]
"#,
    )
    .unwrap();
    fs::write(
        cfg_dir.join("sources.json"),
        r#"{"sources": [{"name": "Lab", "priority": "high"}]}"#,
    )
    .unwrap();
    assert_eq!(EngineConfig::load_default().unwrap().top_n, 2);
    assert_eq!(Taxonomy::load_default().unwrap().default_category, "misc");
    let sources = load_sources_default().unwrap();
    assert_eq!(sources.sources.len(), 1);
    assert_eq!(sources.sources[0].priority, SourcePriority::High);

    // 3) env wins over ./config
    let p_env = tmp.path().join("engine.json");
    fs::write(&p_env, r#"{"top_n": 7}"#).unwrap();
    env::set_var(ENV_ENGINE_CONFIG_PATH, &p_env);
    assert_eq!(EngineConfig::load_default().unwrap().top_n, 7);

    // 4) env pointing nowhere is an error, not a silent default
    env::set_var(ENV_TAXONOMY_PATH, tmp.path().join("missing.toml"));
    assert!(Taxonomy::load_default().is_err());

    env::remove_var(ENV_TAXONOMY_PATH);
    env::remove_var(ENV_ENGINE_CONFIG_PATH);
    env::set_current_dir(old).unwrap();
}
