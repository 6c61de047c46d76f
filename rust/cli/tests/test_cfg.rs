use derby_cli::run;
use serde_json::Value;
use serial_test::serial;

const VARS: &[&str] = &[
    "DERBY_CONFIG",
    "DERBY_SEED",
    "DERBY_GAMES",
    "DERBY_STRATEGY_A",
    "DERBY_STRATEGY_B",
    "DERBY_HINT_A",
    "DERBY_HINT_B",
    "DERBY_LLM_ENDPOINT",
    "DERBY_LLM_MODEL",
    "DERBY_LLM_TIMEOUT_SECS",
];

fn clear_env() {
    for v in VARS {
        unsafe {
            std::env::remove_var(v);
        }
    }
}

fn set_env(key: &str, value: &str) {
    unsafe {
        std::env::set_var(key, value);
    }
}

fn cfg_json() -> (i32, Value, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["derby", "cfg"], &mut out, &mut err);
    let stderr = String::from_utf8_lossy(&err).into_owned();
    let json = serde_json::from_slice(&out).unwrap_or(Value::Null);
    (code, json, stderr)
}

#[test]
#[serial]
fn cfg_shows_defaults() {
    clear_env();
    let (code, json, _) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["games"]["value"], 1);
    assert_eq!(json["games"]["source"], "default");
    assert_eq!(json["seed"]["value"], Value::Null);
    assert_eq!(json["strategy_a"]["value"], "random");
    assert_eq!(json["llm_timeout_secs"]["value"], 60);
    assert_eq!(json["llm_model"]["source"], "default");
}

#[test]
#[serial]
fn env_overrides_are_reported() {
    clear_env();
    set_env("DERBY_SEED", "99");
    set_env("DERBY_STRATEGY_B", "llm");
    set_env("DERBY_HINT_B", "Raise whenever you can connect three.");
    let (code, json, _) = cfg_json();
    clear_env();

    assert_eq!(code, 0);
    assert_eq!(json["seed"]["value"], 99);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["strategy_b"]["value"], "llm");
    assert_eq!(json["strategy_b"]["source"], "env");
    assert_eq!(json["hint_b"]["source"], "env");
    assert_eq!(json["strategy_a"]["source"], "default");
}

#[test]
#[serial]
fn file_then_env_precedence() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("derby.toml");
    std::fs::write(
        &path,
        "games = 5\nseed = 3\nllm_model = \"mistral\"\nhint_a = \"Fold when behind.\"\n",
    )
    .unwrap();
    set_env("DERBY_CONFIG", path.to_str().unwrap());
    set_env("DERBY_SEED", "4");
    let (code, json, stderr) = cfg_json();
    clear_env();

    assert_eq!(code, 0, "{}", stderr);
    assert_eq!(json["games"]["value"], 5);
    assert_eq!(json["games"]["source"], "file");
    assert_eq!(json["llm_model"]["value"], "mistral");
    assert_eq!(json["hint_a"]["value"], "Fold when behind.");
    assert_eq!(json["seed"]["value"], 4);
    assert_eq!(json["seed"]["source"], "env");
}

#[test]
#[serial]
fn invalid_values_fail_validation() {
    clear_env();
    set_env("DERBY_GAMES", "0");
    let (code, _, stderr) = cfg_json();
    assert_eq!(code, 2);
    assert!(stderr.contains("games must be >=1"));

    clear_env();
    set_env("DERBY_STRATEGY_A", "minimax");
    let (code, _, stderr) = cfg_json();
    assert_eq!(code, 2);
    assert!(stderr.contains("Unknown strategy: minimax"));

    clear_env();
    set_env("DERBY_LLM_TIMEOUT_SECS", "soon");
    let (code, _, stderr) = cfg_json();
    clear_env();
    assert_eq!(code, 2);
    assert!(stderr.contains("Invalid llm_timeout_secs"));
}

#[test]
#[serial]
fn env_config_drives_play() {
    clear_env();
    set_env("DERBY_GAMES", "2");
    set_env("DERBY_SEED", "11");
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["derby", "play", "--quiet"], &mut out, &mut err);
    clear_env();

    assert_eq!(code, 0);
    let stdout = String::from_utf8_lossy(&out);
    assert!(stdout.starts_with("Seed: 11 |"));
    assert!(stdout.contains("Session: games=2"));

    // flags win over env
    set_env("DERBY_GAMES", "5");
    let mut out: Vec<u8> = Vec::new();
    let code = run(
        ["derby", "play", "--quiet", "--games", "1", "--seed", "11"],
        &mut out,
        &mut err,
    );
    clear_env();
    assert_eq!(code, 0);
    assert!(String::from_utf8_lossy(&out).contains("Session: games=1"));
}

#[test]
#[serial]
fn empty_file_hint_is_ignored() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("derby.toml");
    std::fs::write(&path, "hint_a = \"\"\nhint_b = \"Call every raise.\"\n").unwrap();
    set_env("DERBY_CONFIG", path.to_str().unwrap());
    let (code, json, stderr) = cfg_json();
    clear_env();

    assert_eq!(code, 0, "{}", stderr);
    assert_eq!(json["hint_a"]["value"], Value::Null);
    assert_eq!(json["hint_a"]["source"], "default");
    assert_eq!(json["hint_b"]["value"], "Call every raise.");
    assert_eq!(json["hint_b"]["source"], "file");
}
