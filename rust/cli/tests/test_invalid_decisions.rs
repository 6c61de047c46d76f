use derby_cli::logging::TestLogSubscriber;
use derby_cli::run;
use serial_test::serial;
use tracing::Level;
use tracing_subscriber::Registry;
use tracing_subscriber::layer::SubscriberExt;

// Nothing listens on the discard port, so every generation fails fast.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/api/generate";

#[test]
#[serial]
fn unreachable_generator_degrades_rounds_and_logs_warnings() {
    unsafe {
        std::env::remove_var("DERBY_CONFIG");
        std::env::set_var("DERBY_LLM_ENDPOINT", DEAD_ENDPOINT);
        std::env::set_var("DERBY_LLM_TIMEOUT_SECS", "2");
    }

    let capture = TestLogSubscriber::new();
    let registry = Registry::default().with(capture.clone().into_layer::<Registry>());

    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = tracing::subscriber::with_default(registry, || {
        run(
            [
                "derby",
                "play",
                "--games",
                "1",
                "--seed",
                "5",
                "--strategy-a",
                "llm",
                "--quiet",
            ],
            &mut out,
            &mut err,
        )
    });
    unsafe {
        std::env::remove_var("DERBY_LLM_ENDPOINT");
        std::env::remove_var("DERBY_LLM_TIMEOUT_SECS");
    }

    assert_eq!(code, 0);
    let stdout = String::from_utf8_lossy(&out);
    let stderr = String::from_utf8_lossy(&err);

    // Player 0 cannot move on its own, so the CLI plays the first legal column
    assert!(stderr.contains("WARNING: Player 0 could not choose a move"));
    assert!(stdout.contains("Player 0 (llm) vs Player 1 (random)"));
    assert!(!stdout.contains("invalid_rounds=0"));

    let entries = capture.entries();
    let invalid: Vec<_> = entries
        .iter()
        .filter(|e| e.level == Level::WARN && e.message.contains("invalid decision"))
        .collect();
    assert!(!invalid.is_empty());
    assert!(invalid.iter().all(|e| e.field("player") == Some("0")));

    let resolved: Vec<_> = entries
        .iter()
        .filter(|e| e.level == Level::INFO && e.message == "wager round resolved")
        .collect();
    assert!(!resolved.is_empty());
    // a failing player can never be folded against, so no fold endings
    assert!(stdout.contains("fold_endings=0"));
}
