use std::sync::OnceLock;

use pulse_common::observability::{LogConfig, LogFormat};

static INIT: OnceLock<()> = OnceLock::new();

pub fn init_test_tracing() {
    INIT.get_or_init(|| {
        let config = LogConfig {
            app_name: "pulse-tests",
            log_dir: Some(std::env::temp_dir().join("pulse-tests")),
            emit_stderr: true,
            format: if std::env::var("PULSE_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug".to_string(),
        };

        let _ = pulse_common::observability::init_logging(config);
    });
}
