use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::MenuRecord;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Menu table used throughout the tests.
///
/// ```text
/// 1 Overview          2 Config
/// ├── 3 Asset         └── 5 MenuConfig
/// │   ├── 6 Device
/// │   └── 7 Cabinet
/// └── 4 PE
/// ```
pub fn menu_fixture() -> Vec<MenuRecord> {
    vec![
        MenuRecord::new(1, 0, "Overview").with_route("/systemOverview").with_icon("icon-system"),
        MenuRecord::new(2, 0, "Config").with_route("/systemConfig").with_icon("icon-config"),
        MenuRecord::new(3, 1, "Asset").with_route("/asset").with_icon("icon-asset"),
        MenuRecord::new(4, 1, "PE").with_route("/pe").with_icon("icon-pe"),
        MenuRecord::new(5, 2, "MenuConfig").with_route("/menuConfig").with_icon("icon-menu-config"),
        MenuRecord::new(6, 3, "Device").with_route("/device").with_icon("icon-device"),
        MenuRecord::new(7, 3, "Cabinet").with_route("/device").with_icon("icon-device"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
        init_test_setup();
    }
}
