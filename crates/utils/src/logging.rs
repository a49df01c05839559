use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

const WORKSPACE_CRATES: &[&str] = &["server", "services", "db", "utils", "tower_http"];

/// Target sqlx emits executed statements under, at `DEBUG`.
const SQL_ECHO_DIRECTIVE: &str = "sqlx::query=debug";

/// Builds the filter directive used by [`init_tracing`]: third-party crates
/// at `warn`, workspace crates at `log_level`. `sql_echo` lets executed SQL
/// statements through.
pub fn filter_directive(log_level: &str, sql_echo: bool) -> String {
    let mut directive = String::from("warn");
    for krate in WORKSPACE_CRATES {
        directive.push_str(&format!(",{krate}={log_level}"));
    }
    if sql_echo {
        directive.push(',');
        directive.push_str(SQL_ECHO_DIRECTIVE);
    }
    directive
}

/// Resolves a `RUST_LOG` value against the workspace defaults. A plain level
/// (`debug`) applies to the workspace crates; full directives
/// (`server=trace,sqlx=info`) are appended to the `info` defaults; anything
/// unparsable is ignored.
pub fn resolve_directive(rust_log: Option<&str>, sql_echo: bool) -> String {
    let defaults = filter_directive("info", sql_echo);
    match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        None => defaults,
        Some(value) if value.parse::<LevelFilter>().is_ok() => filter_directive(value, sql_echo),
        Some(value) => {
            let combined = format!("{defaults},{value}");
            if EnvFilter::try_new(&combined).is_ok() {
                combined
            } else {
                defaults
            }
        }
    }
}

/// Installs the global tracing subscriber from `RUST_LOG` (default `info`).
/// `sql_echo` turns on SQL statement logging.
pub fn init_tracing(sql_echo: bool) -> Result<(), tracing_subscriber::filter::ParseError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = resolve_directive(rust_log.as_deref(), sql_echo);
    let env_filter = EnvFilter::try_new(&directive)?;

    // A subscriber may already be installed (tests, embedding); keep the first one.
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .try_init();
    tracing::debug!(filter = %directive, "tracing initialised");
    Ok(())
}
