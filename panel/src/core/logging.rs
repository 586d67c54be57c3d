use std::io::{self, Write};

use env_logger::{Builder, Env};
use log::{Level, LevelFilter, Record};
use termcolor::{
    Buffer, BufferWriter, Color, ColorChoice, ColorSpec, WriteColor,
};

pub use log::{debug, error, info, trace, warn};

/// Filter used when `PANEL_LOG` is unset
const DEFAULT_FILTER: &str = "eniac_panel=info,panel_viewer=info";

/// HTTP plumbing that logs every connection at debug
const QUIET_MODULES: &[&str] = &["reqwest", "hyper", "hyper_util"];

/// Installs a stderr logger filtered by `PANEL_LOG`. Safe to call more than
/// once.
pub fn init_logger() {
    let mut builder =
        Builder::from_env(Env::new().filter_or("PANEL_LOG", DEFAULT_FILTER));
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }

    builder.format(|_buf, record| {
        let writer = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = writer.buffer();
        write_record(&mut buffer, record)?;
        writer.print(&buffer)
    });

    let _ = builder.try_init();
}

fn write_record(buffer: &mut Buffer, record: &Record) -> io::Result<()> {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(level_color(record.level())));
    buffer.set_color(&spec)?;
    write!(buffer, "[{:<5}]", record.level())?;
    buffer.reset()?;
    writeln!(buffer, " {}: {}", short_target(record), record.args())
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Trace => Color::Cyan,
        Level::Debug => Color::Blue,
        Level::Info => Color::Green,
        Level::Warn => Color::Yellow,
        Level::Error => Color::Red,
    }
}

/// Module path without the crate prefix: `bridge::stream` rather than
/// `eniac_panel::bridge::stream`
fn short_target<'a>(record: &Record<'a>) -> &'a str {
    let path = record.module_path().unwrap_or(record.target());
    match path.split_once("::") {
        Some((_, rest)) => rest,
        None => path,
    }
}

/// Logs a warning the first time a given message is produced and stays quiet
/// afterwards. Intended for per-frame or per-widget code paths.
macro_rules! warn_once {
    ($($arg:tt)+) => {{
        use std::collections::HashSet;
        use std::sync::LazyLock;

        static SEEN: LazyLock<parking_lot::Mutex<HashSet<String>>> =
            LazyLock::new(|| parking_lot::Mutex::new(HashSet::new()));

        let message = format!($($arg)+);
        if SEEN.lock().insert(message.clone()) {
            log::warn!("{}", message);
        }
    }};
}

pub(crate) use warn_once;

#[cfg(test)]
mod tests {
    use super::*;

    fn target_of(module_path: &'static str) -> String {
        let record = Record::builder()
            .args(format_args!(""))
            .module_path_static(Some(module_path))
            .build();
        short_target(&record).to_string()
    }

    #[test]
    fn test_short_target_drops_crate_name() {
        assert_eq!(target_of("eniac_panel::bridge::stream"), "bridge::stream");
        assert_eq!(target_of("panel_viewer"), "panel_viewer");
    }

    #[test]
    fn test_records_are_written_with_level_and_target() {
        let record = Record::builder()
            .args(format_args!("connected"))
            .level(Level::Info)
            .module_path_static(Some("eniac_panel::bridge::stream"))
            .build();
        let mut buffer = Buffer::no_color();
        write_record(&mut buffer, &record).unwrap();

        let line = String::from_utf8(buffer.into_inner()).unwrap();
        assert_eq!(line, "[INFO ] bridge::stream: connected\n");
    }
}
