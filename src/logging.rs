use std::io::Write;

use log::LevelFilter;

/// Emits a record through an explicit `&dyn Log` instead of the global logger.
#[macro_export]
macro_rules! report {
    ($logger: expr, $level: expr, $($arg: tt)+) => {
        ::log::Log::log(
            $logger,
            &::log::Record::builder()
                .args(format_args!($($arg)+))
                .level($level)
                .target(module_path!())
                .module_path_static(Some(module_path!()))
                .file_static(Some(file!()))
                .line(Some(line!()))
                .build(),
        )
    };
}

/// `<timestamp> - <LEVEL> - <message>` on stderr, INFO unless `RUST_LOG` says otherwise.
pub fn build_logger() -> env_logger::Logger {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_millis(),
                record.level(),
                record.args()
            )
        })
        .build()
}
