//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! The effective level comes from, in order: the `RUST_LOG` environment
//! variable when set, then the CLI flags (`-q` caps output at errors,
//! `-v` enables debug, `-vv` trace), then the info default. Debug builds
//! print timestamps and, at `-v` and above, the module path; release
//! builds keep to level and message.

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize logging from the CLI verbosity flags.
///
/// `env_logger` only accepts one initialization per process; later calls
/// (tests drive `run_app` repeatedly) are no-ops.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    if env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }

    apply_format(&mut builder, verbose);
    let _ = builder.try_init();

    log::debug!("Logging ready (max level {})", log::max_level());
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

fn apply_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_seconds(),
                record.level(),
                record.module_path().unwrap_or("?"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        }
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        });
    }
}
