use anyhow::Result;
use colored::*;
use std::io::{self, IsTerminal};
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. Logs go to stderr so reports on stdout stay
/// machine readable.
pub fn init_logging(verbosity: u8, quiet: bool, json_output: bool) -> Result<()> {
    let default_directive = if quiet {
        "error"
    } else {
        match verbosity {
            0 => "peft_compare=info,warn",
            1 => "peft_compare=debug,info",
            2 => "peft_compare=trace,debug",
            _ => "trace",
        }
    };

    let env_filter = if quiet {
        EnvFilter::new(default_directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
    };

    let is_terminal = io::stderr().is_terminal();

    if json_output {
        // JSON output for machine parsing
        let json_layer = fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(env_filter);

        tracing_subscriber::registry().with(json_layer).try_init()?;
    } else if is_terminal {
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .event_format(ColoredFormatter)
            .with_filter(env_filter);

        tracing_subscriber::registry().with(fmt_layer).try_init()?;
    } else {
        // Plain output for pipes and files
        let fmt_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .with_filter(env_filter);

        tracing_subscriber::registry().with(fmt_layer).try_init()?;
    }

    Ok(())
}

/// Custom formatter for colored terminal output
struct ColoredFormatter;

impl<S, N> fmt::FormatEvent<S, N> for ColoredFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &fmt::FmtContext<'_, S, N>,
        mut writer: fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let level = event.metadata().level();

        let now = chrono::Local::now();
        write!(writer, "{} ", now.format("%H:%M:%S").to_string().dimmed())?;

        let level_str = match *level {
            Level::ERROR => "ERROR".red().bold(),
            Level::WARN => "WARN".yellow().bold(),
            Level::INFO => "INFO".green().bold(),
            Level::DEBUG => "DEBUG".blue().bold(),
            Level::TRACE => "TRACE".purple().bold(),
        };
        write!(writer, "{} ", level_str)?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Log a success message with green checkmark
pub fn success(message: &str) {
    if io::stdout().is_terminal() {
        println!("{} {}", "✓".green().bold(), message);
    } else {
        println!("SUCCESS: {}", message);
    }
}

/// Log a warning message with yellow warning icon
pub fn warning(message: &str) {
    if io::stderr().is_terminal() {
        eprintln!("{} {}", "⚠".yellow().bold(), message);
    } else {
        eprintln!("WARNING: {}", message);
    }
}

/// Section heading for text reports
pub fn heading(message: &str) -> String {
    if io::stdout().is_terminal() {
        message.bold().to_string()
    } else {
        message.to_string()
    }
}
