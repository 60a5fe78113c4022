use std::{
    collections::HashMap,
    fs::OpenOptions,
    path::PathBuf,
};
use nu_ansi_term::{Color, Style};
use serde::Deserialize;
use termcolor::ColorChoice;
use tracing::{field::Visit, Level};
use tracing_log::NormalizeEvent;
use tracing_subscriber::{
    filter::{FilterFn, LevelFilter},
    fmt::FormatEvent,
    prelude::*,
};


use crate::prelude::*;


#[derive(Debug, confique::Config)]
pub(crate) struct LogConfig {
    /// Specifies what log messages to emit, based on the module path and log level.
    ///
    /// This is a map where the key specifies a module path prefix, and the
    /// value specifies a minimum log level. For each log message, the map
    /// entry with the longest prefix matching the log's module path is chosen.
    /// If no such entry exists, the log is not emitted. Otherwise, that
    /// entry's level is used to check whether the log message should be
    /// emitted.
    ///
    /// Take the following example: the following config only allows ≥"info"
    /// logs generally, but also ≥"trace" messages from the `store` module,
    /// which logs every query sent to the database. Finally, it also enables
    /// ≥"debug" messages from the MongoDB driver.
    ///
    ///    [log]
    ///    filters.filmography = "info"
    ///    filters."filmography::store" = "trace"
    ///    filters.mongodb = "debug"
    #[config(default = { "filmography": "debug" })]
    pub(crate) filters: Filters,

    /// If this is set, log messages are also written to this file. The string
    /// `${cmd}` in this value is replaced by the subcommand name, e.g. `exec`
    /// or `check`. Example: "/var/log/filmography-${cmd}.log".
    pub(crate) file: Option<PathBuf>,

    /// If this is set to `false`, log messages are not written to stdout.
    #[config(default = true)]
    pub(crate) stdout: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "HashMap<String, String>")]
pub(crate) struct Filters(HashMap<String, LevelFilter>);

impl TryFrom<HashMap<String, String>> for Filters {
    type Error = String;
    fn try_from(value: HashMap<String, String>) -> Result<Self, Self::Error> {
        value.into_iter()
            .map(|(target_prefix, level)| {
                let level = parse_level_filter(&level)?;
                Ok((target_prefix, level))
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }
}

fn parse_level_filter(s: &str) -> Result<LevelFilter, String> {
    match s {
        "off" => Ok(LevelFilter::OFF),
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        other => Err(format!("invalid log level '{other}'")),
    }
}

impl Filters {
    /// The level of the entry with the longest prefix of `target`, if any.
    /// See the config doc comment.
    fn level_for(&self, target: &str) -> Option<LevelFilter> {
        // Only very few entries are expected, so no fancy prefix structure.
        self.0.iter()
            .filter(|(target_prefix, _)| target.starts_with(target_prefix.as_str()))
            .max_by_key(|(target_prefix, _)| target_prefix.len())
            .map(|(_, level_filter)| *level_filter)
    }
}

/// Installs our own logger globally. Must only be called once!
pub(crate) fn init(config: &LogConfig, color: ColorChoice, cmd: &str) -> Result<()> {
    let filter = {
        let filters = config.filters.clone();
        let max_level = filters.0.values().max().copied().unwrap_or(LevelFilter::OFF);
        let filter = FilterFn::new(move |metadata| {
            filters.level_for(metadata.target())
                .is_some_and(|level_filter| metadata.level() <= &level_filter)
        });
        filter.with_max_level_hint(max_level)
    };

    macro_rules! subscriber {
        ($writer:expr) => {
            tracing_subscriber::fmt::layer()
                .event_format(EventFormatter(color))
                .with_writer($writer)
        };
    }

    let stdout_output = if config.stdout {
        Some(subscriber!(std::io::stdout))
    } else {
        None
    };

    let file_output = config.file.as_ref()
        .map(|path| -> Result<std::fs::File> {
            use std::io::Write;

            let new_path = path.to_str()
                .ok_or_else(|| anyhow!("log file path is not valid UTF-8"))?
                .replace("${cmd}", cmd);

            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(new_path)
                .with_context(|| format!("failed to open/create log file '{}'", path.display()))?;

            // Add an empty line separator to see process restarts easier.
            file.write_all(b"\n").context("could not write to log file")?;

            Ok(file)
        })
        .transpose()?
        .map(|file| subscriber!(file).with_ansi(color == ColorChoice::Always));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_output)
        .with(stdout_output)
        .init();

    Ok(())
}

type TracingWriter<'a> = tracing_subscriber::fmt::format::Writer<'a>;

/// Prints events as `<time> <level> <target> >  <message> ~~ <fields>`.
/// Multi-line messages are indented to line up with the first line.
#[derive(Clone, Copy)]
struct EventFormatter(ColorChoice);

impl<S, N> FormatEvent<S, N> for EventFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: TracingWriter<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let use_ansi = self.0 == ColorChoice::Always
            || (writer.has_ansi_escapes() && self.0 != ColorChoice::Never);
        let mut out = StyledWriter { inner: writer.by_ref(), use_ansi };

        // Events coming from the `log` crate carry their metadata as fields.
        let normalized_metadata = event.normalized_metadata();
        let metadata = normalized_metadata.as_ref().unwrap_or(event.metadata());

        let dim = Style::new().dimmed();
        let (level_style, body_style) = match *metadata.level() {
            Level::ERROR => (Style::new().fg(Color::Red).bold(), Style::new().fg(Color::Red)),
            Level::WARN => (Style::new().fg(Color::Yellow).bold(), Style::new().fg(Color::Yellow)),
            Level::INFO => (Style::new().fg(Color::Green), Style::new()),
            Level::DEBUG => (Style::new().fg(Color::Blue), Style::new().dimmed()),
            Level::TRACE => (Style::new().fg(Color::Magenta), Style::new().fg(Color::DarkGray)),
        };

        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S.%3f");
        out.styled(dim, format_args!("{time} "))?;
        out.styled(level_style, format_args!("{:5}", metadata.level()))?;
        out.styled(dim, format_args!(" {} >  ", metadata.target()))?;

        let mut fields = FieldCollector::default();
        event.record(&mut fields);

        // Continuation lines start below the message. This assumes an ASCII
        // target, which all of ours are.
        let indent = "2021-05-04 19:40:18.270 DEBUG ".len() + 1 + metadata.target().len();
        if let Some(message) = &fields.message {
            for (i, line) in message.lines().enumerate() {
                if i > 0 {
                    out.newline_indented(indent, dim)?;
                }
                out.styled(body_style, format_args!("{line}"))?;
            }
        }

        if !fields.others.is_empty() {
            if fields.message.is_some() {
                out.styled(level_style, format_args!(" ~~ "))?;
            }
            for (i, (name, value)) in fields.others.iter().enumerate() {
                if i > 0 {
                    out.inner.write_char(' ')?;
                }
                out.styled(body_style.italic(), format_args!("{name}"))?;
                out.styled(body_style, format_args!("={value}"))?;
            }
        }

        writeln!(out.inner)
    }
}

/// Gathers the message and all other relevant fields of an event.
#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    others: Vec<(&'static str, String)>,
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{value:?}")),
            name if name.starts_with("log.") => {}
            name => self.others.push((name, format!("{value:?}"))),
        }
    }
}

struct StyledWriter<'a> {
    inner: TracingWriter<'a>,
    use_ansi: bool,
}

impl StyledWriter<'_> {
    fn styled(&mut self, style: Style, args: std::fmt::Arguments<'_>) -> std::fmt::Result {
        if self.use_ansi {
            write!(self.inner, "{}{args}{}", style.prefix(), style.suffix())
        } else {
            self.inner.write_fmt(args)
        }
    }

    fn newline_indented(&mut self, indent: usize, style: Style) -> std::fmt::Result {
        write!(self.inner, "\n{:indent$}", "")?;
        self.styled(style, format_args!(">  "))
    }
}
