//! The weather.gov forecast report.
//!
//! The document is decoded once. `properties` is listed member by member, and the periods
//! for tomorrow and tomorrow night are projected out of `properties.periods`.
use std::borrow::Cow;
use std::io::Write;

use tracing::{debug, warn};

use crate::dom::Parser;
use crate::errors::{Error, ErrorKind};
use crate::fetch::Fetch;
use crate::pointer;
use crate::pointer::JsonPointer;
use crate::projection::{object_entries, write_entries, Entry, Projection};
use crate::JsonValue;

/// A location in the Arizona desert, as documented at
/// https://www.weather.gov/documentation/services-web-api
pub const DEFAULT_FORECAST_URL: &str = "https://api.weather.gov/gridpoints/PSR/91,76/forecast";

/// Index of the daytime period for tomorrow within `properties.periods`
pub const TOMORROW: usize = 2;
/// Index of the overnight period for tomorrow within `properties.periods`
pub const TOMORROW_NIGHT: usize = 3;

/// The fields projected for each period
pub const PERIOD_FIELDS: [&str; 7] = [
    "name",
    "temperature",
    "temperatureUnit",
    "windSpeed",
    "windDirection",
    "shortForecast",
    "detailedForecast",
];

/// Projection of a single forecast period, relative to the `properties` object. Labels take
/// the form `<label>.<field>`.
pub fn period_projection(label: &str, index: usize) -> Projection {
    PERIOD_FIELDS.iter().fold(Projection::new(), |projection, field| {
        projection.field(
            format!("{}.{}", label, field),
            pointer!["periods", index, *field],
        )
    })
}

/// The `properties` object of a forecast document.
///
/// Normally this is a nested object and is borrowed straight out of the document. When it
/// holds a string instead, the string is an encoded document of its own and is decoded, with
/// any failure reported as [ErrorKind::NestedParse].
pub fn properties<'d>(doc: &'d JsonValue, parser: &Parser) -> Result<Cow<'d, JsonValue>, Error> {
    let properties = crate::navigator::extract(doc, &pointer!["properties"])?;
    match properties {
        JsonValue::String(encoded) => {
            warn!("properties is a string, decoding it as a nested document");
            let nested = parser.parse_str(encoded).map_err(|err| {
                Error::new(ErrorKind::NestedParse)
                    .with_message("error parsing properties")
                    .with_source(err)
            })?;
            Ok(Cow::Owned(nested))
        }
        value => Ok(Cow::Borrowed(value)),
    }
}

/// Everything printed for a forecast, in output order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ForecastReport {
    /// Each member of `properties`, in document order
    pub properties: Vec<Entry>,
    pub tomorrow: Vec<Entry>,
    pub tomorrow_night: Vec<Entry>,
    /// Additional fields requested by pointer, against the whole document
    pub selected: Vec<Entry>,
}

impl ForecastReport {
    /// Build the report from a decoded forecast document
    pub fn build(doc: &JsonValue, parser: &Parser, selects: &[JsonPointer]) -> Result<Self, Error> {
        let properties = properties(doc, parser)?;
        let root = JsonPointer::default();
        let report = ForecastReport {
            properties: object_entries(&properties, &root)?,
            tomorrow: period_projection("tomorrow", TOMORROW).project(&properties)?,
            tomorrow_night: period_projection("tomorrow_night", TOMORROW_NIGHT)
                .project(&properties)?,
            selected: selects
                .iter()
                .fold(Projection::new(), |projection, pointer| {
                    projection.field(pointer.to_string(), pointer.clone())
                })
                .project(doc)?,
        };
        debug!(
            members = report.properties.len(),
            selected = report.selected.len(),
            "forecast report built"
        );
        Ok(report)
    }

    /// Write the report as `key=value` lines
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        write_entries(out, &self.properties)?;
        write_entries(out, &self.tomorrow)?;
        write_entries(out, &self.tomorrow_night)?;
        write_entries(out, &self.selected)
    }
}

/// Options for a single report run
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub parser: Parser,
    /// Echo the raw document before parsing it
    pub echo: bool,
    pub selects: Vec<JsonPointer>,
}

/// Fetch, decode, project and print a forecast. Each stage runs to completion before the
/// next begins, and the first failure ends the run.
pub fn run<W: Write + ?Sized>(
    fetcher: &dyn Fetch,
    options: &ReportOptions,
    out: &mut W,
) -> Result<ForecastReport, Error> {
    let body = fetcher.fetch()?;
    debug!(source = %fetcher.describe(), bytes = body.len(), "forecast retrieved");

    if options.echo {
        writeln!(out, "{}", String::from_utf8_lossy(&body)).map_err(output_error)?;
    }

    let doc = options.parser.parse_bytes(&body).map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message("error parsing weather response")
            .with_source(err)
    })?;

    let report = ForecastReport::build(&doc, &options.parser, &options.selects)?;
    report.write_to(out).map_err(output_error)?;
    out.flush().map_err(output_error)?;
    Ok(report)
}

fn output_error(err: std::io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write output")
        .with_source(err)
}
