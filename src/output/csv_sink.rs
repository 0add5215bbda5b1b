//! CSV output of the segments

use std::io::{Read, Write};

use csv::{Reader, Writer};
use serde::Deserialize;
use time::format_description::well_known;
use time::OffsetDateTime;

use crate::analyzer::route::Route;
use crate::analyzer::segmenter::Segment;
use crate::error::SinkError;

const STATS_HEADER: [&str; 13] = [
    "Segment",
    "Start Elevation",
    "End Elevation",
    "Min Elevation",
    "Max Elevation",
    "Distance(Km)",
    "Start Km",
    "End Km",
    "Elevation Gain",
    "Elevation Loss",
    "Avg Grade",
    "Max Grade",
    "Min Grade",
];

const TIMES_HEADER: [&str; 3] = ["Start time", "End time", "Duration"];

const DESCRIPTION_HEADER: &str = "Description";

/// Optional columns of the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Columns {
    pub times: bool,
    pub description: bool,
}

impl Columns {
    /// Times only when some segment has them
    pub fn for_routes(routes: &[Route], description: bool) -> Self {
        let times = routes
            .iter()
            .flat_map(|r| r.segments.iter())
            .any(|s| s.start_time.is_some() || s.end_time.is_some());

        Self { times, description }
    }

    pub fn header(&self) -> Vec<&'static str> {
        let mut header = STATS_HEADER.to_vec();

        if self.times {
            header.extend(TIMES_HEADER);
        }
        if self.description {
            header.push(DESCRIPTION_HEADER);
        }

        header
    }
}

pub struct CsvSink<W>
where
    W: Write,
{
    wtr: Writer<W>,
    columns: Columns,
}

impl<W> CsvSink<W>
where
    W: Write,
{
    pub fn new(writer: W, columns: Columns) -> Self {
        Self {
            wtr: Writer::from_writer(writer),
            columns,
        }
    }

    /// Header, then one row per segment of every route. Returns the rows count
    pub fn write_routes(&mut self, routes: &[Route]) -> Result<usize, SinkError> {
        self.wtr.write_record(self.columns.header())?;

        let mut rows = 0;
        for segment in routes.iter().flat_map(|r| r.segments.iter()) {
            let row = self.row(segment);
            self.wtr.write_record(&row)?;
            rows += 1;
        }

        self.wtr.flush()?;

        Ok(rows)
    }

    fn row(&self, segment: &Segment) -> Vec<String> {
        let mut row = vec![segment.number.to_string()];

        row.extend(
            [
                segment.start_elevation,
                segment.end_elevation,
                segment.min_elevation,
                segment.max_elevation,
                segment.distance,
                segment.start_distance,
                segment.end_distance,
                segment.elevation_gain,
                segment.elevation_loss,
                segment.avg_grade,
                segment.max_grade,
                segment.min_grade,
            ]
            .into_iter()
            .map(|v| round2(v).to_string()),
        );

        if self.columns.times {
            row.push(format_time(segment.start_time));
            row.push(format_time(segment.end_time));
            row.push(segment.duration_hms().unwrap_or_default());
        }
        if self.columns.description {
            row.push(segment.description.clone().unwrap_or_default());
        }

        row
    }
}

/// Write the routes segments, choosing the columns from the data
pub fn write_routes<W: Write>(
    writer: W,
    routes: &[Route],
    description: bool,
) -> Result<usize, SinkError> {
    let columns = Columns::for_routes(routes, description);

    CsvSink::new(writer, columns).write_routes(routes)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn format_time(time: Option<OffsetDateTime>) -> String {
    time.and_then(|t| t.format(&well_known::Rfc3339).ok())
        .unwrap_or_default()
}

impl From<csv::Error> for SinkError {
    fn from(e: csv::Error) -> Self {
        SinkError::Csv(e.to_string())
    }
}

/// A segment row read back from the CSV
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SegmentRow {
    #[serde(rename = "Segment")]
    pub number: usize,
    #[serde(rename = "Start Elevation")]
    pub start_elevation: f64,
    #[serde(rename = "End Elevation")]
    pub end_elevation: f64,
    #[serde(rename = "Min Elevation")]
    pub min_elevation: f64,
    #[serde(rename = "Max Elevation")]
    pub max_elevation: f64,
    #[serde(rename = "Distance(Km)")]
    pub distance: f64,
    #[serde(rename = "Start Km")]
    pub start_distance: f64,
    #[serde(rename = "End Km")]
    pub end_distance: f64,
    #[serde(rename = "Elevation Gain")]
    pub elevation_gain: f64,
    #[serde(rename = "Elevation Loss")]
    pub elevation_loss: f64,
    #[serde(rename = "Avg Grade")]
    pub avg_grade: f64,
    #[serde(rename = "Max Grade")]
    pub max_grade: f64,
    #[serde(rename = "Min Grade")]
    pub min_grade: f64,
    #[serde(rename = "Start time", default)]
    pub start_time: Option<String>,
    #[serde(rename = "End time", default)]
    pub end_time: Option<String>,
    #[serde(rename = "Duration", default)]
    pub duration: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

pub fn read_rows<R: Read>(reader: R) -> Result<Vec<SegmentRow>, SinkError> {
    let mut rdr = Reader::from_reader(reader);
    let mut rows = vec![];

    for row in rdr.deserialize() {
        rows.push(row?);
    }

    Ok(rows)
}
