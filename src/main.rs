//! gpxsegments cli - fixed-length segments statistics of a GPX track

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use std::process;

use argopt::cmd;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gpxsegments::enrichment::description::{SegmentDescriber, Unconfigured};
use gpxsegments::enrichment::{elevation_chain, AnthropicDescriber};
use gpxsegments::error::SinkError;
use gpxsegments::output::write_routes;
use gpxsegments::sources::{self, is_valid_url};
use gpxsegments::{Error, RouteBuilder, Settings};

/// CLI of gpxsegments - Split a GPX track into fixed-length segments and save their statistics as CSV
#[cmd]
fn main(
    /// GPX source: local file path or route URL
    gpx_file_or_url: String,
    /// Output CSV file. Default: input name with the `.csv` extension
    #[opt(short = 'o', long)]
    output: Option<String>,
    /// Segments length in kilometers. Default: 1.0
    #[opt(short = 'l', long)]
    segment_length: Option<f64>,
    /// Prompt used to describe every segment, adds the Description column
    #[opt(short = 'a', long, alias = "aip")]
    ai_prompt: Option<String>,
    /// Configuration file. Default: .gpxsegments.yaml, ~/.gpxsegments.yaml
    #[opt(long)]
    config: Option<String>,
) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = load_configs(config).with_env();
    let output = output.unwrap_or_else(|| default_output(&gpx_file_or_url));
    let length = segment_length.unwrap_or(settings.segments.length_km);

    match run(&gpx_file_or_url, &output, length, ai_prompt, &settings) {
        Ok(rows) => {
            info!("{} segments written", rows);
            println!("Successfully processed {} to {}", gpx_file_or_url, output);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run(
    uri: &str,
    output: &str,
    length: f64,
    prompt: Option<String>,
    settings: &Settings,
) -> Result<usize, Error> {
    let gpx = sources::open(uri, &settings.providers)?.fetch()?;

    let chain = elevation_chain(&settings.providers);
    let describer: Box<dyn SegmentDescriber> = match &settings.description.api_key {
        Some(key) => {
            let model = settings.description.model.clone();
            match AnthropicDescriber::new(key.clone(), model) {
                Ok(describer) => Box::new(describer),
                Err(e) => {
                    warn!("Descriptions unavailable: {}", e);
                    Box::new(Unconfigured("description.api_key"))
                }
            }
        }
        None => Box::new(Unconfigured("description.api_key")),
    };

    let mut builder = RouteBuilder::new(length);
    builder
        .missing_elevation(settings.segments.missing_elevation)
        .elevation(&chain);

    if let Some(prompt) = &prompt {
        if settings.description.api_key.is_none() {
            warn!("No description API key configured, descriptions will be empty");
        }
        builder.describe(describer.as_ref(), prompt.clone());
    }

    let routes = builder.build(&gpx)?;

    if routes.iter().all(|r| r.is_empty()) {
        return Err(Error::NoRoutes(uri.to_string()));
    }

    let file = File::create(output).map_err(SinkError::from)?;
    let rows = write_routes(BufWriter::new(file), &routes, prompt.is_some())?;

    Ok(rows)
}

/// Input name with the `.csv` extension, in the current directory
fn default_output(uri: &str) -> String {
    let base = if is_valid_url(uri) {
        uri.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    } else {
        Path::new(uri)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    };

    format!("{}.csv", base)
}

/// Load the current config
fn load_configs(provided: Option<String>) -> Settings {
    let mut options = vec![];

    if let Some(sprovided) = provided {
        options.push(sprovided);
    }

    options.push(".gpxsegments.yaml".to_string());

    if let Some(home) = dirs::home_dir() {
        if let Some(shome) = home.to_str() {
            options.push(format!("{}/.gpxsegments.yaml", shome));
        }
    }

    for fi in options {
        if let Ok(s) = fs::read_to_string(&fi) {
            match Settings::from_yaml(&s) {
                Ok(settings) => return settings,
                Err(e) => warn!("Ignoring {}: {}", fi, e),
            }
        }
    }

    Settings::default()
}

#[test]
fn output_names() {
    assert_eq!("morning.csv", default_output("tracks/morning.gpx"));
    assert_eq!("morning.csv", default_output("morning"));
    assert_eq!(
        "3120112234.csv",
        default_output("https://www.strava.com/routes/3120112234")
    );
}
