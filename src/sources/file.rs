//! Local GPX file source

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use gpx::Gpx;

use super::{parse, GpxSource};
use crate::error::SourceError;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl GpxSource for FileSource {
    fn fetch(&mut self) -> Result<Gpx, SourceError> {
        if !self.path.is_file() {
            return Err(SourceError::NotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;

        parse(BufReader::new(file))
    }
}

#[cfg(test)]
pub mod tests {
    use std::fs;

    use super::FileSource;
    use crate::error::SourceError;
    use crate::sources::GpxSource;

    #[test]
    fn missing_file() {
        let mut source = FileSource::new("does/not/exist.gpx");

        assert!(matches!(source.fetch(), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn corrupt_file() -> Result<(), String> {
        let path = std::env::temp_dir().join("gpxsegments-corrupt.gpx");
        fs::write(&path, "<gpx><trk><trkseg><trkpt lat=").map_err(|e| e.to_string())?;

        let result = FileSource::new(&path).fetch();
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(SourceError::Parse(_))));

        Ok(())
    }

    #[test]
    fn read_file() -> Result<(), String> {
        let path = std::env::temp_dir().join("gpxsegments-read.gpx");
        let data = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><name>Loop</name><trkseg>
    <trkpt lat="45.0" lon="7.0"><ele>100</ele></trkpt>
    <trkpt lat="45.001" lon="7.0"><ele>101</ele></trkpt>
  </trkseg></trk>
</gpx>"#;
        fs::write(&path, data).map_err(|e| e.to_string())?;

        let result = FileSource::new(&path).fetch();
        let _ = fs::remove_file(&path);

        let gpx = result.map_err(|e| e.to_string())?;
        assert_eq!(1, gpx.tracks.len());
        assert_eq!(Some("Loop".to_string()), gpx.tracks[0].name);
        assert_eq!(2, gpx.tracks[0].segments[0].points.len());

        Ok(())
    }
}
