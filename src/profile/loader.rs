//! Load batch projection requests from CSV
//!
//! One request per row; columns are the `PensionRequest` field names. Empty
//! cells in optional columns are read as absent.

use super::PensionRequest;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Load all requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<PensionRequest>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load requests from any reader (e.g., string buffer, stdin)
pub fn load_requests_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<PensionRequest>, Box<dyn Error>> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<PensionRequest>, Box<dyn Error>> {
    let mut requests = Vec::new();

    for result in reader.deserialize() {
        let request: PensionRequest = result?;
        requests.push(request);
    }

    log::info!("Loaded {} projection requests", requests.len());
    Ok(requests)
}
