use std::collections::HashSet;
use std::fs::File;
use std::io::Read;

use camino::Utf8Path;
use encoding_rs::WINDOWS_1250;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::dataset::Dataset;
use crate::error::DataError;
use crate::region::Region;
use crate::schema;
use crate::store::DataStore;

/// Parses one region's records out of every archive in the store.
///
/// Archives are scanned in file-name order; the first occurrence of a record
/// identifier wins and later reissues of the same identifier are dropped,
/// across archive boundaries. An archive without a member for the region
/// contributes zero rows; any other archive failure is fatal.
pub fn parse_region(store: &DataStore, region: Region) -> Result<Dataset, DataError> {
    let member_name = region.member_name();
    let mut dataset = Dataset::empty();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for archive_path in store.archive_files()? {
        let rows_before = dataset.len();
        parse_archive_member(&archive_path, &member_name, region, &mut seen_ids, &mut dataset)?;
        debug!(
            "{}: {} rows from {archive_path}",
            region,
            dataset.len() - rows_before
        );
    }

    Ok(dataset)
}

fn parse_archive_member(
    archive_path: &Utf8Path,
    member_name: &str,
    region: Region,
    seen_ids: &mut HashSet<String>,
    dataset: &mut Dataset,
) -> Result<(), DataError> {
    let file = File::open(archive_path.as_std_path())
        .map_err(|err| DataError::Archive(format!("open {archive_path}: {err}")))?;
    let mut archive = ZipArchive::new(file)
        .map_err(|err| DataError::Archive(format!("read {archive_path}: {err}")))?;

    let mut member = match archive.by_name(member_name) {
        Ok(member) => member,
        Err(ZipError::FileNotFound) => {
            debug!("{archive_path} has no member {member_name}");
            return Ok(());
        }
        Err(err) => {
            return Err(DataError::Archive(format!(
                "{archive_path} member {member_name}: {err}"
            )));
        }
    };

    let mut raw = Vec::new();
    member
        .read_to_end(&mut raw)
        .map_err(|err| DataError::Archive(format!("{archive_path} member {member_name}: {err}")))?;
    // Legacy single-byte encoding; decode before handing the text to csv.
    let (text, _, _) = WINDOWS_1250.decode(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut skipped_arity = 0usize;
    for record in reader.records() {
        let record = record.map_err(|err| {
            DataError::Archive(format!("{archive_path} member {member_name}: {err}"))
        })?;
        if record.len() != schema::RAW_FIELD_COUNT {
            skipped_arity += 1;
            continue;
        }
        let id = &record[schema::RECORD_ID_FIELD];
        if !seen_ids.insert(id.to_string()) {
            continue;
        }
        let fields: Vec<&str> = record.iter().collect();
        dataset.push_row(&fields, region);
    }
    if skipped_arity > 0 {
        warn!("{archive_path} member {member_name}: skipped {skipped_arity} malformed rows");
    }

    Ok(())
}
