use std::fs::File;
use std::io::Write;

use camino::Utf8PathBuf;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use nehoda_data_manager::parse::parse_region;
use nehoda_data_manager::schema::{COLUMNS, ColumnType, RAW_FIELD_COUNT};
use nehoda_data_manager::store::DataStore;
use nehoda_data_manager::{Dataset, Region};

fn row_fields(id: &str) -> Vec<String> {
    COLUMNS[..RAW_FIELD_COUNT]
        .iter()
        .enumerate()
        .map(|(index, (_, column_type))| {
            if index == 0 {
                id.to_string()
            } else {
                match column_type {
                    ColumnType::Text => "A".to_string(),
                    ColumnType::Integer => "3".to_string(),
                    ColumnType::Float => "10,5".to_string(),
                    ColumnType::Date => "2021-06-15".to_string(),
                }
            }
        })
        .collect()
}

fn row(id: &str) -> String {
    row_fields(id).join(";")
}

fn row_with(id: &str, column: &str, value: &str) -> String {
    let mut fields = row_fields(id);
    let index = COLUMNS
        .iter()
        .position(|(name, _)| *name == column)
        .unwrap();
    fields[index] = value.to_string();
    fields.join(";")
}

fn write_archive(store: &DataStore, file_name: &str, members: &[(&str, Vec<u8>)]) {
    store.ensure_root().unwrap();
    let file = File::create(store.archive_path(file_name).as_std_path()).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, bytes) in members {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
}

fn temp_store() -> (tempfile::TempDir, DataStore) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    let store = DataStore::with_root(root);
    (temp, store)
}

fn assert_aligned(dataset: &Dataset, rows: usize) {
    assert_eq!(dataset.len(), rows);
    for (_, column) in dataset.columns() {
        assert_eq!(column.len(), rows);
    }
}

#[test]
fn duplicate_ids_within_one_archive_are_dropped() {
    let (_temp, store) = temp_store();
    let pha = format!("{}\n{}\n{}\n", row("1001"), row("1002"), row("1001"));
    let stc = format!("{}\n{}\n{}\n", row("2001"), row("2002"), row("2001"));
    write_archive(
        &store,
        "datagis2021.zip",
        &[("00.csv", pha.into_bytes()), ("01.csv", stc.into_bytes())],
    );

    let dataset = parse_region(&store, Region::Pha).unwrap();
    assert_aligned(&dataset, 2);
    assert_eq!(
        dataset.column("p1").unwrap().as_text().unwrap(),
        &["1001".to_string(), "1002".to_string()]
    );
    assert_eq!(
        dataset.column("region").unwrap().as_text().unwrap(),
        &["PHA".to_string(), "PHA".to_string()]
    );
}

#[test]
fn first_archive_wins_across_archives() {
    let (_temp, store) = temp_store();
    write_archive(
        &store,
        "datagis2020.zip",
        &[("00.csv", format!("{}\n", row_with("1001", "p36", "7")).into_bytes())],
    );
    write_archive(
        &store,
        "datagis2021.zip",
        &[(
            "00.csv",
            format!("{}\n{}\n", row_with("1001", "p36", "9"), row("1002")).into_bytes(),
        )],
    );

    let dataset = parse_region(&store, Region::Pha).unwrap();
    assert_aligned(&dataset, 2);
    // The 2020 archive sorts first, so its p36 value survives the reissue.
    assert_eq!(dataset.column("p36").unwrap().as_integer().unwrap(), &[7, 3]);
}

#[test]
fn parsing_twice_is_deterministic() {
    let (_temp, store) = temp_store();
    let pha = format!("{}\n{}\n{}\n", row("1003"), row("1001"), row("1002"));
    write_archive(&store, "datagis2021.zip", &[("00.csv", pha.into_bytes())]);

    let first = parse_region(&store, Region::Pha).unwrap();
    let second = parse_region(&store, Region::Pha).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_member_contributes_zero_rows() {
    let (_temp, store) = temp_store();
    write_archive(
        &store,
        "datagis2020.zip",
        &[("00.csv", format!("{}\n", row("1001")).into_bytes())],
    );
    write_archive(
        &store,
        "datagis2021.zip",
        &[("01.csv", format!("{}\n", row("2001")).into_bytes())],
    );

    let pha = parse_region(&store, Region::Pha).unwrap();
    assert_aligned(&pha, 1);

    // No archive carries a JHC member at all.
    let jhc = parse_region(&store, Region::Jhc).unwrap();
    assert_aligned(&jhc, 0);
}

#[test]
fn field_coercion_recovers_from_malformed_values() {
    let (_temp, store) = temp_store();
    let mut fields = row_fields("1001");
    let float_index = COLUMNS.iter().position(|(name, _)| *name == "a").unwrap();
    let int_index = COLUMNS.iter().position(|(name, _)| *name == "p36").unwrap();
    let sentinel_index = COLUMNS.iter().position(|(name, _)| *name == "p37").unwrap();
    fields[float_index] = "abc".to_string();
    fields[int_index] = String::new();
    fields[sentinel_index] = "XX".to_string();
    let line = format!("{}\n{}\n", fields.join(";"), row_with("1002", "b", "12,5"));
    write_archive(&store, "datagis2021.zip", &[("00.csv", line.into_bytes())]);

    let dataset = parse_region(&store, Region::Pha).unwrap();
    assert_aligned(&dataset, 2);
    assert_eq!(
        dataset.column("a").unwrap().as_float().unwrap(),
        &[-1.0, 10.5]
    );
    assert_eq!(
        dataset.column("b").unwrap().as_float().unwrap(),
        &[10.5, 12.5]
    );
    assert_eq!(
        dataset.column("p36").unwrap().as_integer().unwrap(),
        &[-1, 3]
    );
    assert_eq!(
        dataset.column("p37").unwrap().as_integer().unwrap(),
        &[-1, 3]
    );
}

#[test]
fn rows_with_wrong_field_count_are_skipped() {
    let (_temp, store) = temp_store();
    let line = format!("short;row\n{}\n", row("1001"));
    write_archive(&store, "datagis2021.zip", &[("00.csv", line.into_bytes())]);

    let dataset = parse_region(&store, Region::Pha).unwrap();
    assert_aligned(&dataset, 1);
    assert_eq!(
        dataset.column("p1").unwrap().as_text().unwrap(),
        &["1001".to_string()]
    );
}

#[test]
fn members_decode_as_windows_1250() {
    let (_temp, store) = temp_store();
    let fields = row_fields("1001");
    let text_index = COLUMNS.iter().position(|(name, _)| *name == "h").unwrap();
    let mut line: Vec<u8> = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            line.push(b';');
        }
        if index == text_index {
            // "Veveří" in Windows-1250: 0xF8 is ř, 0xED is í.
            line.extend_from_slice(b"Vever\xf8\xed");
        } else {
            line.extend_from_slice(field.as_bytes());
        }
    }
    line.push(b'\n');
    write_archive(&store, "datagis2021.zip", &[("00.csv", line)]);

    let dataset = parse_region(&store, Region::Pha).unwrap();
    assert_eq!(
        dataset.column("h").unwrap().as_text().unwrap(),
        &["Veveří".to_string()]
    );
}

#[test]
fn date_column_round_trips_to_calendar_dates() {
    let (_temp, store) = temp_store();
    let line = format!(
        "{}\n{}\n",
        row_with("1001", "p2a", "2021-06-15"),
        row_with("1002", "p2a", "")
    );
    write_archive(&store, "datagis2021.zip", &[("00.csv", line.into_bytes())]);

    let dataset = parse_region(&store, Region::Pha).unwrap();
    let dates = dataset.date_column("p2a").unwrap();
    assert_eq!(
        dates[0],
        Some(chrono::NaiveDate::from_ymd_opt(2021, 6, 15).unwrap())
    );
    assert_eq!(dates[1], None);
}

#[test]
fn corrupt_archive_is_fatal() {
    let (_temp, store) = temp_store();
    store.ensure_root().unwrap();
    std::fs::write(
        store.archive_path("broken.zip").as_std_path(),
        b"this is not a zip archive",
    )
    .unwrap();

    assert!(parse_region(&store, Region::Pha).is_err());
}
