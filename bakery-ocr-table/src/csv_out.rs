use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExtractError;
use crate::model::TableResult;

fn records(result: &TableResult) -> impl Iterator<Item = Vec<&str>> {
    result.data.iter().map(|row| {
        result
            .header
            .iter()
            .map(|column| row.get(column).map_or("", String::as_str))
            .collect()
    })
}

pub fn write_csv(path: &Path, result: &TableResult, delimiter: u8) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    writer.write_record(&result.header)?;
    for record in records(result) {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv_to_string(result: &TableResult, delimiter: u8) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    writer.write_record(&result.header)?;
    for record in records(result) {
        writer.write_record(record)?;
    }
    writer.flush()?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
