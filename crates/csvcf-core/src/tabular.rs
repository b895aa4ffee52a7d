//! Contact-oriented CSV codec
//!
//! Reads any CSV whose first column is a name and whose remaining columns are
//! phone numbers, and writes the fixed three-column layout address books
//! import: `Name, Phone Number 1, Phone Number 2`.

use crate::contact::ContactRecord;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header written by [`write_contacts`]
pub const CONTACT_HEADER: [&str; 3] = ["Name", "Phone Number 1", "Phone Number 2"];

/// Number of phone columns in the written layout
pub const PHONE_COLUMNS: usize = 2;

/// Read contacts from a CSV file
pub fn read_contacts<P: AsRef<Path>>(path: P) -> Result<Vec<ContactRecord>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_contacts_from(BufReader::new(file), path.to_path_buf())
}

/// Read contacts from CSV text (useful for testing)
pub fn read_contacts_str(content: &str, source_name: &str) -> Result<Vec<ContactRecord>> {
    read_contacts_from(content.as_bytes(), PathBuf::from(source_name))
}

fn read_contacts_from<R: Read>(reader: R, path: PathBuf) -> Result<Vec<ContactRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // The header only needs to exist; its names are not used
    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;
    if headers.is_empty() {
        return Err(Error::CsvParse {
            path,
            message: "missing header row".to_string(),
        });
    }

    let mut contacts = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        if record.len() < 2 {
            debug!(row = row_idx + 1, path = %path.display(), "skipping row with fewer than 2 fields");
            continue;
        }

        let name = record[0].trim().to_string();
        let phones = record
            .iter()
            .skip(1)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        contacts.push(ContactRecord { name, phones });
    }

    Ok(contacts)
}

/// Project a contact onto the fixed row layout: name plus exactly two phones
///
/// Extra phone numbers are dropped; missing ones become empty fields.
pub fn contact_row(record: &ContactRecord) -> [&str; 1 + PHONE_COLUMNS] {
    let phone = |i: usize| record.phones.get(i).map(String::as_str).unwrap_or("");
    [record.name.as_str(), phone(0), phone(1)]
}

/// Write contacts to a CSV file in the fixed layout
pub fn write_contacts<P: AsRef<Path>>(records: &[ContactRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_contacts_to(records, BufWriter::new(file), path)
}

/// Write contacts in the fixed layout to any writer
pub fn write_contacts_to<W: Write>(records: &[ContactRecord], writer: W, path: &Path) -> Result<()> {
    let csv_error = |e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CONTACT_HEADER).map_err(csv_error)?;
    for record in records {
        csv_writer.write_record(contact_row(record)).map_err(csv_error)?;
    }

    csv_writer.flush().map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
