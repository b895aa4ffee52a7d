//! vCard 2.1 encoding and decoding
//!
//! Only the display name and cell phone numbers are carried. Values are
//! written verbatim: no vCard escaping is applied on encode or undone on
//! decode.

use crate::contact::ContactRecord;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const BEGIN: &str = "BEGIN:VCARD";
const END: &str = "END:VCARD";

/// Encode one contact as a vCard
pub fn encode(record: &ContactRecord) -> String {
    let mut card = String::new();
    card.push_str(BEGIN);
    card.push('\n');
    card.push_str("VERSION:2.1\n");
    card.push_str(&format!("N:;{};;;\n", record.name));
    card.push_str(&format!("FN:{}\n", record.name));
    for phone in &record.phones {
        card.push_str(&format!("TEL;CELL:{}\n", phone));
    }
    card.push_str(END);
    card.push('\n');
    card
}

/// Encode several contacts, cards back to back
pub fn encode_all(records: &[ContactRecord]) -> String {
    records.iter().map(encode).collect()
}

/// Decode every complete card found in `text`
///
/// A card is finalized by `END:VCARD`. Cards without a name or without a
/// phone number are dropped, as is any trailing card that is never closed.
pub fn decode(text: &str) -> Vec<ContactRecord> {
    let mut contacts = Vec::new();
    let mut name: Option<String> = None;
    let mut phones: Vec<String> = Vec::new();
    let mut open = false;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');

        if line.starts_with(BEGIN) {
            if open && (name.is_some() || !phones.is_empty()) {
                debug!("discarding unterminated vCard");
            }
            name = None;
            phones.clear();
            open = true;
        } else if let Some(value) = line.strip_prefix("FN:") {
            name = Some(value.trim().to_string());
            open = true;
        } else if is_tel_line(line) {
            if let Some((_, value)) = line.split_once(':') {
                let value = value.trim();
                if !value.is_empty() {
                    phones.push(value.to_string());
                }
            }
            open = true;
        } else if line.starts_with(END) {
            let record = ContactRecord {
                name: name.take().unwrap_or_default(),
                phones: std::mem::take(&mut phones),
            };
            if record.is_complete() {
                contacts.push(record);
            } else {
                debug!(name = %record.name, "dropping incomplete vCard");
            }
            open = false;
        }
    }

    contacts
}

fn is_tel_line(line: &str) -> bool {
    line.starts_with("TEL;") || line.starts_with("TEL:")
}

/// Read and decode a .vcf file
pub fn read_vcf<P: AsRef<Path>>(path: P) -> Result<Vec<ContactRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decode(&text))
}

/// Encode contacts and write them to a .vcf file
pub fn write_vcf<P: AsRef<Path>>(records: &[ContactRecord], path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, encode_all(records)).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let card = encode(&ContactRecord::new("Ann", ["111", "222"]));
        assert_eq!(
            card,
            "BEGIN:VCARD\nVERSION:2.1\nN:;Ann;;;\nFN:Ann\nTEL;CELL:111\nTEL;CELL:222\nEND:VCARD\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let record = ContactRecord::new("A", ["1", "2"]);
        let decoded = decode(&encode(&record));
        assert_eq!(decoded, vec![record]);
    }

    #[test]
    fn test_round_trip_many_cards() {
        let records = vec![
            ContactRecord::new("Bob", ["555"]),
            ContactRecord::new("Ann", ["111", "222", "333"]),
        ];
        assert_eq!(decode(&encode_all(&records)), records);
    }

    #[test]
    fn test_card_without_fn_is_dropped() {
        let text = "BEGIN:VCARD\nVERSION:2.1\nN:;Bob;;;\nTEL;CELL:555\nEND:VCARD\n";
        assert!(decode(text).is_empty());
    }

    #[test]
    fn test_card_without_phone_is_dropped() {
        let text = "BEGIN:VCARD\nVERSION:2.1\nFN:Bob\nEND:VCARD\n";
        assert!(decode(text).is_empty());
    }

    #[test]
    fn test_unterminated_trailing_card_is_discarded() {
        let text = "BEGIN:VCARD\nFN:Ann\nTEL;CELL:111\nEND:VCARD\nBEGIN:VCARD\nFN:Bob\nTEL;CELL:555\n";
        let decoded = decode(text);
        assert_eq!(decoded, vec![ContactRecord::new("Ann", ["111"])]);
    }

    #[test]
    fn test_unterminated_card_does_not_leak_into_next() {
        let text = "BEGIN:VCARD\nFN:Bob\nTEL;CELL:555\nBEGIN:VCARD\nFN:Ann\nTEL;CELL:111\nEND:VCARD\n";
        assert_eq!(decode(text), vec![ContactRecord::new("Ann", ["111"])]);
    }

    #[test]
    fn test_decode_crlf_and_tel_variants() {
        let text = "BEGIN:VCARD\r\nFN: Ann \r\nTEL;TYPE=HOME:111\r\nTEL:222\r\nTEL;CELL:\r\nEND:VCARD\r\n";
        assert_eq!(decode(text), vec![ContactRecord::new("Ann", ["111", "222"])]);
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.vcf");
        let records = vec![ContactRecord::new("Ann", ["111"])];

        write_vcf(&records, &path).unwrap();
        assert_eq!(read_vcf(&path).unwrap(), records);
    }
}
