//! Build a contact CSV from a pasted list of phone numbers

use crate::error::{Error, Result};
use crate::naming::NamingSequence;
use crate::table::TabularDataset;

/// Columns of a generated dataset
pub const MAKER_COLUMNS: [&str; 2] = ["name", "phone"];

/// One record per non-blank line of `text`, named from `seq`
pub fn make_dataset(text: &str, seq: &NamingSequence) -> Result<TabularDataset> {
    let phones: Vec<&str> = text
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if phones.is_empty() {
        return Err(Error::config("no phone numbers entered"));
    }

    let columns = MAKER_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut dataset = TabularDataset::new(columns, None)?;
    for (phone, name) in phones.into_iter().zip(seq.names()) {
        dataset.push_values(vec![name, phone.to_string()]);
    }

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_dataset() {
        let text = "  0711000001\n0711000002 \n\n0711000003\n";
        let ds = make_dataset(text, &NamingSequence::new("BET GROUP 1", 1)).unwrap();

        assert_eq!(ds.columns, vec!["name", "phone"]);
        assert_eq!(ds.record_count(), 3);
        assert_eq!(ds.value(0, "name"), Some("BET GROUP 1 001"));
        assert_eq!(ds.value(0, "phone"), Some("0711000001"));
        assert_eq!(ds.value(2, "name"), Some("BET GROUP 1 003"));
        assert_eq!(ds.value(2, "phone"), Some("0711000003"));
    }

    #[test]
    fn test_make_dataset_empty_input() {
        let err = make_dataset(" \n \n", &NamingSequence::new("X", 1)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }
}
