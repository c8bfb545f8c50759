use anyhow::Result;
use csv::Writer;

/// Prepended so spreadsheet tools pick UTF-8 for non-ASCII names.
pub const UTF8_BOM: &str = "\u{feff}";

/// Render `header` and `rows` as CSV bytes, BOM first.
pub fn to_csv_bytes<R, F>(header: &[&str], rows: R) -> Result<Vec<u8>>
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<[u8]>,
{
    let mut buf = UTF8_BOM.as_bytes().to_vec();
    {
        let mut wtr = Writer::from_writer(&mut buf);
        wtr.write_record(header)?;
        for row in rows {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_bom_and_writes_one_line_per_row() {
        let bytes = to_csv_bytes(
            &["Seamstress", "Total"],
            vec![
                vec!["Malika".to_string(), "3600".to_string()],
                vec!["Ra'no, senior".to_string(), "150.5".to_string()],
            ],
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(
            lines,
            vec!["Seamstress,Total", "Malika,3600", "\"Ra'no, senior\",150.5"]
        );
    }
}
