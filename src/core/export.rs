//! CSV export of the currently visible table rows.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;

use crate::core::orders::OrderSet;

/// Default export file name, e.g. `orders-20240812-093104.csv`.
pub fn default_export_path(now: NaiveDateTime) -> PathBuf {
    PathBuf::from(format!("orders-{}.csv", now.format("%Y%m%d-%H%M%S")))
}

/// Write the rows selected by `visible` (indices into `set`) to `path`.
/// Returns the number of data rows written.
pub fn write_visible(set: &OrderSet, visible: &[usize], path: &Path) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(["id", "date", "lastname", "email"])?;
    for &index in visible {
        let row = &set.rows()[index];
        writer.write_record([
            row.id.to_string().as_str(),
            &row.date_text,
            &row.lastname,
            &row.email,
        ])?;
    }
    writer.flush()?;
    Ok(visible.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OrderRecord;
    use chrono::NaiveDate;

    #[test]
    fn export_path_encodes_the_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 8, 12)
            .unwrap()
            .and_hms_opt(9, 31, 4)
            .unwrap();
        assert_eq!(
            default_export_path(now),
            PathBuf::from("orders-20240812-093104.csv")
        );
    }

    #[test]
    fn writes_only_the_visible_rows() {
        let set = OrderSet::ingest(
            vec![
                OrderRecord {
                    id: 1,
                    date_created: Some("2024-06-15".into()),
                    lastname: "Muster".into(),
                    email: "m@example.org".into(),
                },
                OrderRecord {
                    id: 2,
                    date_created: Some("2024-01-01".into()),
                    lastname: "Hidden".into(),
                    email: "h@example.org".into(),
                },
            ],
            1,
        );
        let visible: Vec<usize> = set
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, o)| o.id == 1)
            .map(|(i, _)| i)
            .collect();

        let dir = std::env::temp_dir().join("event-desk-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("visible.csv");
        let written = write_visible(&set, &visible, &path).unwrap();
        assert_eq!(written, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,date,lastname,email"));
        assert!(contents.contains("1,15.06.2024,Muster,m@example.org"));
        assert!(!contents.contains("Hidden"));
        std::fs::remove_file(&path).ok();
    }
}
