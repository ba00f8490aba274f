//! Report artifact output.
//!
//! [`ReportWriter`] is the seam the pipeline hands finished rows to;
//! [`CsvReportWriter`] is the production implementation, writing one CSV
//! file per seller per day under the configured output directory.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::rows::SettlementRow;
use crate::sellers::SellerConfig;

/// Persists a seller's settlement rows as a tabular artifact.
pub trait ReportWriter: Send + Sync {
    /// Writes the rows, returning the artifact location, or `None` when
    /// there is nothing to write.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the artifact cannot be created
    /// or written; an empty row set is not an error.
    fn write(
        &self,
        seller: &SellerConfig,
        rows: &[SettlementRow],
        local_date_iso: &str,
    ) -> crate::Result<Option<PathBuf>>;
}

/// Writes `settlements_{date}_{seller}.csv` files.
pub struct CsvReportWriter {
    output_dir: PathBuf,
}

impl CsvReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        CsvReportWriter {
            output_dir: output_dir.into(),
        }
    }
}

impl ReportWriter for CsvReportWriter {
    fn write(
        &self,
        seller: &SellerConfig,
        rows: &[SettlementRow],
        local_date_iso: &str,
    ) -> crate::Result<Option<PathBuf>> {
        if rows.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            crate::RemitError::Io(format!(
                "failed to create {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let file_name = format!(
            "settlements_{}_{}.csv",
            local_date_iso,
            seller.display.replace(' ', "_")
        );
        let path = self.output_dir.join(file_name);

        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer
            .flush()
            .map_err(|e| crate::RemitError::Io(format!("failed to flush {}: {e}", path.display())))?;

        info!(path = %path.display(), rows = rows.len(), "settlement report written");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn seller() -> SellerConfig {
        SellerConfig {
            id: "slr001".to_string(),
            display: "Acme Home".to_string(),
            email_to: Vec::new(),
            email_cc: Vec::new(),
        }
    }

    fn row(order_id: &str) -> SettlementRow {
        SettlementRow {
            invoiced_date: "15/03/2024".to_string(),
            order_id: order_id.to_string(),
            seller_order: "1234567".to_string(),
            status: "Invoiced".to_string(),
            seller: "Acme Home".to_string(),
            shipping: dec!(5.00),
            items: dec!(20.00),
            total: dec!(25.00),
            installments: Some(3),
        }
    }

    #[test]
    fn empty_rows_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvReportWriter::new(dir.path());
        let artifact = writer.write(&seller(), &[], "2024-03-15").unwrap();
        assert!(artifact.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn writes_header_and_one_record_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvReportWriter::new(dir.path());

        let rows = vec![row("A-1"), row("A-2")];
        let artifact = writer
            .write(&seller(), &rows, "2024-03-15")
            .unwrap()
            .expect("artifact expected for non-empty rows");

        assert_eq!(
            artifact.file_name().unwrap().to_str().unwrap(),
            "settlements_2024-03-15_Acme_Home.csv"
        );

        let contents = fs::read_to_string(&artifact).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "invoiced_date,order_id,seller_order,status,seller,shipping,items,total,installments"
        );
        assert!(lines[1].contains("A-1"));
        assert!(lines[1].contains("25.00"));
        assert!(lines[1].ends_with(",3"));
    }

    #[test]
    fn missing_installments_serialize_as_empty_field() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CsvReportWriter::new(dir.path());

        let mut no_installments = row("B-1");
        no_installments.installments = None;
        let artifact = writer
            .write(&seller(), &[no_installments], "2024-03-15")
            .unwrap()
            .unwrap();

        let contents = fs::read_to_string(&artifact).unwrap();
        assert!(contents.lines().nth(1).unwrap().ends_with(','));
    }

    #[test]
    fn creates_the_output_directory_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports").join("daily");
        let writer = CsvReportWriter::new(&nested);
        let artifact = writer.write(&seller(), &[row("C-1")], "2024-03-15").unwrap();
        assert!(artifact.unwrap().starts_with(&nested));
    }
}
