//! Spreadsheet rendering of registration exports.

use thiserror::Error;

use crate::services::projection::ExportRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl TryFrom<&str> for ExportFormat {
    type Error = ExportError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Rendered file ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export format: {0}")]
    InvalidFormat(String),
    #[error("failed to render csv")]
    CsvRender,
    #[error("failed to render xlsx")]
    XlsxRender,
}

pub fn render_registrations(
    base_name: &str,
    format: ExportFormat,
    rows: Vec<ExportRow>,
) -> Result<ExportFile, ExportError> {
    let rows: Vec<Vec<String>> = rows.into_iter().map(ExportRow::into_cells).collect();
    match format {
        ExportFormat::Csv => render_csv(base_name, &rows),
        ExportFormat::Xlsx => render_xlsx(base_name, &rows),
    }
}

fn render_csv(base_name: &str, rows: &[Vec<String>]) -> Result<ExportFile, ExportError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(ExportRow::HEADERS)
        .map_err(|_| ExportError::CsvRender)?;
    for row in rows {
        writer
            .write_record(row.iter().map(|cell| neutralize_formula(cell)))
            .map_err(|_| ExportError::CsvRender)?;
    }
    let bytes = writer.into_inner().map_err(|_| ExportError::CsvRender)?;

    Ok(ExportFile {
        file_name: format!("{base_name}.csv"),
        content_type: "text/csv; charset=utf-8",
        bytes,
    })
}

fn render_xlsx(base_name: &str, rows: &[Vec<String>]) -> Result<ExportFile, ExportError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, header) in ExportRow::HEADERS.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|_| ExportError::XlsxRender)?;
    }
    for (index, row) in rows.iter().enumerate() {
        let sheet_row = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            worksheet
                .write_string(sheet_row, col as u16, cell)
                .map_err(|_| ExportError::XlsxRender)?;
        }
    }

    let bytes = workbook
        .save_to_buffer()
        .map_err(|_| ExportError::XlsxRender)?;

    Ok(ExportFile {
        file_name: format!("{base_name}.xlsx"),
        content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        bytes,
    })
}

/// Prefix cells a spreadsheet would evaluate as formulas.
fn neutralize_formula(cell: &str) -> String {
    match cell.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{cell}"),
        _ => cell.to_string(),
    }
}
