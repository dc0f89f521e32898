use crate::domain::history::HistoryEntry;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Format, Workbook};

const HEADERS: [&str; 5] = ["Дата", "Действие", "Код действия", "Клиент ID", "Детали"];

/// Workbook bytes for the given feed, one row per entry in feed order.
pub fn history_workbook(entries: &[HistoryEntry]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("История")
        .map_err(|e| ServerError::XlsxError(format!("Failed to name sheet: {}", e)))?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(|e| {
                ServerError::XlsxError(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    for (i, entry) in entries.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &entry.timestamp)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write timestamp: {}", e)))?;

        worksheet
            .write_string(r, 1, entry.action.label())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write action: {}", e)))?;

        worksheet
            .write_string(r, 2, entry.action.as_str())
            .map_err(|e| ServerError::XlsxError(format!("Failed to write action code: {}", e)))?;

        worksheet
            .write_number(r, 3, entry.client_id.0 as f64)
            .map_err(|e| ServerError::XlsxError(format!("Failed to write client id: {}", e)))?;

        worksheet
            .write_string(r, 4, entry.details.as_deref().unwrap_or(""))
            .map_err(|e| ServerError::XlsxError(format!("Failed to write details: {}", e)))?;
    }

    worksheet.set_column_width(0, 26).map_err(ServerError::from)?;
    worksheet.set_column_width(4, 60).map_err(ServerError::from)?;

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {}", e)))
}

pub fn export_history_xlsx(entries: &[HistoryEntry], stamp: &str) -> ResultResp {
    let buffer = history_workbook(entries)?;
    xlsx_response(buffer, &format!("history_{stamp}.xlsx"))
}
