//! CSV 导出: 采购明细与结算台账

use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

use crate::error::Result;
use crate::models::{PurchaseLine, SettlementEntry};

const LINE_HEADERS: [&str; 10] = [
    "Order Number",
    "Supplier",
    "Order Date",
    "Expected Delivery",
    "Status",
    "Product",
    "Quantity",
    "Unit Price",
    "Total",
    "Notes",
];

const SETTLEMENT_HEADERS: [&str; 6] = ["Id", "Date", "Description", "Reference", "Status", "Amount"];

/// 导出采购明细, 每个字段都加引号
pub fn write_lines_csv<W: Write>(writer: W, lines: &[PurchaseLine]) -> Result<()> {
    let mut wrt = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wrt.write_record(LINE_HEADERS)?;
    for line in lines {
        wrt.write_record([
            line.order_number.clone(),
            line.supplier.clone(),
            line.order_date.to_string(),
            line.expected_delivery.to_string(),
            line.status.to_string(),
            line.product.clone(),
            line.quantity.to_string(),
            line.unit_price.to_string(),
            line.total.to_string(),
            line.notes.clone(),
        ])?;
    }
    wrt.flush()?;
    Ok(())
}

pub fn write_settlements_csv<W: Write>(writer: W, entries: &[SettlementEntry]) -> Result<()> {
    let mut wrt = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    wrt.write_record(SETTLEMENT_HEADERS)?;
    for entry in entries {
        wrt.write_record([
            entry.id.clone(),
            entry.date.format("%Y-%m-%d").to_string(),
            entry.description.clone(),
            entry.reference.clone().unwrap_or_default(),
            entry.status.to_string(),
            entry.amount.to_string(),
        ])?;
    }
    wrt.flush()?;
    Ok(())
}
