//! Boundaries to the outside world
//!
//! - `persistence`: load/save the whole store as one snapshot
//! - `sheet`: append drafted content rows to a spreadsheet-style export
//!
//! Both sides are async traits so the store and the creator can impose a
//! timeout at the call site and treat expiry as a gateway failure.

pub mod persistence;
pub mod sheet;

pub use persistence::{JsonFileGateway, MemoryGateway, PersistenceGateway};
pub use sheet::{
    DisabledSheetGateway, ExportRow, RecordingSheetGateway, SheetGateway, WebhookSheetGateway,
    sheet_gateway_from_config,
};
