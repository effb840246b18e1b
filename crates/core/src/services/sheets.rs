//! Google Sheets façade.
//!
//! Spreadsheets are simulated with the store's named sheets. A "spreadsheet"
//! here is only an id and a default sheet name; every sheet lives in the
//! shared store next to the inventory.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::{REDACTED, parse};
use crate::error::FunctionError;
use crate::store::InventoryStore;
use crate::types::{Row, SpreadsheetId, inventory_header};
use crate::validation::{coerce_number, lenient, require_fields, sanitize_string};

/// Sheet used when the configuration names none.
pub const DEFAULT_SHEET: &str = "Inventory";

/// Quantity at or below which a product is reported as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: f64 = 5.0;

/// Report type that produces a low-stock sheet.
pub const LOW_STOCK_REPORT: &str = "low_stock";

/// Google Sheets connection settings.
#[derive(Clone)]
pub struct SheetsConfig {
    /// Service-account credentials, kept as their JSON text.
    pub credentials: SecretString,
    pub spreadsheet_id: SpreadsheetId,
    pub default_sheet: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("credentials", &REDACTED)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("default_sheet", &self.default_sheet)
            .finish()
    }
}

impl SheetsConfig {
    /// The configuration as echoed back to callers, with credentials redacted.
    #[must_use]
    pub fn summary(&self) -> SheetsConfigSummary {
        SheetsConfigSummary {
            credentials: REDACTED.to_string(),
            spreadsheet_id: self.spreadsheet_id.clone(),
            default_sheet: self.default_sheet.clone(),
        }
    }
}

/// Result of `sheets_configure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetsConfigSummary {
    pub credentials: String,
    pub spreadsheet_id: SpreadsheetId,
    pub default_sheet: String,
}

/// Result of `sheets_create_spreadsheet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetCreated {
    pub spreadsheet_id: SpreadsheetId,
    pub title: String,
}

/// A product row read back from a sheet.
///
/// Cells missing from a short row are left out; quantity and price that do
/// not read as numbers are `NaN` (serialized as `null`). A `null` cell is an
/// empty cell, which export writes for an absent field, so it reads as `NaN`
/// rather than `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(
        serialize_with = "lenient::serialize_number",
        deserialize_with = "lenient::deserialize_number"
    )]
    pub quantity: f64,
    #[serde(
        serialize_with = "lenient::serialize_number",
        deserialize_with = "lenient::deserialize_number"
    )]
    pub price: f64,
}

impl ImportedProduct {
    fn from_row(row: &[Value]) -> Self {
        Self {
            sku: row.first().cloned(),
            title: row.get(1).cloned(),
            quantity: cell_number(row.get(2)),
            price: cell_number(row.get(3)),
        }
    }
}

fn cell_number(cell: Option<&Value>) -> f64 {
    match cell {
        None | Some(Value::Null) => f64::NAN,
        Some(value) => coerce_number(Some(value)),
    }
}

/// Result of `sheets_create_report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Name of the sheet the report was written to.
    pub report: String,
    pub rows: Vec<Row>,
}

/// Result of `sheets_create_pivot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    pub target_sheet: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CreateSpreadsheetRequest {
    #[serde(deserialize_with = "lenient::text")]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExportRequest {
    products: Vec<Map<String, Value>>,
    #[serde(deserialize_with = "lenient::text")]
    sheet_name: Option<String>,
    clear_existing: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            products: Vec::new(),
            sheet_name: None,
            clear_existing: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SheetRequest {
    #[serde(deserialize_with = "lenient::text")]
    sheet_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AppendRequest {
    #[serde(deserialize_with = "lenient::text")]
    sheet_name: Option<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BulkUpdateRequest {
    products: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ReportRequest {
    #[serde(deserialize_with = "lenient::text")]
    report_type: Option<String>,
    data: ReportData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReportData {
    #[serde(deserialize_with = "lenient::present")]
    threshold: Option<Value>,
    products: Vec<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PivotRequest {
    #[serde(deserialize_with = "lenient::text")]
    source_sheet: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    target_sheet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FormatRequest {
    #[serde(deserialize_with = "lenient::text")]
    sheet_name: Option<String>,
    header: bool,
}

impl Default for FormatRequest {
    fn default() -> Self {
        Self {
            sheet_name: None,
            header: true,
        }
    }
}

/// Build an inventory row `[sku, title, quantity, price]` from a product
/// object; absent fields become `null` cells.
fn product_row(product: &Map<String, Value>) -> Row {
    ["sku", "title", "quantity", "price"]
        .iter()
        .map(|key| product.get(*key).cloned().unwrap_or(Value::Null))
        .collect()
}

/// Google Sheets façade over the shared store.
#[derive(Debug)]
pub struct SheetsService {
    store: InventoryStore,
    config: Option<SheetsConfig>,
}

impl SheetsService {
    /// Create an unconfigured façade over `store`.
    #[must_use]
    pub const fn new(store: InventoryStore) -> Self {
        Self {
            store,
            config: None,
        }
    }

    /// Current configuration, if `configure` has been called.
    #[must_use]
    pub const fn config(&self) -> Option<&SheetsConfig> {
        self.config.as_ref()
    }

    /// Set the configuration. Requires `credentials` and `spreadsheetId`;
    /// `defaultSheet` falls back to [`DEFAULT_SHEET`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if a required field is missing.
    pub fn configure(&mut self, payload: &Value) -> Result<SheetsConfigSummary, FunctionError> {
        require_fields(payload, &["credentials", "spreadsheetId"], "Sheets configuration")?;

        let credentials = payload
            .get("credentials")
            .map(Value::to_string)
            .unwrap_or_default();
        let default_sheet = sanitize_string(payload.get("defaultSheet"));
        let config = SheetsConfig {
            credentials: SecretString::from(credentials),
            spreadsheet_id: SpreadsheetId::new(sanitize_string(payload.get("spreadsheetId"))),
            default_sheet: if default_sheet.is_empty() {
                DEFAULT_SHEET.to_string()
            } else {
                default_sheet
            },
        };

        info!(
            spreadsheet_id = %config.spreadsheet_id,
            default_sheet = %config.default_sheet,
            "Sheets service configured"
        );
        let summary = config.summary();
        self.config = Some(config);
        Ok(summary)
    }

    fn ensure_configured(&self) -> Result<&SheetsConfig, FunctionError> {
        self.config.as_ref().ok_or(FunctionError::NotConfigured {
            service: "Google Sheets",
            prefix: "sheets",
        })
    }

    fn default_sheet(&self) -> Result<String, FunctionError> {
        Ok(self.ensure_configured()?.default_sheet.clone())
    }

    /// Resolve an optional sheet name, falling back to the default sheet.
    fn sheet_name(&self, requested: Option<&str>) -> Result<String, FunctionError> {
        match requested.filter(|name| !name.is_empty()) {
            Some(name) => Ok(name.trim().to_string()),
            None => self.default_sheet(),
        }
    }

    /// Start a new spreadsheet and seed the inventory header row.
    ///
    /// A non-empty `title` becomes the new default sheet name.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or the payload is malformed.
    #[instrument(skip(self, payload))]
    pub fn create_spreadsheet(&mut self, payload: &Value) -> Result<SpreadsheetCreated, FunctionError> {
        let store = self.store.clone();
        let config = self.config.as_mut().ok_or(FunctionError::NotConfigured {
            service: "Google Sheets",
            prefix: "sheets",
        })?;
        let request: CreateSpreadsheetRequest = parse(payload, "spreadsheet request")?;

        config.spreadsheet_id = SpreadsheetId::random();
        if let Some(title) = request.title.filter(|t| !t.is_empty()) {
            config.default_sheet = title;
        }
        store.set_sheet(&config.default_sheet, vec![inventory_header()]);

        info!(spreadsheet_id = %config.spreadsheet_id, "spreadsheet created");
        Ok(SpreadsheetCreated {
            spreadsheet_id: config.spreadsheet_id.clone(),
            title: config.default_sheet.clone(),
        })
    }

    /// Write products as `[sku, title, quantity, price]` rows.
    ///
    /// The sheet is cleared first unless `clearExisting` is `false`.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or `products` is malformed.
    #[instrument(skip(self, payload))]
    pub fn export_inventory(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        self.ensure_configured()?;
        let request: ExportRequest = parse(payload, "export request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;

        if request.clear_existing {
            self.store.clear_sheet(&name);
        }
        let rows: Vec<Row> = request.products.iter().map(product_row).collect();
        debug!(sheet = %name, rows = rows.len(), "exporting inventory");
        Ok(self.store.append_sheet(&name, rows))
    }

    /// Read every row of a sheet back as a product. Rows are not validated.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured.
    #[instrument(skip(self, payload))]
    pub fn import_inventory(&self, payload: &Value) -> Result<Vec<ImportedProduct>, FunctionError> {
        self.ensure_configured()?;
        let request: SheetRequest = parse(payload, "import request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;

        Ok(self
            .store
            .get_sheet(&name)
            .iter()
            .map(|row| ImportedProduct::from_row(row))
            .collect())
    }

    /// Replace the default-sheet row whose first cell equals `sku`, or append
    /// a new row if none does.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or `sku` is missing.
    #[instrument(skip(self, product))]
    pub fn update_product(&self, product: &Value) -> Result<Vec<Row>, FunctionError> {
        let name = self.default_sheet()?;
        require_fields(product, &["sku"], "Sheets product update")?;
        let Value::Object(product) = product else {
            return Err(FunctionError::TypeInput(
                "Sheets product update must be an object".to_string(),
            ));
        };

        let row = product_row(product);
        let mut sheet = self.store.get_sheet(&name);
        match sheet.iter().position(|existing| existing.first() == row.first()) {
            Some(index) => {
                if let Some(slot) = sheet.get_mut(index) {
                    *slot = row;
                }
            }
            None => sheet.push(row),
        }
        Ok(self.store.set_sheet(&name, sheet))
    }

    /// Apply `update_product` to each entry in order.
    ///
    /// Stops at the first invalid entry; earlier entries stay applied.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or an entry is invalid.
    #[instrument(skip(self, payload))]
    pub fn bulk_update(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        let name = self.default_sheet()?;
        let request: BulkUpdateRequest = parse(payload, "bulk update request")?;
        for product in &request.products {
            self.update_product(product)?;
        }
        Ok(self.store.get_sheet(&name))
    }

    /// Write a report sheet.
    ///
    /// `low_stock` lists `[sku, title, quantity]` for every product whose
    /// quantity is at or below `data.threshold` (default 5). Other report
    /// types produce an empty report sheet.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or `data` is malformed.
    #[instrument(skip(self, payload))]
    pub fn create_report(&self, payload: &Value) -> Result<Report, FunctionError> {
        let default_sheet = self.default_sheet()?;
        let request: ReportRequest = parse(payload, "report request")?;

        if request.report_type.as_deref() != Some(LOW_STOCK_REPORT) {
            let name = format!("{default_sheet}-report");
            self.store.set_sheet(&name, Vec::new());
            return Ok(Report {
                report: name,
                rows: Vec::new(),
            });
        }

        let threshold = match request.data.threshold {
            None | Some(Value::Null) => DEFAULT_LOW_STOCK_THRESHOLD,
            Some(value) => coerce_number(Some(&value)),
        };
        let rows: Vec<Row> = request
            .data
            .products
            .iter()
            .filter(|product| coerce_number(product.get("quantity")) <= threshold)
            .map(|product| {
                ["sku", "title", "quantity"]
                    .iter()
                    .map(|key| product.get(*key).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        let name = format!("{default_sheet}-low-stock");
        debug!(report = %name, rows = rows.len(), threshold, "low stock report written");
        let rows = self.store.set_sheet(&name, rows);
        Ok(Report { report: name, rows })
    }

    /// Rows of a sheet.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured.
    pub fn get_data(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        self.ensure_configured()?;
        let request: SheetRequest = parse(payload, "sheet request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;
        Ok(self.store.get_sheet(&name))
    }

    /// Append rows to a sheet and return the whole sheet.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured or `rows` is malformed.
    pub fn append_data(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        self.ensure_configured()?;
        let request: AppendRequest = parse(payload, "append request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;
        Ok(self.store.append_sheet(&name, request.rows))
    }

    /// Empty a sheet.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured.
    pub fn clear_data(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        self.ensure_configured()?;
        let request: SheetRequest = parse(payload, "sheet request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;
        Ok(self.store.clear_sheet(&name))
    }

    /// Copy a sheet verbatim into another one.
    ///
    /// The target defaults to `<source>-pivot`.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured.
    #[instrument(skip(self, payload))]
    pub fn create_pivot(&self, payload: &Value) -> Result<Pivot, FunctionError> {
        self.ensure_configured()?;
        let request: PivotRequest = parse(payload, "pivot request")?;
        let source = self.sheet_name(request.source_sheet.as_deref())?;
        let target = request
            .target_sheet
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("{source}-pivot"), |name| name.trim().to_string());

        let rows = self.store.set_sheet(&target, self.store.get_sheet(&source));
        Ok(Pivot {
            target_sheet: target,
            rows,
        })
    }

    /// Upper-case the header row of a sheet.
    ///
    /// Header cells become trimmed upper-case strings; other rows are left
    /// alone. With `header: false` the sheet is returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the service is not configured.
    #[instrument(skip(self, payload))]
    pub fn format_sheet(&self, payload: &Value) -> Result<Vec<Row>, FunctionError> {
        self.ensure_configured()?;
        let request: FormatRequest = parse(payload, "format request")?;
        let name = self.sheet_name(request.sheet_name.as_deref())?;

        let mut rows = self.store.get_sheet(&name);
        if request.header
            && let Some(header) = rows.first_mut()
        {
            for cell in header.iter_mut() {
                *cell = Value::String(sanitize_string(Some(cell)).to_uppercase());
            }
        }
        Ok(self.store.set_sheet(&name, rows))
    }
}
