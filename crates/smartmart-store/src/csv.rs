//! # CSV Import / Export
//!
//! Flat-file exchange for the product catalog plus a read-only orders
//! export for spreadsheets.
//!
//! ## Product File Contract
//! ```text
//! product_id,name,category,quantity,price,supplier,barcode
//! 1,Basmati Rice (5kg),Grocery,50,1200.00,Sharma Supplies,1
//! ```
//! Prices cross this boundary as decimal strings ("1200.00"); internally
//! everything stays integer paise. Import REPLACES the whole catalog and
//! resets the product id allocator to `max(id) + 1`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use smartmart_core::money::Money;
use smartmart_core::types::Product;
use smartmart_core::validation::{
    validate_price_cents, validate_product_name, validate_stock_quantity,
};
use smartmart_core::{InventoryStore, OrderLedger};
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// Column order for product CSV files.
pub const PRODUCT_HEADERS: [&str; 7] = [
    "product_id",
    "name",
    "category",
    "quantity",
    "price",
    "supplier",
    "barcode",
];

// =============================================================================
// Product Export
// =============================================================================

/// Writes the catalog in header order.
pub fn export_products<W: Write>(inventory: &InventoryStore, writer: W) -> StoreResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(PRODUCT_HEADERS)?;
    for product in inventory.products() {
        out.write_record([
            product.product_id.to_string(),
            product.name.clone(),
            product.category.clone(),
            product.quantity.to_string(),
            product.price().to_decimal_string(),
            product.supplier.clone(),
            product.barcode.clone(),
        ])?;
    }
    out.flush().map_err(StoreError::Io)?;
    Ok(())
}

/// [`export_products`] to a file path.
pub fn export_products_to_path(inventory: &InventoryStore, path: &Path) -> StoreResult<()> {
    export_products(inventory, File::create(path)?)?;
    info!(path = %path.display(), products = inventory.len(), "catalog exported");
    Ok(())
}

// =============================================================================
// Product Import
// =============================================================================

/// Parses a product CSV into records, validating every row.
///
/// The whole file is parsed before anything is returned, so a bad row
/// rejects the import without touching the live catalog.
pub fn parse_products<R: Read>(reader: R) -> StoreResult<Vec<Product>> {
    let mut input = csv::Reader::from_reader(reader);

    let headers = input.headers()?.clone();
    let index_of = |name: &'static str| -> StoreResult<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(StoreError::MissingColumn { name })
    };
    let id_col = index_of("product_id")?;
    let name_col = index_of("name")?;
    let category_col = index_of("category")?;
    let quantity_col = index_of("quantity")?;
    let price_col = index_of("price")?;
    let supplier_col = index_of("supplier")?;
    let barcode_col = index_of("barcode")?;

    let mut products = Vec::new();
    for (i, record) in input.records().enumerate() {
        let row = i + 2; // 1-based, after the header line
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let invalid = |column: &'static str, reason: String| StoreError::InvalidField {
            row,
            column,
            reason,
        };

        let product_id: u64 = field(id_col)
            .parse()
            .map_err(|_| invalid("product_id", "must be a positive integer".to_string()))?;
        if product_id == 0 {
            return Err(invalid("product_id", "must be a positive integer".to_string()));
        }
        let name = field(name_col).to_string();
        validate_product_name(&name)
            .map_err(|e| invalid("name", e.to_string()))?;
        let quantity: i64 = field(quantity_col)
            .parse()
            .map_err(|_| invalid("quantity", "must be an integer".to_string()))?;
        validate_stock_quantity(quantity)
            .map_err(|e| invalid("quantity", e.to_string()))?;
        let price = Money::parse_decimal(field(price_col))
            .map_err(|e| invalid("price", e.to_string()))?;
        validate_price_cents(price.cents())
            .map_err(|e| invalid("price", e.to_string()))?;

        let category = match field(category_col) {
            "" => smartmart_core::inventory::DEFAULT_CATEGORY.to_string(),
            other => other.to_string(),
        };
        let barcode = match field(barcode_col) {
            "" => product_id.to_string(),
            other => other.to_string(),
        };

        products.push(Product {
            product_id,
            name,
            category,
            quantity,
            price_cents: price.cents(),
            supplier: field(supplier_col).to_string(),
            barcode,
        });
    }

    for (i, product) in products.iter().enumerate() {
        if products[..i].iter().any(|p| p.product_id == product.product_id) {
            return Err(StoreError::InvalidField {
                row: i + 2,
                column: "product_id",
                reason: format!("duplicate id {}", product.product_id),
            });
        }
    }
    Ok(products)
}

/// Imports a product CSV, replacing the entire catalog. Returns the
/// number of products imported.
pub fn import_products_from_path(
    inventory: &mut InventoryStore,
    path: &Path,
) -> StoreResult<usize> {
    let products = parse_products(File::open(path)?)?;
    let count = products.len();
    inventory.replace_all(products);
    info!(path = %path.display(), products = count, "catalog imported");
    Ok(count)
}

// =============================================================================
// Orders Export
// =============================================================================

/// Writes a one-row-per-order summary. Read-only: there is no orders
/// import, the ledger is append-only through finalize alone.
pub fn export_orders<W: Write>(ledger: &OrderLedger, writer: W) -> StoreResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record([
        "order_id",
        "customer",
        "created_at",
        "items",
        "total",
        "order_disc_pct",
        "payment",
    ])?;
    for order in ledger.orders() {
        out.write_record([
            order.order_id.to_string(),
            order.customer.clone(),
            order.created_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            order.item_count().to_string(),
            order.total().to_decimal_string(),
            format!("{:.2}", order.discount().percentage()),
            order.payment.method.to_string(),
        ])?;
    }
    out.flush().map_err(StoreError::Io)?;
    Ok(())
}

/// [`export_orders`] to a file path.
pub fn export_orders_to_path(ledger: &OrderLedger, path: &Path) -> StoreResult<()> {
    export_orders(ledger, File::create(path)?)?;
    info!(path = %path.display(), orders = ledger.len(), "orders exported");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InventoryStore {
        let mut store = InventoryStore::new();
        store
            .add(
                "Basmati Rice (5kg)",
                "Grocery",
                50,
                Money::from_rupees(1200),
                "Sharma Supplies",
                None,
            )
            .unwrap();
        store
            .add("Masala Tea", "", 8, Money::from_cents(25050), "Tata", Some("890123"))
            .unwrap();
        store
    }

    #[test]
    fn test_export_format() {
        let mut buf = Vec::new();
        export_products(&catalog(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "product_id,name,category,quantity,price,supplier,barcode"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,Basmati Rice (5kg),Grocery,50,1200.00,Sharma Supplies,1"
        );
        assert_eq!(lines.next().unwrap(), "2,Masala Tea,General,8,250.50,Tata,890123");
    }

    #[test]
    fn test_export_import_round_trip() {
        let original = catalog();
        let mut buf = Vec::new();
        export_products(&original, &mut buf).unwrap();

        let mut imported = InventoryStore::new();
        imported.replace_all(parse_products(buf.as_slice()).unwrap());

        assert_eq!(imported.len(), original.len());
        for (a, b) in imported.products().iter().zip(original.products()) {
            assert_eq!(a.product_id, b.product_id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.category, b.category);
            assert_eq!(a.quantity, b.quantity);
            assert_eq!(a.price_cents, b.price_cents);
            assert_eq!(a.supplier, b.supplier);
            assert_eq!(a.barcode, b.barcode);
        }
        assert_eq!(imported.next_product_id(), 3); // max(id) + 1
    }

    #[test]
    fn test_import_applies_fallbacks() {
        let csv = "product_id,name,category,quantity,price,supplier,barcode\n\
                   7,Soap,,12,35.00,,\n";
        let products = parse_products(csv.as_bytes()).unwrap();
        assert_eq!(products[0].category, "General");
        assert_eq!(products[0].barcode, "7");
    }

    #[test]
    fn test_import_rejects_bad_rows_without_partial_result() {
        let csv = "product_id,name,category,quantity,price,supplier,barcode\n\
                   1,Rice,Grocery,50,1200.00,Sharma,1\n\
                   2,Tea,Beverage,eight,250.00,Tata,2\n";
        let err = parse_products(csv.as_bytes()).unwrap_err();
        match err {
            StoreError::InvalidField { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, "quantity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_rejects_negative_price() {
        let csv = "product_id,name,category,quantity,price,supplier,barcode\n\
                   1,Rice,Grocery,5,-12.00,Sharma,1\n";
        let err = parse_products(csv.as_bytes()).unwrap_err();
        match err {
            StoreError::InvalidField { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_import_rejects_zero_product_id() {
        let csv = "product_id,name,category,quantity,price,supplier,barcode\n\
                   0,Rice,Grocery,5,12.00,Sharma,1\n";
        assert!(matches!(
            parse_products(csv.as_bytes()),
            Err(StoreError::InvalidField { column: "product_id", .. })
        ));
    }

    #[test]
    fn test_import_rejects_missing_column_and_duplicate_ids() {
        let csv = "product_id,name,quantity,price,supplier,barcode\n";
        assert!(matches!(
            parse_products(csv.as_bytes()),
            Err(StoreError::MissingColumn { name: "category" })
        ));

        let csv = "product_id,name,category,quantity,price,supplier,barcode\n\
                   1,Rice,Grocery,50,1200.00,Sharma,1\n\
                   1,Tea,Beverage,8,250.00,Tata,2\n";
        assert!(matches!(
            parse_products(csv.as_bytes()),
            Err(StoreError::InvalidField { column: "product_id", .. })
        ));
    }

    #[test]
    fn test_orders_export_layout() {
        use smartmart_core::ledger::OrderDraft;
        use smartmart_core::payment::{PaymentDetails, PaymentMethod, PaymentRecord};
        use chrono::{TimeZone, Utc};

        let mut ledger = OrderLedger::new();
        ledger.append_at(
            OrderDraft {
                customer: "Asha (Pune)".to_string(),
                items: Vec::new(),
                total_cents: 205200,
                discount_bps: 500,
                payment: PaymentRecord {
                    method: PaymentMethod::Cash,
                    details: PaymentDetails::Reference(String::new()),
                },
            },
            Utc.with_ymd_and_hms(2026, 8, 29, 10, 0, 0).unwrap(),
        );

        let mut buf = Vec::new();
        export_orders(&ledger, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with(
            "1000,Asha (Pune),2026-08-29T10:00:00,0,2052.00,5.00,Cash"
        ));
    }
}
