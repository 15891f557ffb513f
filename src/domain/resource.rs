//! Catalog of the admin listings backed by the REST API.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::domain::types::TypeConstraintError;
use crate::store::params::ParamMapping;
use crate::table::{CellFormat, ColumnDef, FilterOption, Row, SelectOption};

/// Server-paginated admin listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Products,
    Categories,
    Orders,
    Customers,
    Coupons,
    Pages,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Products,
        ResourceKind::Categories,
        ResourceKind::Orders,
        ResourceKind::Customers,
        ResourceKind::Coupons,
        ResourceKind::Pages,
    ];

    /// Path segment under `/admin/`.
    pub const fn slug(self) -> &'static str {
        match self {
            ResourceKind::Products => "products",
            ResourceKind::Categories => "categories",
            ResourceKind::Orders => "orders",
            ResourceKind::Customers => "customers",
            ResourceKind::Coupons => "coupons",
            ResourceKind::Pages => "pages",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            ResourceKind::Products => "Products",
            ResourceKind::Categories => "Categories",
            ResourceKind::Orders => "Orders",
            ResourceKind::Customers => "Customers",
            ResourceKind::Coupons => "Coupons",
            ResourceKind::Pages => "Pages",
        }
    }

    /// Backend collection path, relative to the API base URL.
    pub const fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Products => "products",
            ResourceKind::Categories => "categories",
            ResourceKind::Orders => "orders",
            ResourceKind::Customers => "customers",
            ResourceKind::Coupons => "coupons",
            ResourceKind::Pages => "pages",
        }
    }

    /// Orders and customers name the sort direction `sortOrder`.
    pub const fn param_mapping(self) -> ParamMapping {
        match self {
            ResourceKind::Orders | ResourceKind::Customers => ParamMapping::SORT_ORDER,
            _ => ParamMapping::STANDARD,
        }
    }

    /// Orders are never deleted from the console.
    pub const fn deletable(self) -> bool {
        !matches!(self, ResourceKind::Orders)
    }

    /// Singular noun used in confirmation and flash messages.
    pub const fn record_label(self) -> &'static str {
        match self {
            ResourceKind::Products => "product",
            ResourceKind::Categories => "category",
            ResourceKind::Orders => "order",
            ResourceKind::Customers => "customer",
            ResourceKind::Coupons => "coupon",
            ResourceKind::Pages => "page",
        }
    }

    pub fn columns(self) -> Vec<ColumnDef> {
        match self {
            ResourceKind::Products => vec![
                ColumnDef::new("name", "Name").sortable(),
                ColumnDef::new("sku", "SKU").sortable(),
                ColumnDef::new("category.name", "Category"),
                ColumnDef::new("price", "Price")
                    .sortable()
                    .format(CellFormat::Currency),
                ColumnDef::new("stock", "Stock").sortable(),
                ColumnDef::new("isActive", "Active").format(CellFormat::Boolean),
                ColumnDef::new("createdAt", "Created")
                    .sortable()
                    .format(CellFormat::Date),
            ],
            ResourceKind::Categories => vec![
                ColumnDef::new("name", "Name").sortable(),
                ColumnDef::new("slug", "Slug"),
                ColumnDef::new("parent.name", "Parent"),
                ColumnDef::new("productCount", "Products").sortable(),
            ],
            ResourceKind::Orders => vec![
                ColumnDef::new("orderNumber", "Order").sortable(),
                ColumnDef::new("customer", "Customer").cell(customer_cell),
                ColumnDef::new("total", "Total")
                    .sortable()
                    .format(CellFormat::Currency),
                ColumnDef::new("status", "Status")
                    .sortable()
                    .format(CellFormat::Badge),
                ColumnDef::new("paymentStatus", "Payment").format(CellFormat::Badge),
                ColumnDef::new("createdAt", "Placed")
                    .sortable()
                    .format(CellFormat::DateTime),
            ],
            ResourceKind::Customers => vec![
                ColumnDef::new("name", "Name").sortable(),
                ColumnDef::new("email", "Email").sortable(),
                ColumnDef::new("phone", "Phone").format(CellFormat::Phone),
                ColumnDef::new("ordersCount", "Orders").sortable(),
                ColumnDef::new("createdAt", "Joined")
                    .sortable()
                    .format(CellFormat::Date),
            ],
            ResourceKind::Coupons => vec![
                ColumnDef::new("code", "Code").sortable(),
                ColumnDef::new("discount", "Discount").cell(discount_cell),
                ColumnDef::new("usageCount", "Used").sortable(),
                ColumnDef::new("expiresAt", "Expires")
                    .sortable()
                    .format(CellFormat::Date),
                ColumnDef::new("isActive", "Active").format(CellFormat::Boolean),
            ],
            ResourceKind::Pages => vec![
                ColumnDef::new("title", "Title").sortable(),
                ColumnDef::new("slug", "Slug"),
                ColumnDef::new("excerpt", "Excerpt").format(CellFormat::Html),
                ColumnDef::new("isPublished", "Published").format(CellFormat::Boolean),
                ColumnDef::new("updatedAt", "Updated")
                    .sortable()
                    .format(CellFormat::DateTime),
            ],
        }
    }

    pub fn filter_options(self) -> Vec<FilterOption> {
        match self {
            ResourceKind::Products => vec![
                FilterOption::text("name", "Name"),
                FilterOption::text("sku", "SKU"),
                FilterOption::select(
                    "status",
                    "Status",
                    vec![
                        SelectOption::new("active", "Active"),
                        SelectOption::new("inactive", "Inactive"),
                    ],
                ),
            ],
            ResourceKind::Categories => vec![FilterOption::text("name", "Name")],
            ResourceKind::Orders => vec![
                FilterOption::text("orderNumber", "Order number"),
                FilterOption::select(
                    "status",
                    "Status",
                    [
                        "pending",
                        "processing",
                        "shipped",
                        "delivered",
                        "cancelled",
                    ]
                    .into_iter()
                    .map(|status| SelectOption::new(status, capitalize(status)))
                    .collect(),
                ),
                FilterOption::text("customer", "Customer"),
            ],
            ResourceKind::Customers => vec![
                FilterOption::text("name", "Name"),
                FilterOption::text("email", "Email"),
                FilterOption::text("phone", "Phone"),
            ],
            ResourceKind::Coupons => vec![FilterOption::text("code", "Code")],
            ResourceKind::Pages => vec![FilterOption::text("title", "Title")],
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ResourceKind {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == value)
            .ok_or_else(|| TypeConstraintError::InvalidValue(value.to_string()))
    }
}

/// Backend collection of uploaded media files, rendered as a client-side
/// table over the whole library.
pub mod media {
    use super::*;

    pub const ENDPOINT: &str = "media";
    /// Session key of the media table's own sort and page state.
    pub const TABLE_ID: &str = "media";

    pub fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("fileName", "File").sortable(),
            ColumnDef::new("mimeType", "Type").sortable(),
            ColumnDef::new("size", "Size").sortable().cell(size_cell),
            ColumnDef::new("createdAt", "Uploaded")
                .sortable()
                .format(CellFormat::Date),
        ]
    }

    fn size_cell(row: &Row) -> String {
        row.get("size")
            .and_then(Value::as_u64)
            .map(human_size)
            .unwrap_or_default()
    }

    pub fn human_size(bytes: u64) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let mut size = bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{bytes} B")
        } else {
            format!("{size:.1} {}", UNITS[unit])
        }
    }
}

fn customer_cell(row: &Row) -> String {
    let customer = row.get("customer");
    let name = customer
        .and_then(|customer| customer.get("name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let email = customer
        .and_then(|customer| customer.get("email"))
        .and_then(Value::as_str);
    match (name, email, customer) {
        (Some(name), _, _) => name.to_string(),
        (None, Some(email), _) => email.to_string(),
        (None, None, Some(Value::String(raw))) => raw.clone(),
        _ => "Guest".to_string(),
    }
}

fn discount_cell(row: &Row) -> String {
    let value = row.get("discountValue").and_then(Value::as_f64);
    match (row.get("discountType").and_then(Value::as_str), value) {
        (Some("percentage"), Some(value)) => format!("{value}%"),
        (_, Some(value)) => format!("{value:.2}"),
        _ => String::new(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
