use serde::{Deserialize, Serialize};

use super::resource::{status_enum, string_enum, Editable, RecordMeta, Resource};
use crate::utils::{lenient_f64, lenient_i64, FieldErrors, UploadKind, Validate};

string_enum! {
    /// Storefront categories offered in the product form.
    Category {
        TShirts => "T-shirts",
        Hoodies => "Hoodies",
        CapsAndHats => "Caps & Hats",
        Accessories => "Accessories",
    }
}

status_enum! {
    PurchaseStatus {
        Pending => "Pending",
        Confirmed => "Confirmed",
        Cancelled => "Cancelled",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(deserialize_with = "lenient_i64")]
    pub stock_quantity: Option<i64>,
    pub category: String,
    pub size: String,
}

impl Validate for ProductInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("name", &self.name, "Product name is required")
            .require("description", &self.description, "Description is required")
            .require_positive("price", self.price, "Price")
            .require_positive("stockQuantity", self.stock_quantity.map(|q| q as f64), "Stock quantity")
            .require("category", &self.category, "Category is required")
            .check("category", Category::parse(&self.category).is_some(), "Unknown category");
        errors
    }
}

impl Resource for Product {
    const COLLECTION: &'static str = "products";
    const LABEL: &'static str = "Product";
    const FILTERS: &'static [&'static str] = &["category"];
    const UPLOAD: Option<UploadKind> = Some(UploadKind::ProductImage);

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn attachment(&self) -> Option<&str> {
        self.image.as_deref()
    }

    fn set_attachment(&mut self, path: String) {
        self.image = Some(path);
    }
}

impl Editable for Product {
    type Input = ProductInput;

    fn from_input(input: ProductInput, meta: RecordMeta) -> Self {
        let size = input.size.trim();
        Product {
            meta,
            name: input.name.trim().to_string(),
            description: input.description,
            price: input.price.unwrap_or_default(),
            stock_quantity: input.stock_quantity.unwrap_or_default(),
            category: Category::parse(&input.category).unwrap_or_default(),
            size: (!size.is_empty()).then(|| size.to_string()),
            image: None,
        }
    }
}

/// Storefront order for a product, paid by uploaded bank slip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: f64,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_slip: Option<String>,
    #[serde(default)]
    pub status: PurchaseStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseInput {
    pub product_id: String,
    pub product_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: Option<i64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_price: Option<f64>,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: String,
}

impl Validate for PurchaseInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors
            .require("productId", &self.product_id, "Product is required")
            .require("productName", &self.product_name, "Product name is required")
            .require_positive("quantity", self.quantity.map(|q| q as f64), "Quantity")
            .check(
                "totalPrice",
                self.total_price.map(|p| p >= 0.0).unwrap_or(false),
                "Total price is required",
            )
            .require("customerName", &self.customer_name, "Name is required")
            .require_email("email", &self.email)
            .require_phone("phone", &self.phone)
            .require("address", &self.address, "Address is required")
            .check(
                "status",
                PurchaseStatus::parse_or_default(&self.status).is_some(),
                "Unknown purchase status",
            );
        errors
    }
}

impl Resource for Purchase {
    const COLLECTION: &'static str = "purchases";
    const LABEL: &'static str = "Purchase";
    const FILTERS: &'static [&'static str] = &["productId", "email", "status"];
    const UPLOAD: Option<UploadKind> = Some(UploadKind::PurchasePayment);

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.customer_name)
    }

    fn attachment(&self) -> Option<&str> {
        self.payment_slip.as_deref()
    }

    fn set_attachment(&mut self, path: String) {
        self.payment_slip = Some(path);
    }
}

impl Editable for Purchase {
    type Input = PurchaseInput;

    fn from_input(input: PurchaseInput, meta: RecordMeta) -> Self {
        Purchase {
            meta,
            product_id: input.product_id.trim().to_string(),
            product_name: input.product_name.trim().to_string(),
            quantity: input.quantity.unwrap_or_default(),
            total_price: input.total_price.unwrap_or_default(),
            customer_name: input.customer_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: input.address.trim().to_string(),
            payment_slip: None,
            status: PurchaseStatus::parse_or_default(&input.status).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product() -> ProductInput {
        ProductInput {
            name: "Logo tee".into(),
            description: "Cotton".into(),
            price: Some(25.0),
            stock_quantity: Some(10),
            category: "T-shirts".into(),
            size: "M".into(),
        }
    }

    #[test]
    fn test_product_form_rules() {
        assert!(valid_product().validate().is_empty());

        let errors = ProductInput::default().validate();
        assert_eq!(errors.get("name"), Some("Product name is required"));
        assert_eq!(errors.get("description"), Some("Description is required"));
        assert_eq!(errors.get("price"), Some("Price is required"));
        assert_eq!(errors.get("stockQuantity"), Some("Stock quantity is required"));
        assert_eq!(errors.get("category"), Some("Category is required"));

        let mut bad = valid_product();
        bad.price = Some(0.0);
        bad.category = "Shoes".into();
        let errors = bad.validate();
        assert_eq!(errors.get("price"), Some("Price must be a positive number"));
        assert_eq!(errors.get("category"), Some("Unknown category"));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::parse("caps & hats"), Some(Category::CapsAndHats));
        assert_eq!(Category::TShirts.to_string(), "T-shirts");
        assert_eq!(
            serde_json::to_value(Category::CapsAndHats).unwrap(),
            serde_json::json!("Caps & Hats")
        );
    }

    #[test]
    fn test_product_from_input_drops_blank_size() {
        let mut input = valid_product();
        input.size = "  ".into();
        let product = Product::from_input(input, RecordMeta::new());
        assert_eq!(product.size, None);
        assert_eq!(product.category, Category::TShirts);
    }

    #[test]
    fn test_purchase_defaults_to_pending() {
        let input = PurchaseInput {
            product_id: "p1".into(),
            product_name: "Logo tee".into(),
            quantity: Some(2),
            total_price: Some(50.0),
            customer_name: "Ann".into(),
            email: "ann@example.com".into(),
            phone: "0771234567".into(),
            address: "1 Main St".into(),
            status: String::new(),
        };
        assert!(input.validate().is_empty());
        let purchase = Purchase::from_input(input, RecordMeta::new());
        assert_eq!(purchase.status, PurchaseStatus::Pending);
    }
}
