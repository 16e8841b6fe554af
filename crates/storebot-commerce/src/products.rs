use crate::client::CommerceClient;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use storebot_core::{StorebotError, StorebotResult};
use storebot_tools::{Tool, ToolDescriptor};
use tracing::info;

fn product_summary(product: &serde_json::Value) -> serde_json::Value {
    json!({
        "id": product["id"],
        "title": product["title"],
        "handle": product["handle"],
        "status": product["status"],
        "vendor": product["vendor"],
        "product_type": product["product_type"],
        "created_at": product["created_at"],
        "updated_at": product["updated_at"],
    })
}

fn variant_summary(variant: &serde_json::Value) -> serde_json::Value {
    json!({
        "id": variant["id"],
        "title": variant["title"],
        "price": variant["price"],
        "sku": variant["sku"],
        "inventory_quantity": variant["inventory_quantity"],
    })
}

/// Lists products in the store.
pub struct ListProductsTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl ListProductsTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "list_products".to_string(),
                description: "Retrieve products from the store. Returns id, title, handle, \
                              status, vendor, product type and timestamps for each product."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of products to retrieve",
                            "default": 10
                        }
                    }
                }),
            },
            client,
        }
    }
}

#[async_trait]
impl Tool for ListProductsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let limit = arguments["limit"].as_i64().unwrap_or(10);
        info!(limit = limit, "Listing products");

        let body = self
            .client
            .get("products.json", &[("limit", limit.to_string())])
            .await?;

        let products = body["products"]
            .as_array()
            .map(|items| items.iter().map(product_summary).collect::<Vec<_>>())
            .unwrap_or_default();

        Ok(json!(products))
    }
}

/// Fetches a single product, including its variants.
pub struct GetProductTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl GetProductTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "get_product".to_string(),
                description: "Retrieve a single product by its ID, including its variants."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "product_id": {
                            "type": "integer",
                            "description": "ID of the product to retrieve"
                        }
                    },
                    "required": ["product_id"]
                }),
            },
            client,
        }
    }
}

#[async_trait]
impl Tool for GetProductTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let product_id = arguments["product_id"].as_i64().unwrap_or_default();
        info!(product_id = product_id, "Fetching product");

        let body = self
            .client
            .get_optional(&format!("products/{product_id}.json"), &[])
            .await?
            .ok_or_else(|| StorebotError::Tool("Product not found".to_string()))?;

        let product = &body["product"];
        if product.is_null() {
            return Err(StorebotError::Tool("Product not found".to_string()));
        }

        let mut record = product_summary(product);
        record["variants"] = product["variants"]
            .as_array()
            .map(|items| json!(items.iter().map(variant_summary).collect::<Vec<_>>()))
            .unwrap_or_else(|| json!([]));

        Ok(record)
    }
}

/// Creates a new product in the store.
pub struct CreateProductTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl CreateProductTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "create_product".to_string(),
                description: "Create a new product. Only the title is required; description, \
                              vendor, product type, price and tags are optional."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Product title"
                        },
                        "body_html": {
                            "type": "string",
                            "description": "Product description (HTML allowed)"
                        },
                        "vendor": {
                            "type": "string",
                            "description": "Product vendor"
                        },
                        "product_type": {
                            "type": "string",
                            "description": "Product type/category"
                        },
                        "price": {
                            "type": "number",
                            "description": "Price of the default variant"
                        },
                        "tags": {
                            "type": "array",
                            "description": "Tags to attach to the product"
                        }
                    },
                    "required": ["title"]
                }),
            },
            client,
        }
    }
}

#[async_trait]
impl Tool for CreateProductTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let title = arguments["title"].as_str().unwrap_or_default();
        info!(title = %title, "Creating product");

        let mut product = serde_json::Map::new();
        product.insert("title".to_string(), json!(title));

        for field in ["body_html", "vendor", "product_type"] {
            if let Some(value) = arguments[field].as_str() {
                product.insert(field.to_string(), json!(value));
            }
        }

        if let Some(price) = arguments["price"].as_f64() {
            product.insert(
                "variants".to_string(),
                json!([{ "price": format!("{price:.2}") }]),
            );
        }

        if let Some(tags) = arguments["tags"].as_array() {
            let joined = tags
                .iter()
                .filter_map(|t| t.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            product.insert("tags".to_string(), json!(joined));
        }

        let body = self
            .client
            .post("products.json", &json!({ "product": product }))
            .await?;

        let created = &body["product"];
        Ok(json!({
            "success": true,
            "product": {
                "id": created["id"],
                "title": created["title"],
                "handle": created["handle"],
                "status": created["status"],
            }
        }))
    }
}
