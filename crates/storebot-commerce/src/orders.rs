use crate::client::CommerceClient;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use storebot_core::StorebotResult;
use storebot_tools::{Tool, ToolDescriptor};
use tracing::info;

fn customer_summary(customer: &serde_json::Value) -> serde_json::Value {
    if customer.is_null() {
        return serde_json::Value::Null;
    }
    json!({
        "id": customer["id"],
        "email": customer["email"],
        "first_name": customer["first_name"],
        "last_name": customer["last_name"],
    })
}

/// Lists orders, optionally filtered by status.
pub struct ListOrdersTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl ListOrdersTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "list_orders".to_string(),
                description: "Retrieve orders from the store with totals, status fields and \
                              a customer summary where available."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of orders to retrieve",
                            "default": 10
                        },
                        "status": {
                            "type": "string",
                            "description": "Order status filter",
                            "enum": ["any", "open", "closed", "cancelled"],
                            "default": "any"
                        }
                    }
                }),
            },
            client,
        }
    }
}

#[async_trait]
impl Tool for ListOrdersTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let limit = arguments["limit"].as_i64().unwrap_or(10);
        let status = arguments["status"].as_str().unwrap_or("any");
        info!(limit = limit, status = %status, "Listing orders");

        let body = self
            .client
            .get(
                "orders.json",
                &[("limit", limit.to_string()), ("status", status.to_string())],
            )
            .await?;

        let orders = body["orders"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|o| {
                        json!({
                            "id": o["id"],
                            "email": o["email"],
                            "total_price": o["total_price"],
                            "financial_status": o["financial_status"],
                            "fulfillment_status": o["fulfillment_status"],
                            "created_at": o["created_at"],
                            "customer": customer_summary(&o["customer"]),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Ok(json!(orders))
    }
}
