use crate::client::CommerceClient;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use storebot_core::StorebotResult;
use storebot_tools::{Tool, ToolDescriptor};
use tracing::info;

/// Lists customers of the store.
pub struct ListCustomersTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl ListCustomersTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "list_customers".to_string(),
                description: "Retrieve customers from the store with contact details, \
                              total spend and order count."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of customers to retrieve",
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
impl Tool for ListCustomersTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let limit = arguments["limit"].as_i64().unwrap_or(10);
        info!(limit = limit, "Listing customers");

        let body = self
            .client
            .get("customers.json", &[("limit", limit.to_string())])
            .await?;

        let customers = body["customers"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|c| {
                        json!({
                            "id": c["id"],
                            "email": c["email"],
                            "first_name": c["first_name"],
                            "last_name": c["last_name"],
                            "phone": c["phone"],
                            "total_spent": c["total_spent"],
                            "orders_count": c["orders_count"],
                            "state": c["state"],
                            "created_at": c["created_at"],
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Ok(json!(customers))
    }
}
