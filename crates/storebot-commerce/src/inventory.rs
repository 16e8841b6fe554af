use crate::client::CommerceClient;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use storebot_core::{StorebotError, StorebotResult};
use storebot_tools::{Tool, ToolDescriptor};
use tracing::info;

/// Sets the available quantity for a product variant.
///
/// The Admin API keys inventory by inventory item and location, not by
/// variant, so setting a quantity takes three calls: resolve the variant to
/// its inventory item, find the item's inventory level to learn the location,
/// then set the available count at that location.
pub struct UpdateInventoryTool {
    descriptor: ToolDescriptor,
    client: Arc<CommerceClient>,
}

impl UpdateInventoryTool {
    /// Creates the tool against the given client.
    pub fn new(client: Arc<CommerceClient>) -> Self {
        Self {
            descriptor: ToolDescriptor {
                name: "update_inventory".to_string(),
                description: "Set the available inventory quantity for a product variant."
                    .to_string(),
                parameters_schema: json!({
                    "type": "object",
                    "properties": {
                        "variant_id": {
                            "type": "integer",
                            "description": "ID of the product variant"
                        },
                        "quantity": {
                            "type": "integer",
                            "description": "New available quantity"
                        }
                    },
                    "required": ["variant_id", "quantity"]
                }),
            },
            client,
        }
    }
}

#[async_trait]
impl Tool for UpdateInventoryTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> StorebotResult<serde_json::Value> {
        let variant_id = arguments["variant_id"].as_i64().unwrap_or_default();
        let quantity = arguments["quantity"].as_i64().unwrap_or_default();
        info!(variant_id = variant_id, quantity = quantity, "Updating inventory");

        let variant_body = self
            .client
            .get_optional(&format!("variants/{variant_id}.json"), &[])
            .await?
            .ok_or_else(|| StorebotError::Tool("Variant not found".to_string()))?;

        let inventory_item_id = variant_body["variant"]["inventory_item_id"]
            .as_i64()
            .ok_or_else(|| StorebotError::Tool("Variant not found".to_string()))?;

        let levels_body = self
            .client
            .get(
                "inventory_levels.json",
                &[("inventory_item_ids", inventory_item_id.to_string())],
            )
            .await?;

        let location_id = levels_body["inventory_levels"]
            .as_array()
            .and_then(|levels| levels.first())
            .and_then(|level| level["location_id"].as_i64())
            .ok_or_else(|| {
                StorebotError::Tool(format!(
                    "No inventory level found for variant {variant_id}"
                ))
            })?;

        self.client
            .post(
                "inventory_levels/set.json",
                &json!({
                    "location_id": location_id,
                    "inventory_item_id": inventory_item_id,
                    "available": quantity,
                }),
            )
            .await?;

        Ok(json!({
            "success": true,
            "variant_id": variant_id,
            "new_quantity": quantity,
        }))
    }
}
