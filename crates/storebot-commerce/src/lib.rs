//! Commerce-platform tools for Storebot.
//!
//! Provides the authenticated [`CommerceClient`] for a Shopify-style Admin
//! REST API and the six store operations the assistant can request:
//! listing and fetching products, listing customers, listing orders,
//! updating variant inventory, and creating a product.
//!
//! All tools report underlying faults (not found, network, validation) as
//! execution errors, which the dispatcher folds back into the conversation
//! as error payloads.

/// The Admin API client and its configuration.
pub mod client;
/// Customer tools.
pub mod customers;
/// Inventory tools.
pub mod inventory;
/// Order tools.
pub mod orders;
/// Product tools.
pub mod products;

pub use client::{CommerceClient, CommerceConfig};
pub use customers::ListCustomersTool;
pub use inventory::UpdateInventoryTool;
pub use orders::ListOrdersTool;
pub use products::{CreateProductTool, GetProductTool, ListProductsTool};

use std::sync::Arc;
use storebot_tools::ToolRegistry;

/// Registers all six commerce tools into the given registry.
pub fn register_commerce_tools(registry: &mut ToolRegistry, client: Arc<CommerceClient>) {
    registry.register(Arc::new(ListProductsTool::new(Arc::clone(&client))));
    registry.register(Arc::new(GetProductTool::new(Arc::clone(&client))));
    registry.register(Arc::new(ListCustomersTool::new(Arc::clone(&client))));
    registry.register(Arc::new(ListOrdersTool::new(Arc::clone(&client))));
    registry.register(Arc::new(UpdateInventoryTool::new(Arc::clone(&client))));
    registry.register(Arc::new(CreateProductTool::new(client)));
}
