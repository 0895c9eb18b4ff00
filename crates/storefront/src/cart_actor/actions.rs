use crate::model::ProductId;

/// Cart edits. Every action returns the updated cart.
#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds `quantity` units, merging with an existing line for the same product.
    AddItem { product_id: ProductId, quantity: u32 },
    /// Sets the quantity of an existing line; zero or less removes it.
    SetQuantity { product_id: ProductId, quantity: i64 },
    /// Removes the line if present.
    RemoveItem(ProductId),
    Clear,
}
