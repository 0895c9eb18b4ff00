use crate::model::ProductId;

/// Wishlist edits. Each returns whether the list changed.
#[derive(Debug, Clone)]
pub enum WishlistAction {
    Add(ProductId),
    Remove(ProductId),
    Clear,
}
