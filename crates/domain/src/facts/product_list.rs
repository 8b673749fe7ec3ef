/// Set of engineering product IDs that identify RHEL
///
/// Loaded once at startup by infrastructure; a failed load is fatal there,
/// so lookups themselves cannot fail.
#[cfg_attr(test, mockall::automock)]
pub trait RhelProductList: Send + Sync {
    fn contains(&self, eng_product_id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
