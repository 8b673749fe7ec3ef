mod host;
mod normalized;
mod normalizer;
mod product_list;

pub use host::InventoryHostFacts;
pub use normalized::NormalizedFacts;
pub use normalizer::{FactNormalizer, NormalizerConfig, RHEL_TAG};
pub use product_list::RhelProductList;

#[cfg(test)]
pub use product_list::MockRhelProductList;
