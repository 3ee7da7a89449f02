pub mod readgroupset;
pub mod read;
pub mod callset;
pub mod variant;

// Re-export all APIs
pub use readgroupset::ReadGroupSetApi;
pub use read::ReadApi;
pub use callset::CallSetApi;
pub use variant::VariantApi;
