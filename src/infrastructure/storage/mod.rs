mod local_store;
mod mock_store;
mod s3_store;
mod store_factory;
mod transfer;

pub use local_store::LocalArtifactStore;
pub use mock_store::MockArtifactStore;
pub use s3_store::S3ArtifactStore;
pub use store_factory::ArtifactStoreFactory;
