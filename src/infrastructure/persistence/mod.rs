mod memory_repository;
mod pg_conversion_repository;

pub use memory_repository::InMemoryConversionRepository;
pub use pg_conversion_repository::PgConversionRepository;
