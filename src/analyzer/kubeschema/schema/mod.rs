//! Resource schemas: keys, models, the registry, and the swagger loader.

pub mod key;
pub mod loader;
pub mod model;
pub mod registry;
pub mod source;

pub use key::ResourceTypeKey;
pub use loader::{SchemaError, load_registry, load_schema_path, load_swagger_file, load_swagger_str};
pub use model::{Model, ModelId, PropertyDescriptor, PropertyType};
pub use registry::{ModelRegistry, ModelRegistryBuilder, SourceInfo, global, global_or_init, install_global};
pub use source::{Definition, PropertySchema, SchemaSource};
