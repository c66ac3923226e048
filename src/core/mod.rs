pub mod accessor;
pub mod client;
pub mod query;
pub mod service;
pub mod transport;

pub use crate::domain::model::{
    Application, ApplicationType, Authentication, Collection, EntitiesQuery, Endpoint,
    FilterValue, Source, SourceEditBundle, SourcesData,
};
pub use crate::domain::ports::{ConfigProvider, SourcesApi};
pub use crate::utils::error::Result;
