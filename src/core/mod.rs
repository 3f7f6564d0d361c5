pub mod classify;
pub mod etl;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod verify;

pub use crate::domain::model::{CanonicalRecord, OutputRow, RawRow, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
