use crate::domain::model::{RawRow, TransformResult};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn user_id(&self) -> &str;
    fn year(&self) -> i32;
}

pub trait Pipeline {
    fn extract(&self) -> Result<Vec<RawRow>>;
    fn transform(&self, rows: Vec<RawRow>) -> Result<TransformResult>;
    fn load(&self, result: TransformResult) -> Result<String>;
}
