pub(crate) mod storage;

pub(crate) use storage::{StorageClient, StorageConfig};
