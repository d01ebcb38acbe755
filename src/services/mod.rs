pub mod data_uri;
pub mod normalizer;
pub mod poller;
pub mod prediction;
pub mod prompt;
pub mod provider;
pub mod storage;
pub mod trimmer;
