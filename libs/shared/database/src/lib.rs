pub mod data_api;
