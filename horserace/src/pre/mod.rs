pub mod read_store_config;
pub mod sim_opts;
