pub mod output_store;
