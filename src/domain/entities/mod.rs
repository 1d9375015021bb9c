pub mod bar;
pub mod order;
pub mod screener_record;
pub mod time_window;
