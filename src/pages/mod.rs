pub mod add_user;
pub mod confirm;
pub mod details;
pub mod filter_bar;
pub mod help;
pub mod user_table;
