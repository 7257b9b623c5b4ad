pub mod parse_user;
