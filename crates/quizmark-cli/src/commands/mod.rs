pub mod check_key;
pub mod init;
pub mod score;
