pub mod init;
pub mod pulse;
pub mod roles;
pub mod run;
