pub mod chat;
pub mod domains;
pub mod health;
pub mod index;
pub mod recovery;
pub mod url;
