pub mod admin;
pub mod crud;
pub mod emails;
pub mod forms;
pub mod health;
pub mod swagger;
