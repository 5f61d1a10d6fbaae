pub mod admin;
pub mod donation;
pub mod email;
pub mod event;
pub mod help_desk;
pub mod membership;
pub mod product;
pub mod refund;
pub mod resource;

pub use admin::*;
pub use donation::*;
pub use email::OutgoingEmail;
pub use event::*;
pub use help_desk::*;
pub use membership::*;
pub use product::*;
pub use refund::*;
pub use resource::{Editable, ListQuery, RecordMeta, Resource};
