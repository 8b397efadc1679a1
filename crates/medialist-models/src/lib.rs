pub mod actor;
pub mod descriptor;
pub mod media;
pub mod medialist;
pub mod source;

pub use actor::{Actor, ActorId, Permission};
pub use descriptor::ItemDescriptor;
pub use media::{Media, MediaId, MediaStatus, MediaType, NewMedia};
pub use medialist::{Medialist, MedialistId, MedialistItem, NewMedialist, NewMedialistItem};
pub use source::{MedialistSource, MedialistSourceType};
