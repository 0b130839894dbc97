//! Domain layer: identifiers, aliases, bindings, and resolution results.
//!
//! Everything here is plain data with parsing rules; no I/O. The
//! collaborator traits the resolver depends on live in
//! [`crate::ports`].

pub mod alias_binding;
pub mod directory_entry;
pub mod identifiers;
pub mod room_alias;

pub use alias_binding::AliasBinding;
pub use directory_entry::RoomDirectoryEntry;
pub use identifiers::{IdentifierError, RoomId, ServerName, UserId};
pub use room_alias::RoomAlias;
