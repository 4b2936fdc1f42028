//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where clients create the entity, a `Deserialize`
//! request DTO.

pub mod bet;
pub mod checkin;
pub mod coin_ledger;
pub mod cosmetic;
pub mod profile;
pub mod support;
pub mod wall_event;
