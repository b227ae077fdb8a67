//! Card ledger and transfer engine.
//!
//! This module implements the card domain: issuing cards with encrypted
//! PANs, the card status state machine, and funds transfers between two
//! cards of the same owner.
//!
//! # Modules
//!
//! - `types` - Card domain types (CardRecord, CardStatus, CardDisplay)
//! - `error` - Card-specific error types
//! - `codec` - PAN encryption, decryption, and display masking
//! - `lifecycle` - Status transition logic
//! - `transfer` - Ownership, status, and funds validation for transfers
//! - `store` - The persistence contract the engine depends on
//! - `service` - Orchestration of store reads/writes around the pure logic

pub mod codec;
pub mod error;
pub mod lifecycle;
pub mod service;
pub mod store;
pub mod transfer;
pub mod types;

mod locks;

#[cfg(test)]
mod codec_props;
#[cfg(test)]
mod transfer_props;

pub use codec::{mask, CodecError, PanCodec, PanKey};
pub use error::CardError;
pub use lifecycle::LifecycleService;
pub use service::CardService;
pub use store::CardStore;
pub use transfer::TransferEngine;
pub use types::{CardDisplay, CardRecord, CardStatus, IssueCardInput, UserRef};
