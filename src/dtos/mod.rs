//! DTOs module - Data Transfer Objects
//!
//! Rappresentazioni usate al confine con il backend (envelope delle risposte)
//! e con l'host che disegna i popup.

pub mod invitation;

pub use invitation::{InvitationListDTO, PopupDTO};
