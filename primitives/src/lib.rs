#![cfg_attr(not(feature = "std"), no_std)]

pub mod ecosystem;
pub mod identity;
pub mod shares;

pub use ecosystem::*;
pub use identity::*;
pub use shares::*;
