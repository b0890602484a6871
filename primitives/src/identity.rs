//! Real-world identity data as disclosed by an external proof.
//!
//! Beneficiaries that are not known by account are registered under a
//! commitment over their canonical identity tuple. The same canonical form is
//! used when the tuple is committed and when a proof later discloses it.

use codec::{Decode, DecodeWithMemTracking, Encode};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Uniqueness token carried by an identity proof.
pub type Nullifier = [u8; 32];

/// Identity fields disclosed by a proof. Only the first three are committed to.
#[derive(Encode, Decode, DecodeWithMemTracking, Eq, PartialEq, Clone, Debug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct IdentityDocument {
  pub first_name: Vec<u8>,
  pub last_name: Vec<u8>,
  pub date_of_birth: Vec<u8>,
  pub nationality: Vec<u8>,
}

impl IdentityDocument {
  /// Canonical `(first_name, last_name, date_of_birth)` tuple.
  pub fn committed_tuple(&self) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    (
      canonical_name(&self.first_name),
      canonical_name(&self.last_name),
      canonical_date(&self.date_of_birth),
    )
  }
}

/// Outcome flags reported by the proof verifier.
#[derive(Encode, Decode, DecodeWithMemTracking, Eq, PartialEq, Clone, Copy, Debug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct ProofFlags {
  pub valid: bool,
  pub minimum_age: bool,
  pub sanctions_clear: bool,
}

impl ProofFlags {
  pub fn all_satisfied(&self) -> bool {
    self.valid && self.minimum_age && self.sanctions_clear
  }
}

/// Structured result of an external identity proof check.
#[derive(Encode, Decode, DecodeWithMemTracking, Eq, PartialEq, Clone, Debug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct VerifiedIdentity<AccountId> {
  pub document: IdentityDocument,
  pub flags: ProofFlags,
  pub nullifier: Nullifier,
  /// Account that submitted the proof; receives the released assets.
  pub submitter: AccountId,
}

/// Names compare case-insensitively and ignore surrounding whitespace.
pub fn canonical_name(raw: &[u8]) -> Vec<u8> {
  raw.trim_ascii().to_ascii_lowercase()
}

/// Dates compare byte-for-byte once surrounding whitespace is dropped.
pub fn canonical_date(raw: &[u8]) -> Vec<u8> {
  raw.trim_ascii().to_vec()
}
