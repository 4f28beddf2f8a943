// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet ownership verification.
//!
//! Three proof strategies of decreasing strength: a signed challenge
//! issued by this gateway, a recent transaction submitted by the key, and
//! an account-activity heuristic. [`OwnershipService`] fronts all three.

pub mod address;
pub mod challenge;
pub mod service;
pub mod signature;

pub use service::{ChallengeOutput, OwnershipService, VerifyOwnershipOutput};
