// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization.
//!
//! The gateway issues its own HS256 JWTs at login and validates them via
//! the [`Auth`] and [`AdminOnly`] extractors on protected routes.

mod error;
mod extractor;
mod roles;
mod token;

pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, Identity};
pub use roles::Role;
pub use token::{TokenClaims, TokenService};
