// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for the storage entities.
//!
//! `reminders` holds the due-reminder selector, `completions` the completion
//! ledger, and `users` the identity resolver. All SQL is parameterized; rows
//! are decoded into `nudge-core` record types before leaving this crate.

pub mod completions;
pub mod reminders;
pub mod users;
