// SPDX-FileCopyrightText: 2026 Nudge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `nudge-core::types` so the engine and
//! delivery channels share them without depending on this crate. This module
//! re-exports them for convenience within the storage crate.

pub use nudge_core::types::{Completion, DueReminder, Reminder, User};
