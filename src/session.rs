// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! File-backed store session.
//!
//! A [`PersistentStore`] loads the store when opened and writes it back when
//! closed. Closing is explicit so the caller sees save errors; if the guard
//! is dropped without being closed (early return, `?`, panic unwinding) it
//! still saves and logs any failure.
//!
//! # Example
//!
//! ```no_run
//! use bank_ledger_rs::{AccountKind, AccountNumber, PersistentStore};
//! use rust_decimal_macros::dec;
//!
//! let mut bank = PersistentStore::open("bankdata.txt")?;
//! bank.create(AccountNumber(101), "Asha", dec!(1000), AccountKind::Savings)?;
//! bank.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::CodecError;
use crate::codec;
use crate::store::AccountStore;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tracing::error;

/// Account store bound to its data file.
#[derive(Debug)]
pub struct PersistentStore {
    path: PathBuf,
    store: AccountStore,
    closed: bool,
}

impl PersistentStore {
    /// Loads the store from `path`; a missing file gives an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CodecError> {
        let path = path.into();
        let store = codec::load(&path)?;
        Ok(Self {
            path,
            store,
            closed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current state to the data file and keeps the session open.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        codec::save(&self.store, &self.path)
    }

    /// Writes the current state and ends the session.
    pub fn close(mut self) -> Result<(), CodecError> {
        self.closed = true;
        codec::save(&self.store, &self.path)
    }

    /// Ends the session without saving and hands back the store.
    pub fn into_inner(mut self) -> AccountStore {
        self.closed = true;
        std::mem::take(&mut self.store)
    }
}

impl Deref for PersistentStore {
    type Target = AccountStore;

    fn deref(&self) -> &AccountStore {
        &self.store
    }
}

impl DerefMut for PersistentStore {
    fn deref_mut(&mut self) -> &mut AccountStore {
        &mut self.store
    }
}

impl Drop for PersistentStore {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = codec::save(&self.store, &self.path) {
            error!(path = %self.path.display(), error = %e, "failed to save accounts on drop");
        }
    }
}
