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

//! # Bank Ledger
//!
//! This library manages a small set of bank accounts: savings accounts that
//! accrue interest and current accounts with an overdraft limit. Every
//! account keeps an append-only history, and the whole store round-trips
//! through a line-oriented text file.
//!
//! ## Core Components
//!
//! - [`AccountStore`]: Accounts keyed by number, in creation order
//! - [`Account`]: One account, with its [`AccountKind`] deciding withdraw and interest rules
//! - [`codec`]: Encoding and decoding of the data file
//! - [`PersistentStore`]: A store bound to its data file, saved on close
//! - [`BankError`] / [`CodecError`]: Operation and persistence failures
//!
//! ## Example
//!
//! ```
//! use bank_ledger_rs::{AccountKind, AccountNumber, AccountStore, BankError};
//! use rust_decimal_macros::dec;
//!
//! let mut store = AccountStore::new();
//! store.create(AccountNumber(101), "Asha", dec!(1000), AccountKind::Savings).unwrap();
//! store.create(
//!     AccountNumber(202),
//!     "Ravi",
//!     dec!(200),
//!     AccountKind::Current { overdraft_limit: dec!(100) },
//! ).unwrap();
//!
//! store.deposit_to(AccountNumber(101), dec!(500)).unwrap();
//! store.apply_interest_to_all();
//! assert_eq!(store.find(AccountNumber(101)).unwrap().balance(), dec!(1545));
//!
//! store.withdraw_from(AccountNumber(202), dec!(250)).unwrap();
//! assert_eq!(
//!     store.withdraw_from(AccountNumber(202), dec!(100)),
//!     Err(BankError::OverdraftExceeded)
//! );
//! ```
//!
//! ## Threading
//!
//! The store is a plain owned value. It is meant to be used by one caller at
//! a time; mutation goes through `&mut`.

pub mod account;
mod base;
pub mod codec;
pub mod error;
mod session;
mod store;

pub use account::{Account, AccountDetails, AccountKind, SAVINGS_INTEREST_RATE};
pub use base::AccountNumber;
pub use error::{BankError, CodecError};
pub use session::PersistentStore;
pub use store::AccountStore;
