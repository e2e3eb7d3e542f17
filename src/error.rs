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

//! Error types for account operations and persistence.

use crate::base::AccountNumber;
use thiserror::Error;

/// Account operation errors.
///
/// Rejected withdrawals are still recorded in the account history before
/// one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    /// No account with this number exists in the store
    #[error("account {0} not found")]
    NotFound(AccountNumber),

    /// Withdrawal would exceed the balance of a savings account
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Withdrawal would take a current account past its overdraft limit
    #[error("overdraft limit exceeded")]
    OverdraftExceeded,

    /// Amount is zero or negative
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Holder name is empty or contains whitespace
    #[error("invalid holder name (must be a single word)")]
    InvalidHolderName,

    /// An account with this number already exists
    #[error("account {0} already exists")]
    DuplicateAccount(AccountNumber),
}

/// Persistence errors raised while reading or writing the data file.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is present but does not follow the record grammar.
    /// `line` is 1-based.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },
}

impl CodecError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        CodecError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BankError, CodecError};
    use crate::base::AccountNumber;

    #[test]
    fn error_display_messages() {
        assert_eq!(
            BankError::NotFound(AccountNumber(7)).to_string(),
            "account 7 not found"
        );
        assert_eq!(BankError::InsufficientFunds.to_string(), "insufficient funds");
        assert_eq!(
            BankError::OverdraftExceeded.to_string(),
            "overdraft limit exceeded"
        );
        assert_eq!(
            BankError::InvalidAmount.to_string(),
            "invalid amount (must be positive)"
        );
        assert_eq!(
            BankError::InvalidHolderName.to_string(),
            "invalid holder name (must be a single word)"
        );
        assert_eq!(
            BankError::DuplicateAccount(AccountNumber(101)).to_string(),
            "account 101 already exists"
        );
    }

    #[test]
    fn malformed_record_reports_line() {
        let error = CodecError::malformed(3, "unknown account kind `XYZ`");
        assert_eq!(
            error.to_string(),
            "malformed record at line 3: unknown account kind `XYZ`"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: CodecError = io.into();
        assert!(matches!(error, CodecError::Io(_)));
    }

    #[test]
    fn errors_are_cloneable() {
        let error = BankError::OverdraftExceeded;
        let cloned = error.clone();
        assert_eq!(error, cloned);
    }
}
