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

//! Flat-file persistence for the account store.
//!
//! The format is line oriented. A count header is followed by one block per
//! account, in store order:
//!
//! ```text
//! <account count>
//! <tag> <number> <holder> <balance> [<overdraft limit>]
//! <history count>
//! <history entry>
//! ...
//! ```
//!
//! `tag` is `SAV` or `CUR`; only `CUR` records carry an overdraft limit.
//! Header fields are separated by whitespace, history entries are stored
//! verbatim. Decoded accounts get their history back.
//!
//! Decoding is all or nothing: any deviation from the grammar fails with
//! [`CodecError::MalformedRecord`] and no store is produced.

use crate::CodecError;
use crate::account::{Account, AccountKind};
use crate::base::AccountNumber;
use crate::store::AccountStore;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Default data file name, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "bankdata.txt";

/// Writes the whole store to `writer`.
pub fn encode<W: Write>(store: &AccountStore, mut writer: W) -> Result<(), CodecError> {
    writeln!(writer, "{}", store.len())?;
    for account in store.accounts() {
        writer.write_all(account.to_record().as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a store from `reader`.
///
/// Empty input decodes to an empty store.
///
/// # Errors
///
/// - [`CodecError::MalformedRecord`] - the input does not follow the grammar,
///   ends before the declared counts are met, or describes an invalid account.
/// - [`CodecError::Io`] - the reader failed.
pub fn decode<R: BufRead>(reader: R) -> Result<AccountStore, CodecError> {
    let mut records = RecordReader::new(reader);
    let mut store = AccountStore::new();

    let Some(header) = records.try_next_line()? else {
        return Ok(store);
    };
    let count = parse_count(&header, records.line, "account count")?;

    for _ in 0..count {
        let account = records.next_account()?;
        let line = records.record_line;
        store
            .insert(account)
            .map_err(|error| CodecError::malformed(line, error.to_string()))?;
    }

    while let Some(trailing) = records.try_next_line()? {
        if !trailing.trim().is_empty() {
            return Err(CodecError::malformed(
                records.line,
                "unexpected data after the last account",
            ));
        }
    }

    Ok(store)
}

/// Loads the store from `path`.
///
/// A file that is missing or cannot be opened yields an empty store, so the
/// first run starts from scratch.
pub fn load(path: impl AsRef<Path>) -> Result<AccountStore, CodecError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file, starting with an empty store");
            return Ok(AccountStore::new());
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                %error,
                "data file unreadable, starting with an empty store"
            );
            return Ok(AccountStore::new());
        }
    };

    let store = decode(BufReader::new(file))?;
    info!(path = %path.display(), accounts = store.len(), "accounts loaded");
    Ok(store)
}

/// Saves the store to `path`, replacing any previous content.
///
/// The write is not atomic: a failure part way leaves a partial file.
pub fn save(store: &AccountStore, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    encode(store, BufWriter::new(file))?;
    info!(path = %path.display(), accounts = store.len(), "accounts saved");
    Ok(())
}

/// Line cursor that remembers where it is for error reporting.
struct RecordReader<R> {
    lines: Lines<R>,
    /// 1-based number of the last line read.
    line: usize,
    /// Line of the record header currently being decoded.
    record_line: usize,
}

impl<R: BufRead> RecordReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            record_line: 0,
        }
    }

    fn try_next_line(&mut self) -> Result<Option<String>, CodecError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                match line {
                    Ok(line) => Ok(Some(line)),
                    Err(error) if error.kind() == io::ErrorKind::InvalidData => {
                        Err(CodecError::malformed(self.line, "invalid UTF-8"))
                    }
                    Err(error) => Err(error.into()),
                }
            }
            None => Ok(None),
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<String, CodecError> {
        self.try_next_line()?.ok_or_else(|| {
            CodecError::malformed(
                self.line + 1,
                format!("unexpected end of input, expected {expected}"),
            )
        })
    }

    fn next_account(&mut self) -> Result<Account, CodecError> {
        let header = self.next_line("account record")?;
        self.record_line = self.line;
        let fields = parse_fields(&header, self.line)?;

        let count_line = self.next_line("history count")?;
        let count = parse_count(&count_line, self.line, "history count")?;
        let mut history = Vec::new();
        for _ in 0..count {
            history.push(self.next_line("history entry")?);
        }

        Account::restore(
            fields.number,
            fields.holder,
            fields.balance,
            fields.kind,
            history,
        )
        .map_err(|error| CodecError::malformed(self.record_line, error.to_string()))
    }
}

/// Parsed record line, before invariants are checked.
struct RecordFields<'a> {
    number: AccountNumber,
    holder: &'a str,
    balance: Decimal,
    kind: AccountKind,
}

fn parse_fields(line: &str, line_number: usize) -> Result<RecordFields<'_>, CodecError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let malformed = |reason: String| CodecError::malformed(line_number, reason);

    let (tag, rest) = fields
        .split_first()
        .ok_or_else(|| malformed("empty account record".to_string()))?;
    let expected = match *tag {
        AccountKind::SAVINGS_TAG => 3,
        AccountKind::CURRENT_TAG => 4,
        other => return Err(malformed(format!("unknown account kind `{other}`"))),
    };
    if rest.len() != expected {
        return Err(malformed(format!(
            "`{tag}` record expects {expected} fields after the tag, found {}",
            rest.len()
        )));
    }

    let number = AccountNumber::from_str(rest[0])
        .map_err(|_| malformed(format!("invalid account number `{}`", rest[0])))?;
    let balance = parse_decimal(rest[2], "balance").map_err(malformed)?;
    let kind = if *tag == AccountKind::CURRENT_TAG {
        AccountKind::Current {
            overdraft_limit: parse_decimal(rest[3], "overdraft limit").map_err(malformed)?,
        }
    } else {
        AccountKind::Savings
    };

    Ok(RecordFields {
        number,
        holder: rest[1],
        balance,
        kind,
    })
}

fn parse_decimal(field: &str, what: &str) -> Result<Decimal, String> {
    Decimal::from_str(field).map_err(|_| format!("invalid {what} `{field}`"))
}

fn parse_count(line: &str, line_number: usize, what: &str) -> Result<usize, CodecError> {
    let field = line.trim();
    field
        .parse()
        .map_err(|_| CodecError::malformed(line_number, format!("invalid {what} `{field}`")))
}
